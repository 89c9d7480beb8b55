//! # Order Types
//!
//! Order requests, gateway order snapshots, and the default-filling rules
//! applied to incoming create-order bodies.

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Currency used when the caller omits `order_currency`
pub const DEFAULT_CURRENCY: &str = "INR";

/// Origin used for the default return URL when the request carries none
pub const DEFAULT_ORIGIN: &str = "https://www.daamievent.com";

/// Path appended to the origin for the default return URL
pub const DEFAULT_RETURN_PATH: &str = "/indiancreativestar/dashboard?payment=success";

/// Note attached to orders that don't provide one
pub const DEFAULT_ORDER_NOTE: &str = "Indian Creative Star - Entry Fee";

/// Rejection message for a create-order body without amount or customer
pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: order_amount and customer_details are required";

/// Order amount in major currency units (rupees for INR)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderAmount(pub f64);

impl OrderAmount {
    /// Interpret a caller-supplied amount.
    ///
    /// Accepts JSON numbers and numeric strings. Returns `Ok(None)` for
    /// values that count as "not provided": null, `false`, an empty string,
    /// or zero.
    pub fn from_value(value: &Value) -> PaymentResult<Option<Self>> {
        let amount = match value {
            Value::Null | Value::Bool(false) => return Ok(None),
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match amount {
            Some(a) if a == 0.0 => Ok(None),
            Some(a) if a.is_finite() => Ok(Some(OrderAmount(a))),
            _ => Err(PaymentError::InvalidRequest(
                "order_amount must be a number".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for OrderAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Customer attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub customer_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    /// Gateway-specific fields (e.g. `customer_uid`), passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order metadata (return URL and friends)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMeta {
    /// Where the hosted checkout sends the customer afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<Value>,

    /// Any other caller keys, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fallback values for fields a caller leaves out
#[derive(Debug, Clone)]
pub struct OrderDefaults {
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// Origin used when the request has no `Origin` header
    pub origin: String,
    pub return_path: String,
    pub order_note: String,
}

impl OrderDefaults {
    /// Default return URL for a request coming from `origin`
    pub fn return_url(&self, origin: Option<&str>) -> String {
        let origin = origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(&self.origin);
        format!("{}{}", origin.trim_end_matches('/'), self.return_path)
    }

    /// Generated customer id, unique per millisecond
    pub fn customer_id(&self, now: DateTime<Utc>) -> String {
        format!("customer_{}", now.timestamp_millis())
    }
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            customer_name: "Test Customer".to_string(),
            customer_email: "test@example.com".to_string(),
            customer_phone: "9999999999".to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            return_path: DEFAULT_RETURN_PATH.to_string(),
            order_note: DEFAULT_ORDER_NOTE.to_string(),
        }
    }
}

/// Create-order body as sent by the front end. Every field is optional here;
/// [`OrderDraft::into_request`] enforces what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDraft {
    #[serde(default)]
    pub order_amount: Option<Value>,

    #[serde(default)]
    pub order_currency: Option<String>,

    #[serde(default)]
    pub customer_details: Option<Value>,

    #[serde(default)]
    pub order_meta: Option<OrderMeta>,

    #[serde(default)]
    pub order_note: Option<String>,
}

impl OrderDraft {
    /// Validate the draft and fill in defaults.
    ///
    /// `origin` is the request's `Origin` header, used for the default
    /// return URL. `now` seeds the generated customer id.
    pub fn into_request(
        self,
        defaults: &OrderDefaults,
        origin: Option<&str>,
        now: DateTime<Utc>,
    ) -> PaymentResult<OrderRequest> {
        let amount = match &self.order_amount {
            Some(value) => OrderAmount::from_value(value)?,
            None => None,
        };

        let customer = match self.customer_details {
            Some(Value::Object(map)) => map,
            _ => return Err(PaymentError::InvalidRequest(MISSING_FIELDS_MESSAGE.to_string())),
        };

        let order_amount = amount
            .ok_or_else(|| PaymentError::InvalidRequest(MISSING_FIELDS_MESSAGE.to_string()))?;

        let customer_details = CustomerDetails {
            customer_id: text_field(&customer, "customer_id")
                .unwrap_or_else(|| defaults.customer_id(now)),
            customer_name: Some(
                text_field(&customer, "customer_name")
                    .unwrap_or_else(|| defaults.customer_name.clone()),
            ),
            customer_email: Some(
                text_field(&customer, "customer_email")
                    .unwrap_or_else(|| defaults.customer_email.clone()),
            ),
            customer_phone: Some(
                text_field(&customer, "customer_phone")
                    .unwrap_or_else(|| defaults.customer_phone.clone()),
            ),
            extra: Map::new(),
        };

        let mut order_meta = self.order_meta.unwrap_or_default();
        if order_meta.return_url.as_deref().map_or(true, str::is_empty) {
            order_meta.return_url = Some(defaults.return_url(origin));
        }

        Ok(OrderRequest {
            order_amount,
            order_currency: non_empty(self.order_currency)
                .unwrap_or_else(|| defaults.currency.clone()),
            customer_details,
            order_meta,
            order_note: non_empty(self.order_note).unwrap_or_else(|| defaults.order_note.clone()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read a customer field as text. Numbers are accepted (phone numbers often
/// arrive unquoted); empty strings count as absent.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Validated order, ready for the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub order_amount: OrderAmount,
    pub order_currency: String,
    pub customer_details: CustomerDetails,
    pub order_meta: OrderMeta,
    pub order_note: String,
}

/// Order as created by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    pub payment_session_id: Option<String>,
    pub order_status: Option<String>,
    pub order_amount: Option<OrderAmount>,
    pub order_currency: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    pub order_meta: Option<OrderMeta>,
    pub created_at: Option<String>,
}

/// A single payment attempt against an order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentAttempt {
    pub payment_status: Option<String>,
    /// Method details as reported by the gateway (e.g. `{"upi": {...}}`)
    pub payment_method: Option<Value>,
    pub payment_amount: Option<OrderAmount>,
    pub payment_currency: Option<String>,
    pub payment_time: Option<String>,
}

impl PaymentAttempt {
    fn parsed_time(&self) -> Option<DateTime<chrono::FixedOffset>> {
        self.payment_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    }

    /// Most recent attempt by `payment_time`. Attempts without a parsable
    /// time rank oldest; ties keep the later entry.
    pub fn latest(attempts: impl IntoIterator<Item = PaymentAttempt>) -> Option<PaymentAttempt> {
        attempts
            .into_iter()
            .max_by(|a, b| a.parsed_time().cmp(&b.parsed_time()))
    }
}

/// Current state of an order, with its latest payment attempt folded in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: String,
    pub order_status: Option<String>,
    pub order_amount: Option<OrderAmount>,
    pub order_currency: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    pub payment_status: Option<String>,
    pub payment_method: Option<Value>,
    pub payment_amount: Option<OrderAmount>,
    pub payment_currency: Option<String>,
    pub payment_time: Option<String>,
    pub created_at: Option<String>,
}

impl OrderSnapshot {
    /// Copy the payment fields from an attempt
    pub fn with_payment(mut self, attempt: PaymentAttempt) -> Self {
        self.payment_status = attempt.payment_status;
        self.payment_method = attempt.payment_method;
        self.payment_amount = attempt.payment_amount;
        self.payment_currency = attempt.payment_currency;
        self.payment_time = attempt.payment_time;
        self
    }

    /// Whether the gateway has marked the order as paid
    pub fn is_paid(&self) -> bool {
        self.order_status.as_deref() == Some("PAID")
    }
}
