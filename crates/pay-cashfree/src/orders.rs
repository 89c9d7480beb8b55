//! # Cashfree Orders
//!
//! Implementation of the Cashfree PG Orders API.
//! Create an order to get a payment session, look it up to get its status.

use crate::config::CashfreeConfig;
use async_trait::async_trait;
use pay_core::{
    CreatedOrder, CustomerDetails, OrderAmount, OrderMeta, OrderRequest, OrderSnapshot,
    PaymentAttempt, PaymentError, PaymentGateway, PaymentResult,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const PROVIDER: &str = "cashfree";

/// Cashfree Payment Gateway client
///
/// Orders are created server-side; the returned `payment_session_id` is
/// handed to Cashfree's hosted checkout by the front end.
pub struct CashfreeGateway {
    config: CashfreeConfig,
    client: Client,
}

impl CashfreeGateway {
    /// Create a new Cashfree gateway client
    pub fn new(config: CashfreeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(CashfreeConfig::from_env())
    }

    pub fn config(&self) -> &CashfreeConfig {
        &self.config
    }

    fn ensure_credentials(&self) -> PaymentResult<()> {
        if self.config.has_credentials() {
            Ok(())
        } else {
            Err(PaymentError::Authentication {
                provider: PROVIDER.to_string(),
                message: "CASHFREE_CLIENT_ID or CASHFREE_CLIENT_SECRET not set".to_string(),
            })
        }
    }

    /// Attach auth and versioning headers
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        debug!("Cashfree request id: {}", request_id);

        builder
            .header("x-client-id", &self.config.client_id)
            .header("x-client-secret", &self.config.client_secret)
            .header("x-api-version", &self.config.api_version)
            .header("x-request-id", request_id)
            .header("Accept", "application/json")
    }

    /// Send a request and decode the body.
    ///
    /// `Ok(None)` means the gateway answered 2xx with an empty or `null` body.
    /// When `order_id` is given, a 404 maps to `OrderNotFound`.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        order_id: Option<&str>,
    ) -> PaymentResult<Option<T>> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(map_error_response(status, &body, order_id));
        }

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        serde_json::from_str(trimmed).map(Some).map_err(|e| {
            error!("Unexpected Cashfree response: {}", e);
            PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("Failed to parse Cashfree response: {}", e),
                raw: Some(raw_body(trimmed)),
            }
        })
    }

    /// Latest payment attempt for an order, if any
    async fn latest_payment(&self, order_id: &str) -> PaymentResult<Option<PaymentAttempt>> {
        let url = self.config.order_payments_url(order_id);
        let payments: Option<Vec<CashfreePaymentEntity>> =
            self.execute(self.client.get(&url), Some(order_id)).await?;

        Ok(PaymentAttempt::latest(
            payments
                .unwrap_or_default()
                .into_iter()
                .map(PaymentAttempt::from),
        ))
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    #[instrument(skip(self, order), fields(amount = %order.order_amount, currency = %order.order_currency))]
    async fn create_order(&self, order: &OrderRequest) -> PaymentResult<CreatedOrder> {
        self.ensure_credentials()?;

        debug!(
            "Creating Cashfree order: customer={}, return_url={:?}",
            order.customer_details.customer_id, order.order_meta.return_url
        );

        let url = self.config.orders_url();
        let entity: Option<CashfreeOrderEntity> = self
            .execute(self.client.post(&url).json(order), None)
            .await?;

        let entity = entity.ok_or_else(|| {
            error!("Cashfree returned an empty body for order creation");
            PaymentError::provider(PROVIDER, "Empty response from Cashfree")
        })?;

        info!(
            "Created Cashfree order: id={}, status={:?}",
            entity.order_id, entity.order_status
        );

        Ok(entity.into())
    }

    #[instrument(skip(self))]
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<OrderSnapshot> {
        self.ensure_credentials()?;

        let url = self.config.order_url(order_id);
        let entity: Option<CashfreeOrderEntity> =
            self.execute(self.client.get(&url), Some(order_id)).await?;

        let snapshot = entity
            .map(CashfreeOrderEntity::into_snapshot)
            .ok_or_else(|| PaymentError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;

        debug!("Fetched Cashfree order: status={:?}", snapshot.order_status);

        match self.latest_payment(order_id).await {
            Ok(Some(attempt)) => Ok(snapshot.with_payment(attempt)),
            Ok(None) => Ok(snapshot),
            Err(e @ PaymentError::Authentication { .. }) => Err(e),
            Err(e) => {
                warn!("Could not load payments for order {}: {}", order_id, e);
                Ok(snapshot)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

fn map_error_response(status: StatusCode, body: &str, order_id: Option<&str>) -> PaymentError {
    let parsed = serde_json::from_str::<CashfreeErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

    match (status, order_id) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            error!("Cashfree rejected credentials: status={}", status);
            PaymentError::Authentication {
                provider: PROVIDER.to_string(),
                message,
            }
        }
        (StatusCode::NOT_FOUND, Some(order_id)) => PaymentError::OrderNotFound {
            order_id: order_id.to_string(),
        },
        _ => {
            error!("Cashfree API error: status={}, body={}", status, body);
            PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message,
                raw: Some(raw_body(body)),
            }
        }
    }
}

/// JSON body when it parses, the text otherwise
fn raw_body(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

// =============================================================================
// Cashfree API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CashfreeOrderEntity {
    order_id: String,
    #[serde(default)]
    payment_session_id: Option<String>,
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default)]
    order_amount: Option<OrderAmount>,
    #[serde(default)]
    order_currency: Option<String>,
    #[serde(default)]
    customer_details: Option<CustomerDetails>,
    #[serde(default)]
    order_meta: Option<OrderMeta>,
    #[serde(default)]
    created_at: Option<String>,
}

impl CashfreeOrderEntity {
    fn into_snapshot(self) -> OrderSnapshot {
        OrderSnapshot {
            order_id: self.order_id,
            order_status: self.order_status,
            order_amount: self.order_amount,
            order_currency: self.order_currency,
            customer_details: self.customer_details,
            payment_status: None,
            payment_method: None,
            payment_amount: None,
            payment_currency: None,
            payment_time: None,
            created_at: self.created_at,
        }
    }
}

impl From<CashfreeOrderEntity> for CreatedOrder {
    fn from(entity: CashfreeOrderEntity) -> Self {
        CreatedOrder {
            order_id: entity.order_id,
            payment_session_id: entity.payment_session_id,
            order_status: entity.order_status,
            order_amount: entity.order_amount,
            order_currency: entity.order_currency,
            customer_details: entity.customer_details,
            order_meta: entity.order_meta,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CashfreePaymentEntity {
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    payment_amount: Option<OrderAmount>,
    #[serde(default)]
    payment_currency: Option<String>,
    #[serde(default)]
    payment_time: Option<String>,
    #[serde(default)]
    payment_method: Option<serde_json::Value>,
}

impl From<CashfreePaymentEntity> for PaymentAttempt {
    fn from(payment: CashfreePaymentEntity) -> Self {
        PaymentAttempt {
            payment_status: payment.payment_status,
            payment_method: payment.payment_method,
            payment_amount: payment.payment_amount,
            payment_currency: payment.payment_currency,
            payment_time: payment.payment_time,
        }
    }
}

/// Error body: `{"message": ..., "code": ..., "type": ...}`
#[derive(Debug, Deserialize)]
struct CashfreeErrorResponse {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors() {
        let body = r#"{"message":"authentication Failed","code":"request_failed","type":"authentication_error"}"#;
        let err = map_error_response(StatusCode::UNAUTHORIZED, body, None);

        assert_eq!(err.status_code(), 401);
        assert!(err.to_string().contains("authentication Failed"));
    }

    #[test]
    fn test_not_found_only_for_lookups() {
        let body = r#"{"message":"order not found","code":"order_not_found","type":"invalid_request_error"}"#;

        let lookup = map_error_response(StatusCode::NOT_FOUND, body, Some("order_9"));
        assert!(matches!(lookup, PaymentError::OrderNotFound { ref order_id } if order_id == "order_9"));

        let create = map_error_response(StatusCode::NOT_FOUND, body, None);
        assert_eq!(create.status_code(), 500);
    }

    #[test]
    fn test_provider_error_keeps_raw_body() {
        let body = r#"{"message":"order_amount : invalid value provided","code":"order_amount_invalid","type":"invalid_request_error"}"#;
        let err = map_error_response(StatusCode::BAD_REQUEST, body, None);

        match err {
            PaymentError::ProviderError { message, raw, .. } => {
                assert_eq!(message, "order_amount : invalid value provided");
                assert_eq!(raw.unwrap()["code"], "order_amount_invalid");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body() {
        let err = map_error_response(StatusCode::BAD_GATEWAY, "upstream down", None);
        assert_eq!(err.to_string(), "Provider error [cashfree]: HTTP 502 Bad Gateway: upstream down");
        assert_eq!(err.raw_response().unwrap(), "upstream down");
    }

    #[test]
    fn test_missing_credentials_short_circuit() {
        let gateway = CashfreeGateway::new(CashfreeConfig::new("", "")).unwrap();
        let err = gateway.ensure_credentials().unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_entity_into_snapshot() {
        let entity: CashfreeOrderEntity = serde_json::from_value(serde_json::json!({
            "cf_order_id": "2149460581",
            "order_id": "order_3242Tq4Edj9CC5RDcSDyzwnpOlB",
            "entity": "order",
            "order_currency": "INR",
            "order_amount": 1.0,
            "order_status": "PAID",
            "payment_session_id": "session_abc",
            "customer_details": {
                "customer_id": "customer_1",
                "customer_name": "Test Customer",
                "customer_email": "test@example.com",
                "customer_phone": "9999999999",
                "customer_uid": null
            },
            "order_meta": { "return_url": "https://x.example/r", "notify_url": null, "payment_methods": null },
            "created_at": "2024-03-01T10:00:00+05:30"
        }))
        .unwrap();

        let snapshot = entity.into_snapshot();
        assert!(snapshot.is_paid());
        assert_eq!(snapshot.order_amount, Some(OrderAmount(1.0)));
        assert!(snapshot.payment_status.is_none());
        assert_eq!(
            snapshot.customer_details.unwrap().extra["customer_uid"],
            serde_json::Value::Null
        );
    }
}
