//! # Request Handlers
//!
//! Axum request handlers for the relay.
//! Every response, success or failure, is wrapped in the `{success, ...}` envelope.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, Method, Response, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use pay_core::{CreatedOrder, OrderDraft, OrderSnapshot, PaymentError, MISSING_FIELDS_MESSAGE};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Routes advertised by the 404 handler
pub const AVAILABLE_ENDPOINTS: [&str; 3] = [
    "GET /health",
    "POST /create-order",
    "GET /order-status?orderId=<order_id>",
];

const AUTH_FAILED: &str = "Authentication failed - Invalid Cashfree credentials";
const AUTH_HINT: &str = "Please check your CASHFREE_CLIENT_ID and CASHFREE_CLIENT_SECRET";
const CREATE_FAILED: &str = "Failed to create order with Cashfree";
const FETCH_FAILED: &str = "Failed to fetch order from Cashfree";
const INTERNAL_ERROR: &str = "Internal server error";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Message text or the raw gateway response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<&'static str>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            setup_required: None,
            available_endpoints: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<Value>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_setup_required(mut self) -> Self {
        self.setup_required = Some(true);
        self
    }

    pub fn with_available_endpoints(mut self) -> Self {
        self.available_endpoints = Some(AVAILABLE_ENDPOINTS.to_vec());
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Map a gateway/validation error onto the envelope.
///
/// `gateway_failure` is the message used when the gateway itself answered
/// with an error.
fn payment_error_to_response(err: PaymentError, gateway_failure: &str) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        PaymentError::InvalidRequest(message) => ErrorResponse::new(message),
        PaymentError::Authentication { .. } => ErrorResponse::new(AUTH_FAILED)
            .with_setup_required()
            .with_error(AUTH_HINT),
        PaymentError::OrderNotFound { .. } => ErrorResponse::new("Order not found"),
        PaymentError::ProviderError { message, raw, .. } => {
            ErrorResponse::new(gateway_failure).with_error(raw.unwrap_or(Value::String(message)))
        }
        other => ErrorResponse::new(INTERNAL_ERROR).with_error(other.to_string()),
    };

    (status, Json(body))
}

fn json_rejection_to_response(rejection: JsonRejection) -> ApiError {
    let body = match rejection {
        // No JSON body at all: same as an empty one
        JsonRejection::MissingJsonContentType(_) => ErrorResponse::new(MISSING_FIELDS_MESSAGE),
        other => ErrorResponse::new("Invalid JSON body").with_error(other.body_text()),
    };
    (StatusCode::BAD_REQUEST, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "message": "Cashfree Payment Server is running",
        "environment": state.config.environment,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an order with the gateway and return its payment session
#[instrument(skip(state, headers, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<OrderDraft>, JsonRejection>,
) -> ApiResult<CreatedOrder> {
    let Json(draft) = payload.map_err(|rejection| {
        warn!("Rejected create-order body: {}", rejection.body_text());
        json_rejection_to_response(rejection)
    })?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    let request = draft
        .into_request(&state.config.order_defaults, origin, Utc::now())
        .map_err(|e| {
            warn!("Invalid create-order request: {}", e);
            payment_error_to_response(e, CREATE_FAILED)
        })?;

    info!(
        "Creating order: amount={} {}, customer={}",
        request.order_amount, request.order_currency, request.customer_details.customer_id
    );

    let order = state.gateway.create_order(&request).await.map_err(|e| {
        error!("Order creation error: {}", e);
        payment_error_to_response(e, CREATE_FAILED)
    })?;

    info!("Created order: {}", order.order_id);

    Ok(Json(ApiResponse::ok(order)))
}

/// Look up an order's status
#[instrument(skip(state, params))]
pub async fn order_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<OrderSnapshot> {
    let order_id = params
        .get("orderId")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            payment_error_to_response(
                PaymentError::InvalidRequest("Order ID is required".to_string()),
                FETCH_FAILED,
            )
        })?;

    let snapshot = state.gateway.fetch_order(order_id).await.map_err(|e| {
        match &e {
            PaymentError::OrderNotFound { .. } => info!("Order not found: {}", order_id),
            _ => error!("Order status error: {}", e),
        }
        payment_error_to_response(e, FETCH_FAILED)
    })?;

    info!(
        "Order {}: status={:?}, paid={}",
        snapshot.order_id,
        snapshot.order_status,
        snapshot.is_paid()
    );

    Ok(Json(ApiResponse::ok(snapshot)))
}

/// Fallback for unknown paths and unsupported methods
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    debug!("No route for {} {}", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found").with_available_endpoints()),
    )
}

/// Turn a handler panic into a 500 envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!("Server error: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR).with_error(detail)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error").with_error("details");
        let body = serde_json::to_value(&err).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Test error");
        assert_eq!(body["error"], "details");
        assert!(body.get("setup_required").is_none());
        assert!(body.get("available_endpoints").is_none());
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, Json(body)) = payment_error_to_response(
            PaymentError::InvalidRequest("Bad data".to_string()),
            CREATE_FAILED,
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Bad data");

        let (status, Json(body)) = payment_error_to_response(
            PaymentError::Authentication {
                provider: "cashfree".into(),
                message: "authentication Failed".into(),
            },
            CREATE_FAILED,
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.setup_required, Some(true));
        assert_eq!(body.error, Some(Value::from(AUTH_HINT)));
    }

    #[test]
    fn test_provider_error_prefers_raw_body() {
        let raw = serde_json::json!({ "code": "order_amount_invalid" });
        let (status, Json(body)) = payment_error_to_response(
            PaymentError::ProviderError {
                provider: "cashfree".into(),
                message: "order_amount invalid".into(),
                raw: Some(raw.clone()),
            },
            CREATE_FAILED,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, CREATE_FAILED);
        assert_eq!(body.error, Some(raw));

        let (_, Json(body)) = payment_error_to_response(
            PaymentError::provider("cashfree", "Empty response from Cashfree"),
            FETCH_FAILED,
        );
        assert_eq!(body.error, Some(Value::from("Empty response from Cashfree")));
    }

    #[test]
    fn test_network_error_is_internal() {
        let (status, Json(body)) = payment_error_to_response(
            PaymentError::NetworkError("connection refused".into()),
            FETCH_FAILED,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, INTERNAL_ERROR);
        assert_eq!(body.error, Some(Value::from("Network error: connection refused")));
    }

    #[tokio::test]
    async fn test_handle_panic_envelope() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "boom");
    }
}
