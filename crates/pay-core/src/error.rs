//! # Payment Error Types
//!
//! Typed error handling for the relay.
//! All gateway operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Gateway rejected our credentials
    #[error("Authentication failed [{provider}]: {message}")]
    Authentication { provider: String, message: String },

    /// Gateway has no order with this id
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        message: String,
        /// Gateway response body, when it was JSON
        raw: Option<serde_json::Value>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl PaymentError {
    /// Shorthand for a provider error without a response body
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
            raw: None,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Authentication { .. } => 401,
            PaymentError::OrderNotFound { .. } => 404,
            PaymentError::Configuration(_)
            | PaymentError::ProviderError { .. }
            | PaymentError::NetworkError(_) => 500,
        }
    }

    /// Raw gateway payload attached to this error, if any
    pub fn raw_response(&self) -> Option<&serde_json::Value> {
        match self {
            PaymentError::ProviderError { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PaymentError::InvalidRequest("test".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::Authentication {
                provider: "cashfree".into(),
                message: "bad key".into()
            }
            .status_code(),
            401
        );
        assert_eq!(
            PaymentError::OrderNotFound {
                order_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            PaymentError::provider("cashfree", "boom").status_code(),
            500
        );
        assert_eq!(PaymentError::NetworkError("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_invalid_request_displays_bare_message() {
        let err = PaymentError::InvalidRequest("Order ID is required".into());
        assert_eq!(err.to_string(), "Order ID is required");
    }

    #[test]
    fn test_raw_response_only_on_provider_errors() {
        let err = PaymentError::ProviderError {
            provider: "cashfree".into(),
            message: "order_amount invalid".into(),
            raw: Some(serde_json::json!({ "code": "order_amount_invalid" })),
        };
        assert_eq!(err.raw_response().unwrap()["code"], "order_amount_invalid");
        assert!(PaymentError::NetworkError("x".into()).raw_response().is_none());
    }
}
