//! # Payment Gateway Trait
//!
//! The seam between the HTTP layer and the hosted payment gateway.
//!
//! ```text
//! ┌──────────────┐    OrderRequest     ┌──────────────────────────┐
//! │   pay-api    │ ──────────────────▶ │ PaymentGateway (trait)   │
//! │   handlers   │ ◀────────────────── │  ├── create_order()      │
//! └──────────────┘ CreatedOrder /      │  ├── fetch_order()       │
//!                  OrderSnapshot       │  └── provider_name()     │
//!                                      └────────────┬─────────────┘
//!                                                   │
//!                                          ┌────────┴────────┐
//!                                          │ CashfreeGateway │
//!                                          └─────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::order::{CreatedOrder, OrderRequest, OrderSnapshot};
use async_trait::async_trait;
use std::sync::Arc;

/// A hosted payment gateway that owns order creation and status.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order and obtain a payment session for it.
    ///
    /// # Returns
    /// The order as the gateway recorded it, including the
    /// `payment_session_id` the front end hands to the hosted checkout.
    async fn create_order(&self, order: &OrderRequest) -> PaymentResult<CreatedOrder>;

    /// Look up an order by the gateway's order id.
    ///
    /// Fails with `PaymentError::OrderNotFound` when the gateway has no such order.
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<OrderSnapshot>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use crate::order::{OrderDefaults, OrderDraft};
    use chrono::Utc;

    struct EchoGateway;

    #[async_trait]
    impl PaymentGateway for EchoGateway {
        async fn create_order(&self, order: &OrderRequest) -> PaymentResult<CreatedOrder> {
            Ok(CreatedOrder {
                order_id: "order_echo".to_string(),
                payment_session_id: Some("session_echo".to_string()),
                order_status: Some("ACTIVE".to_string()),
                order_amount: Some(order.order_amount),
                order_currency: Some(order.order_currency.clone()),
                customer_details: Some(order.customer_details.clone()),
                order_meta: Some(order.order_meta.clone()),
                created_at: None,
            })
        }

        async fn fetch_order(&self, order_id: &str) -> PaymentResult<OrderSnapshot> {
            Err(PaymentError::OrderNotFound {
                order_id: order_id.to_string(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_gateway_behind_arc() {
        let gateway: BoxedPaymentGateway = Arc::new(EchoGateway);

        let request = OrderDraft {
            order_amount: Some(serde_json::json!(5)),
            customer_details: Some(serde_json::json!({})),
            ..Default::default()
        }
        .into_request(&OrderDefaults::default(), None, Utc::now())
        .unwrap();

        let created = gateway.create_order(&request).await.unwrap();
        assert_eq!(created.order_currency.as_deref(), Some("INR"));
        assert_eq!(gateway.provider_name(), "echo");

        let err = gateway.fetch_order("missing").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
