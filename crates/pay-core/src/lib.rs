//! # pay-core
//!
//! Core types and traits for the cashfree-relay payment server.
//!
//! This crate provides:
//! - `PaymentGateway` trait implemented by the gateway client
//! - `OrderDraft` / `OrderRequest` with the create-order defaulting rules
//! - `CreatedOrder` and `OrderSnapshot` returned by the gateway
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{OrderDefaults, OrderDraft, PaymentGateway};
//!
//! // Validate the front end's body and fill in defaults
//! let request = draft.into_request(&OrderDefaults::default(), origin, chrono::Utc::now())?;
//!
//! // Create the order with the gateway
//! let order = gateway.create_order(&request).await?;
//!
//! // Hand order.payment_session_id to the hosted checkout
//! ```

pub mod error;
pub mod gateway;
pub mod order;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use order::{
    CreatedOrder, CustomerDetails, OrderAmount, OrderDefaults, OrderDraft, OrderMeta,
    OrderRequest, OrderSnapshot, PaymentAttempt, DEFAULT_CURRENCY, DEFAULT_ORDER_NOTE,
    DEFAULT_ORIGIN, DEFAULT_RETURN_PATH, MISSING_FIELDS_MESSAGE,
};
