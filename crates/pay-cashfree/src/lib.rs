//! # pay-cashfree
//!
//! Cashfree Payment Gateway client for cashfree-relay.
//!
//! `CashfreeGateway` implements `PaymentGateway` over the PG REST API:
//!
//! - `create_order` → `POST /pg/orders`, returns the `payment_session_id`
//! - `fetch_order` → `GET /pg/orders/{order_id}` plus the order's payments
//!
//! The endpoint is always production. Credentials come from
//! `CASHFREE_CLIENT_ID` / `CASHFREE_CLIENT_SECRET`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_cashfree::CashfreeGateway;
//! use pay_core::PaymentGateway;
//!
//! let gateway = CashfreeGateway::from_env()?;
//! let order = gateway.create_order(&request).await?;
//! let status = gateway.fetch_order(&order.order_id).await?;
//! ```

pub mod config;
pub mod orders;

// Re-exports
pub use config::{CashfreeConfig, API_VERSION, PRODUCTION_BASE_URL};
pub use orders::CashfreeGateway;
