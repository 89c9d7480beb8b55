//! # pay-api
//!
//! HTTP API layer for cashfree-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order creation and order status endpoints backed by a `PaymentGateway`
//! - The `{success, ...}` JSON envelope used by every response
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-order` | Create order, returns payment session |
//! | GET | `/order-status?orderId=<id>` | Order and payment status |

pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
