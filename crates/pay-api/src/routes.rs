//! # Routes
//!
//! Axum router configuration for the relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health - Health check
///   - POST /create-order - Create a gateway order, returns the payment session
///   - GET  /order-status?orderId=<order_id> - Order and latest payment status
///
/// Anything else (including a known path with the wrong method) gets the
/// 404 envelope listing these endpoints.
pub fn create_router(state: AppState) -> Router {
    // The front end may be served from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::not_found),
        )
        .route(
            "/create-order",
            post(handlers::create_order).fallback(handlers::not_found),
        )
        .route(
            "/order-status",
            get(handlers::order_status).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        // Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Outside the panic catcher so 500 envelopes carry CORS headers
                .layer(cors)
                .layer(CatchPanicLayer::custom(handlers::handle_panic)),
        )
        // State
        .with_state(state)
}
