//! # Cashfree Relay
//!
//! Payment-order relay between a web front end and the Cashfree Payment Gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CASHFREE_CLIENT_ID=...
//! export CASHFREE_CLIENT_SECRET=...
//! export PORT=3000
//!
//! # Run the server
//! cashfree-relay
//! ```

use pay_api::{handlers::AVAILABLE_ENDPOINTS, routes, shutdown::shutdown_signal, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Payment gateway: {}", state.gateway.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 Cashfree Payment Server running on http://{}", addr);
    info!("Available endpoints:");
    for endpoint in AVAILABLE_ENDPOINTS {
        info!("  {}", endpoint);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` overrides the level.
fn init_tracing() {
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(Level::INFO.into())
            .from_env_lossy()
    };

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter())
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  💳 Cashfree Relay 💳
  ━━━━━━━━━━━━━━━━━━━━━
  Payment order relay
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
