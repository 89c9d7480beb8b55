//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway and configuration.

use pay_cashfree::CashfreeGateway;
use pay_core::{
    BoxedPaymentGateway, OrderDefaults, DEFAULT_ORDER_NOTE, DEFAULT_ORIGIN, DEFAULT_RETURN_PATH,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment label reported by `/health` (from `CASHFREE_ENVIRONMENT`)
    pub environment: String,
    /// Fallbacks for create-order fields
    pub order_defaults: OrderDefaults,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let order_defaults = OrderDefaults {
            origin: env_or("DEFAULT_ORIGIN", DEFAULT_ORIGIN),
            return_path: env_or("RETURN_PATH", DEFAULT_RETURN_PATH),
            order_note: env_or("DEFAULT_ORDER_NOTE", DEFAULT_ORDER_NOTE),
            ..OrderDefaults::default()
        };

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: env_or("CASHFREE_ENVIRONMENT", "production"),
            order_defaults,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "production".to_string(),
            order_defaults: OrderDefaults::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway
    pub gateway: BoxedPaymentGateway,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState backed by Cashfree, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let gateway = CashfreeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Cashfree: {}", e))?;

        let cashfree = gateway.config();
        info!("Client ID: {}", cashfree.client_id_status());
        info!("Client Secret: {}", cashfree.client_secret_status());
        if !cashfree.has_credentials() {
            warn!("Cashfree credentials missing; gateway calls will fail with 401");
        }

        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(config: AppConfig, gateway: BoxedPaymentGateway) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::PaymentGateway;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        for key in [
            "HOST",
            "PORT",
            "CASHFREE_ENVIRONMENT",
            "DEFAULT_ORIGIN",
            "RETURN_PATH",
            "DEFAULT_ORDER_NOTE",
        ] {
            std::env::remove_var(key);
        }

        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "production");
        assert_eq!(config.order_defaults.origin, "https://www.daamievent.com");
        assert_eq!(config.order_defaults.order_note, "Indian Creative Star - Entry Fee");
    }

    #[test]
    #[serial]
    fn test_app_config_overrides() {
        std::env::set_var("PORT", "8081");
        std::env::set_var("CASHFREE_ENVIRONMENT", "sandbox");
        std::env::set_var("DEFAULT_ORIGIN", "https://events.example");

        let config = AppConfig::from_env();
        assert_eq!(config.port, 8081);
        assert_eq!(config.environment, "sandbox");
        assert_eq!(
            config.order_defaults.return_url(None),
            "https://events.example/indiancreativestar/dashboard?payment=success"
        );

        std::env::remove_var("PORT");
        std::env::remove_var("CASHFREE_ENVIRONMENT");
        std::env::remove_var("DEFAULT_ORIGIN");
    }

    #[test]
    #[serial]
    fn test_state_starts_without_credentials() {
        std::env::remove_var("CASHFREE_CLIENT_ID");
        std::env::remove_var("CASHFREE_CLIENT_SECRET");

        let state = AppState::new().unwrap();
        assert_eq!(state.gateway.provider_name(), "cashfree");
        assert_eq!(state.config.port, 3000);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
