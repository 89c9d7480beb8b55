//! # Cashfree Configuration
//!
//! Configuration management for the Cashfree integration.
//! Credentials are loaded from environment variables only.

use std::env;
use std::fmt;
use std::time::Duration;

/// Production PG endpoint. The relay always talks to production.
pub const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";

/// PG API version sent as `x-api-version`
pub const API_VERSION: &str = "2023-08-01";

/// Cashfree API configuration
#[derive(Clone)]
pub struct CashfreeConfig {
    /// App id (`x-client-id`)
    pub client_id: String,

    /// Secret key (`x-client-secret`)
    pub client_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl CashfreeConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `CASHFREE_CLIENT_ID` and `CASHFREE_CLIENT_SECRET`. The endpoint
    /// is production whatever `CASHFREE_ENVIRONMENT` says.
    ///
    /// Missing credentials are not an error here; the gateway reports them
    /// as an authentication failure on first use.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::new(
            non_empty_var("CASHFREE_CLIENT_ID").unwrap_or_default(),
            non_empty_var("CASHFREE_CLIENT_SECRET").unwrap_or_default(),
        )
    }

    /// Create config with explicit values
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: PRODUCTION_BASE_URL.to_string(),
            api_version: API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Check that both credentials are present
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// "Set" / "Not set" for startup logging
    pub fn client_id_status(&self) -> &'static str {
        set_or_not(&self.client_id)
    }

    pub fn client_secret_status(&self) -> &'static str {
        set_or_not(&self.client_secret)
    }

    /// `POST` target for order creation
    pub fn orders_url(&self) -> String {
        format!("{}/orders", self.api_base_url.trim_end_matches('/'))
    }

    /// `GET` target for a single order
    pub fn order_url(&self, order_id: &str) -> String {
        format!("{}/{}", self.orders_url(), urlencoding::encode(order_id))
    }

    /// `GET` target for an order's payment attempts
    pub fn order_payments_url(&self, order_id: &str) -> String {
        format!("{}/payments", self.order_url(order_id))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl fmt::Debug for CashfreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CashfreeConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn set_or_not(value: &str) -> &'static str {
    if value.is_empty() {
        "Not set"
    } else {
        "Set"
    }
}
