//! # PayOS Configuration
//!
//! Credentials and endpoint settings for the PayOS integration.
//! Secrets are loaded once from the environment and never mutated.

use pay_core::PaymentError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.payos.vn";

/// Payment links stay valid for 15 minutes
pub const DEFAULT_LINK_TTL_SECS: i64 = 900;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// PayOS API configuration
#[derive(Clone)]
pub struct PayOsConfig {
    /// Sent as `x-client-id`
    pub client_id: String,

    /// Sent as `x-api-key`
    pub api_key: String,

    /// HMAC key for request signatures and webhook verification
    pub checksum_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Seconds until a created payment link expires
    pub link_ttl_secs: i64,

    /// Timeout applied to each outbound request
    pub timeout: Duration,
}

impl PayOsConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYOS_CLIENT_ID`
    /// - `PAYOS_API_KEY`
    /// - `PAYOS_CHECKSUM_KEY`
    ///
    /// Optional: `PAYOS_API_BASE_URL`, `PAYOS_LINK_TTL_SECS`, `PAYOS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mut config = Self::new(
            required("PAYOS_CLIENT_ID")?,
            required("PAYOS_API_KEY")?,
            required("PAYOS_CHECKSUM_KEY")?,
        );

        if let Ok(url) = env::var("PAYOS_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        if let Some(ttl) = optional::<i64>("PAYOS_LINK_TTL_SECS")? {
            if ttl <= 0 {
                return Err(PaymentError::Configuration(
                    "PAYOS_LINK_TTL_SECS must be positive".to_string(),
                ));
            }
            config.link_ttl_secs = ttl;
        }
        if let Some(secs) = optional::<u64>("PAYOS_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(
        client_id: impl Into<String>,
        api_key: impl Into<String>,
        checksum_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
            checksum_key: checksum_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            link_ttl_secs: DEFAULT_LINK_TTL_SECS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Payment-request creation endpoint
    pub fn payment_requests_url(&self) -> String {
        format!("{}/v2/payment-requests", self.api_base_url)
    }
}

impl fmt::Debug for PayOsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayOsConfig")
            .field("client_id", &self.client_id)
            .field("api_key", &"[REDACTED]")
            .field("checksum_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("link_ttl_secs", &self.link_ttl_secs)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required(name: &str) -> Result<String, PaymentError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}

fn optional<T: FromStr>(name: &str) -> Result<Option<T>, PaymentError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PaymentError::Configuration(format!("{} is not a valid number", name))),
        Err(_) => Ok(None),
    }
}
