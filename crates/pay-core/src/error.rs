//! # Payment Error Types
//!
//! Typed error handling for the tablepay ordering and payment engine.
//! All fallible operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Message shown to callers when no provider-specific reason is available.
pub const GENERIC_PAYMENT_FAILURE: &str = "Failed to create payment link";

/// Core error type for all payment and ordering operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Menu item not found
    #[error("Menu item not found: {item_id}")]
    MenuItemNotFound { item_id: String },

    /// Menu item exists but cannot be ordered right now
    #[error("Menu item unavailable: {item_id}")]
    MenuItemUnavailable { item_id: String },

    /// Order not found in the store
    #[error("Order not found: {order_code}")]
    OrderNotFound { order_code: i64 },

    /// Payment provider reported a business failure
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Shorthand for a provider business failure
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error is transient on the provider side.
    ///
    /// Nothing in this workspace retries; callers may.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::NetworkError(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::MenuItemNotFound { .. } => 404,
            PaymentError::MenuItemUnavailable { .. } => 409,
            PaymentError::OrderNotFound { .. } => 404,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::WebhookVerificationFailed(_) => 401,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Message safe to show to a store owner or customer.
    ///
    /// Provider failures carry the provider's own wording verbatim. Transport
    /// and decoding failures collapse into a generic message.
    pub fn public_message(&self) -> String {
        match self {
            PaymentError::ProviderError { message, .. } => message.clone(),
            PaymentError::InvalidRequest(message) => message.clone(),
            PaymentError::MenuItemNotFound { .. }
            | PaymentError::MenuItemUnavailable { .. }
            | PaymentError::OrderNotFound { .. } => self.to_string(),
            _ => GENERIC_PAYMENT_FAILURE.to_string(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
