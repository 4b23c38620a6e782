//! # Payment Gateway Trait
//!
//! Seam between the ordering service and a hosted-checkout payment provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentGateway (trait)                    │
//! │  ├── create_payment_link()                                  │
//! │  ├── verify_webhook()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │  PayOsGateway │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::payment::{PaymentLink, PaymentRequest};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment link for one order.
    ///
    /// Provider and transport failures come back as `Err`; nothing is retried.
    async fn create_payment_link(&self, request: &PaymentRequest) -> PaymentResult<PaymentLink>;

    /// Check the `signature` field of an inbound webhook payload.
    ///
    /// Returns `false` for a missing or wrong signature, never an error.
    fn verify_webhook(&self, payload: &Map<String, Value>) -> bool;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;

    /// Get the webhook endpoint path for this provider.
    /// Default: `/webhook/{provider_name}`
    fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.provider_name())
    }
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Where the provider sends the customer after checkout
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the customer-facing site (e.g., "https://quan-an.vn")
    pub base_url: String,
    /// Success page path
    pub return_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            return_path: "/payment/success".to_string(),
            cancel_path: "/payment/cancel".to_string(),
        }
    }

    pub fn return_url(&self, order_code: i64) -> String {
        format!("{}{}?orderCode={}", self.base_url, self.return_path, order_code)
    }

    pub fn cancel_url(&self, order_code: i64) -> String {
        format!("{}{}?orderCode={}", self.base_url, self.cancel_path, order_code)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
