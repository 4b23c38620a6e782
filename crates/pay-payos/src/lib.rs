//! # pay-payos
//!
//! PayOS payment gateway for tablepay-rs.
//!
//! - **Signing**: canonical `key=value&...` strings over sorted field names,
//!   HMAC-SHA256 with the checksum key, lowercase hex.
//! - **PayOsGateway**: creates hosted payment links (checkout URL + QR code).
//! - **Webhooks**: signature verification and notification dispatch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_payos::PayOsGateway;
//! use pay_core::{PaymentGateway, PaymentRequest};
//!
//! let gateway = PayOsGateway::from_env()?;
//!
//! let request = PaymentRequest::new(
//!     123,
//!     55000,
//!     "Order #123",
//!     "https://example.com/payment/success",
//!     "https://example.com/payment/cancel",
//! );
//! let link = gateway.create_payment_link(&request).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_payos::{dispatch_notification, LoggingWebhookHandler, PaymentNotification};
//!
//! if gateway.verify_webhook(&payload) {
//!     let notification = PaymentNotification::from_payload(&payload)?;
//!     dispatch_notification(&LoggingWebhookHandler, &notification)?;
//! }
//! ```

pub mod config;
pub mod links;
pub mod signature;
pub mod webhook;

// Re-exports
pub use config::PayOsConfig;
pub use links::{interpret_response, signing_fields, PayOsGateway, SignedPayload, PROVIDER};
pub use signature::{canonical_string, sign_data, NullFields, SIGNATURE_FIELD};
pub use webhook::{
    dispatch_notification, verify_webhook_signature, LoggingWebhookHandler, PaymentNotification,
    WebhookHandler,
};
