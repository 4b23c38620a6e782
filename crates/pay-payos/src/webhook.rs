//! # PayOS Webhook Handling
//!
//! PayOS posts a flat JSON object describing the transfer plus a `signature`
//! field. The signature covers every other field, nulls included, sorted by
//! key. Verification never fails loudly: it answers yes or no.

use crate::links::SUCCESS_CODE;
use crate::signature::{canonical_string, hmac_sha256_hex, signatures_match, NullFields, SIGNATURE_FIELD};
use pay_core::{PaymentError, PaymentResult};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Check an inbound webhook payload against the checksum key
pub fn verify_webhook_signature(payload: &Map<String, Value>, checksum_key: &str) -> bool {
    let provided = match payload.get(SIGNATURE_FIELD).and_then(Value::as_str) {
        Some(signature) => signature,
        None => {
            debug!("Webhook payload has no signature");
            return false;
        }
    };

    let mut fields = payload.clone();
    fields.remove(SIGNATURE_FIELD);

    let expected = hmac_sha256_hex(checksum_key, &canonical_string(&fields, NullFields::Include));
    signatures_match(&expected, provided)
}

/// A verified payment notification
#[derive(Debug, Clone)]
pub struct PaymentNotification {
    pub order_code: i64,
    pub amount: i64,
    /// Provider result code; `"00"` when the transfer went through
    pub code: String,
    pub desc: String,
    pub reference: Option<String>,
    pub payment_link_id: Option<String>,
    pub transaction_time: Option<String>,
    /// All fields as received, signature removed
    pub fields: Map<String, Value>,
}

impl PaymentNotification {
    /// Parse a webhook payload. Call only after the signature has been verified.
    pub fn from_payload(payload: &Map<String, Value>) -> PaymentResult<Self> {
        let order_code = payload
            .get("orderCode")
            .and_then(as_integer)
            .ok_or_else(|| PaymentError::WebhookParseError("Missing orderCode".to_string()))?;

        let amount = payload.get("amount").and_then(as_integer).unwrap_or(0);

        // PayOS only notifies about received transfers, so a missing code means success
        let code = string_field(payload, "code").unwrap_or_else(|| SUCCESS_CODE.to_string());
        let desc = string_field(payload, "desc").unwrap_or_default();

        let mut fields = payload.clone();
        fields.remove(SIGNATURE_FIELD);

        Ok(Self {
            order_code,
            amount,
            code,
            desc,
            reference: string_field(payload, "reference"),
            payment_link_id: string_field(payload, "paymentLinkId"),
            transaction_time: string_field(payload, "transactionDateTime"),
            fields,
        })
    }

    /// Check if the payment went through
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(String::from)
}

/// Webhook notification handler trait
///
/// Implement this trait to react to payment outcomes.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when the provider confirms a payment
    fn on_payment_succeeded(&self, notification: &PaymentNotification) -> PaymentResult<()> {
        info!(
            "Payment succeeded: order={}, amount={}, reference={:?}",
            notification.order_code, notification.amount, notification.reference
        );
        Ok(())
    }

    /// Called when the provider reports a non-success code
    fn on_payment_failed(&self, notification: &PaymentNotification) -> PaymentResult<()> {
        warn!(
            "Payment failed: order={}, code={}, desc={}",
            notification.order_code, notification.code, notification.desc
        );
        Ok(())
    }
}

/// Default handler (just logs notifications)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a notification to the appropriate handler method
pub fn dispatch_notification(
    handler: &dyn WebhookHandler,
    notification: &PaymentNotification,
) -> PaymentResult<()> {
    if notification.is_success() {
        handler.on_payment_succeeded(notification)
    } else {
        handler.on_payment_failed(notification)
    }
}
