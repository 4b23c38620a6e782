//! # PayOS Payment Links
//!
//! Creates hosted checkout links through `POST /v2/payment-requests`.
//!
//! Only `amount`, `cancelUrl`, `description`, `orderCode` and `returnUrl` are
//! signed. Buyer details, items and `expiredAt` travel unsigned; PayOS rejects
//! signatures computed over any other field set.

use crate::config::PayOsConfig;
use crate::signature::sign_data;
use crate::webhook::verify_webhook_signature;
use async_trait::async_trait;
use chrono::Utc;
use pay_core::{
    LineItem, PaymentError, PaymentGateway, PaymentLink, PaymentRequest, PaymentResult,
    GENERIC_PAYMENT_FAILURE,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument, warn};

pub const PROVIDER: &str = "payos";

/// Provider code for a successful call
pub const SUCCESS_CODE: &str = "00";

/// PayOS hosted checkout gateway
pub struct PayOsGateway {
    config: PayOsConfig,
    client: Client,
}

impl PayOsGateway {
    /// Create a new PayOS gateway
    pub fn new(config: PayOsConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(PayOsConfig::from_env()?)
    }

    pub fn config(&self) -> &PayOsConfig {
        &self.config
    }

    /// Build the signed request body. `now` is the current Unix time in seconds.
    pub fn build_payload(&self, request: &PaymentRequest, now: i64) -> SignedPayload {
        let signature = sign_data(&signing_fields(request), &self.config.checksum_key);

        SignedPayload {
            order_code: request.order_code,
            amount: request.amount,
            description: request.description.clone(),
            buyer_name: request.buyer_name.clone(),
            buyer_email: request.buyer_email.clone(),
            buyer_phone: request.buyer_phone.clone(),
            items: request.effective_items(),
            cancel_url: request.cancel_url.clone(),
            return_url: request.return_url.clone(),
            expired_at: now + self.config.link_ttl_secs,
            signature,
        }
    }
}

/// The fields PayOS expects inside the request signature
pub fn signing_fields(request: &PaymentRequest) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("amount".to_string(), json!(request.amount));
    fields.insert("cancelUrl".to_string(), json!(request.cancel_url));
    fields.insert("description".to_string(), json!(request.description));
    fields.insert("orderCode".to_string(), json!(request.order_code));
    fields.insert("returnUrl".to_string(), json!(request.return_url));
    fields
}

/// Turn a PayOS response body into a payment link or an error
pub fn interpret_response(order_code: i64, body: &str) -> PaymentResult<PaymentLink> {
    let response: PayOsResponse = serde_json::from_str(body).map_err(|e| {
        PaymentError::Serialization(format!("Failed to parse PayOS response: {}", e))
    })?;

    if response.code.as_deref() != Some(SUCCESS_CODE) {
        let message = non_empty(response.message)
            .or_else(|| non_empty(response.desc))
            .unwrap_or_else(|| GENERIC_PAYMENT_FAILURE.to_string());
        return Err(PaymentError::provider(PROVIDER, message));
    }

    let data = response.data.unwrap_or_default();
    if data.checkout_url.is_none() {
        warn!(order_code, "PayOS accepted the request but returned no checkout URL");
    }

    Ok(PaymentLink {
        order_code,
        payment_link_id: data_text(data.id).or_else(|| data_text(data.payment_link_id)),
        checkout_url: data.checkout_url,
        qr_code_url: data.qr_code,
    })
}

/// Scalar `data` field as text; numeric ids are rendered in decimal
fn data_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl PaymentGateway for PayOsGateway {
    #[instrument(skip(self, request), fields(order_code = request.order_code, amount = request.amount))]
    async fn create_payment_link(&self, request: &PaymentRequest) -> PaymentResult<PaymentLink> {
        request.validate()?;

        let payload = self.build_payload(request, Utc::now().timestamp());

        debug!(
            "Creating PayOS payment link: {} items, expires_at={}",
            payload.items.len(),
            payload.expired_at
        );

        let response = self
            .client
            .post(self.config.payment_requests_url())
            .header("x-client-id", &self.config.client_id)
            .header("x-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("PayOS request failed: {}", e);
                PaymentError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let link = interpret_response(request.order_code, &body).map_err(|e| {
            error!("PayOS rejected payment link: status={}, error={}", status, e);
            e
        })?;

        info!(
            "Created PayOS payment link: id={:?}, url={:?}",
            link.payment_link_id, link.checkout_url
        );

        Ok(link)
    }

    fn verify_webhook(&self, payload: &Map<String, Value>) -> bool {
        verify_webhook_signature(payload, &self.config.checksum_key)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// PayOS API Types
// =============================================================================

/// Request body for `POST /v2/payment-requests`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayload {
    pub order_code: i64,
    pub amount: i64,
    pub description: String,
    pub buyer_name: String,
    pub buyer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
    pub items: Vec<LineItem>,
    pub cancel_url: String,
    pub return_url: String,
    pub expired_at: i64,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
struct PayOsResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    data: Option<PayOsLinkData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayOsLinkData {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    payment_link_id: Option<Value>,
    #[serde(default)]
    checkout_url: Option<String>,
    #[serde(default)]
    qr_code: Option<String>,
}
