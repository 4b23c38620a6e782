//! # Payment Types
//!
//! Payment request and payment link types shared by gateways and the API.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// A line item as the payment provider sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price in the smallest currency unit
    pub price: i64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Request to create a hosted payment link for one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Merchant-side order code (positive integer)
    pub order_code: i64,

    /// Amount in the smallest currency unit
    pub amount: i64,

    /// Short description shown on the checkout page
    pub description: String,

    pub buyer_name: String,

    pub buyer_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,

    /// Redirect after successful payment
    pub return_url: String,

    /// Redirect after cancellation or failure
    pub cancel_url: String,

    /// Ordered line items; a single synthetic item is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

impl PaymentRequest {
    /// Create a request with the required fields
    pub fn new(
        order_code: i64,
        amount: i64,
        description: impl Into<String>,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            order_code,
            amount,
            description: description.into(),
            buyer_name: String::new(),
            buyer_email: String::new(),
            buyer_phone: None,
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
            items: None,
        }
    }

    /// Builder: set buyer name and email
    pub fn with_buyer(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.buyer_name = name.into();
        self.buyer_email = email.into();
        self
    }

    /// Builder: set buyer phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.buyer_phone = Some(phone.into());
        self
    }

    /// Builder: set line items
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = Some(items);
        self
    }

    /// Line items to send, falling back to one item built from the
    /// description and amount.
    pub fn effective_items(&self) -> Vec<LineItem> {
        match &self.items {
            Some(items) => items.clone(),
            None => vec![LineItem::new(self.description.clone(), 1, self.amount)],
        }
    }

    /// Reject requests the provider would refuse anyway
    pub fn validate(&self) -> PaymentResult<()> {
        if self.order_code <= 0 {
            return Err(PaymentError::InvalidRequest(
                "orderCode must be a positive integer".to_string(),
            ));
        }
        if self.amount <= 0 {
            return Err(PaymentError::InvalidRequest(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A hosted payment link created by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub order_code: i64,

    /// Provider's payment link id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link_id: Option<String>,

    /// URL to redirect the customer to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    /// QR code payload for bank-app scanning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
}

/// Wire shape of a payment link creation outcome.
///
/// Serializes as `{"success": true, ...link}` or `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentLinkResponse {
    pub success: bool,

    #[serde(flatten)]
    pub link: Option<PaymentLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentLinkResponse {
    pub fn created(link: PaymentLink) -> Self {
        Self {
            success: true,
            link: Some(link),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            link: None,
            error: Some(error.into()),
        }
    }
}

impl From<PaymentResult<PaymentLink>> for PaymentLinkResponse {
    fn from(result: PaymentResult<PaymentLink>) -> Self {
        match result {
            Ok(link) => Self::created(link),
            Err(err) => Self::failed(err.public_message()),
        }
    }
}
