//! # pay-core
//!
//! Core types and traits for the tablepay ordering and payment engine.
//!
//! This crate provides:
//! - `PaymentGateway` trait for hosted-checkout payment providers
//! - `PaymentRequest`, `LineItem` and `PaymentLink` for payment link creation
//! - `Menu` and `MenuItem` for the restaurant menu
//! - `Order` and `OrderStore` for order bookkeeping
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Buyer, Order, OrderItem, PaymentRequest, PaymentGateway};
//!
//! let pho = menu.orderable("pho-bo")?;
//! let order = Order::new(store.next_order_code(), vec![OrderItem::from_menu_item(pho, 2)], buyer)?;
//!
//! let request = PaymentRequest::new(
//!     order.order_code,
//!     order.amount,
//!     order.description(),
//!     urls.return_url(order.order_code),
//!     urls.cancel_url(order.order_code),
//! )
//! .with_items(order.line_items());
//!
//! let link = gateway.create_payment_link(&request).await?;
//! // Redirect the customer to link.checkout_url
//! ```

pub mod error;
pub mod gateway;
pub mod menu;
pub mod order;
pub mod payment;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult, GENERIC_PAYMENT_FAILURE};
pub use gateway::{BoxedPaymentGateway, CheckoutUrls, PaymentGateway};
pub use menu::{Menu, MenuItem};
pub use order::{
    Buyer, InMemoryOrderStore, Order, OrderItem, OrderStatus, OrderStore, MAX_ITEM_QUANTITY,
};
pub use payment::{LineItem, PaymentLink, PaymentLinkResponse, PaymentRequest};
