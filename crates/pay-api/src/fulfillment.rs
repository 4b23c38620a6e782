//! # Order Fulfillment
//!
//! Webhook handler that moves stored orders to their paid or failed state.

use pay_core::{OrderStore, PaymentError, PaymentResult};
use pay_payos::{PaymentNotification, WebhookHandler};
use tracing::{info, warn};

/// Applies verified payment notifications to the order store.
///
/// A success notification for less than the order total leaves the order
/// pending; overpayment is logged and accepted.
pub struct OrderFulfillment<'a> {
    orders: &'a dyn OrderStore,
}

impl<'a> OrderFulfillment<'a> {
    pub fn new(orders: &'a dyn OrderStore) -> Self {
        Self { orders }
    }
}

/// Unknown orders (PayOS sends a test notification when the webhook URL is
/// registered) and orders already closed are acknowledged, not retried.
fn acknowledge_stale(order_code: i64, result: PaymentResult<()>) -> PaymentResult<()> {
    match result {
        Err(PaymentError::OrderNotFound { .. }) => {
            warn!(order_code, "Notification for unknown order");
            Ok(())
        }
        Err(PaymentError::InvalidRequest(reason)) => {
            warn!(order_code, %reason, "Notification for closed order ignored");
            Ok(())
        }
        other => other,
    }
}

impl WebhookHandler for OrderFulfillment<'_> {
    fn on_payment_succeeded(&self, notification: &PaymentNotification) -> PaymentResult<()> {
        let code = notification.order_code;
        let order = match self.orders.get(code) {
            Ok(order) => order,
            Err(e) => return acknowledge_stale(code, Err(e)),
        };

        if notification.amount < order.amount {
            warn!(
                order_code = code,
                expected = order.amount,
                received = notification.amount,
                "Underpaid notification, order left pending"
            );
            return Ok(());
        }
        if notification.amount > order.amount {
            warn!(
                order_code = code,
                expected = order.amount,
                received = notification.amount,
                "Paid amount exceeds order total"
            );
        }

        let result = self.orders.mark_paid(code).map(|_| {
            info!(order_code = code, reference = ?notification.reference, "Order paid");
        });
        acknowledge_stale(code, result)
    }

    fn on_payment_failed(&self, notification: &PaymentNotification) -> PaymentResult<()> {
        let code = notification.order_code;
        let result = self.orders.mark_failed(code).map(|_| {
            warn!(order_code = code, desc = %notification.desc, "Order payment failed");
        });
        acknowledge_stale(code, result)
    }
}
