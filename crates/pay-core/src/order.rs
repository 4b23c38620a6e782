//! # Order Types
//!
//! Restaurant orders and the store that keeps them, keyed by order code.

use crate::error::{PaymentError, PaymentResult};
use crate::menu::MenuItem;
use crate::payment::{LineItem, PaymentLink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Largest quantity accepted on a single order line
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// A dish on an order, priced at the time it was ordered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
}

impl OrderItem {
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
        }
    }

    /// Line total, or `None` if it does not fit in an `i64`
    pub fn total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }

    /// Line item as sent to the payment provider
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.name.clone(), self.quantity, self.unit_price)
    }
}

/// Who is paying
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment
    #[default]
    Pending,
    /// Provider confirmed the payment
    Paid,
    /// Provider reported a failed payment
    PaymentFailed,
    /// Cancelled before payment
    Cancelled,
}

impl OrderStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Merchant order code, also used as the provider's orderCode
    pub order_code: i64,

    pub items: Vec<OrderItem>,

    /// Total in VND
    pub amount: i64,

    pub buyer: Buyer,

    /// Table number or label, for dine-in orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Free-form note for the kitchen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a pending order; the amount is the sum of the item totals.
    ///
    /// Quantities must lie in `1..=MAX_ITEM_QUANTITY` and the total must fit in an `i64`.
    pub fn new(order_code: i64, items: Vec<OrderItem>, buyer: Buyer) -> PaymentResult<Self> {
        let mut amount: i64 = 0;
        for item in &items {
            if !(1..=MAX_ITEM_QUANTITY).contains(&item.quantity) {
                return Err(PaymentError::InvalidRequest(format!(
                    "Quantity for {} must be between 1 and {}",
                    item.menu_item_id, MAX_ITEM_QUANTITY
                )));
            }
            amount = item
                .total()
                .and_then(|total| amount.checked_add(total))
                .ok_or_else(|| PaymentError::InvalidRequest("Order total is too large".to_string()))?;
        }

        Ok(Self {
            order_code,
            items,
            amount,
            buyer,
            table: None,
            note: None,
            status: OrderStatus::Pending,
            payment_link_id: None,
            checkout_url: None,
            created_at: Utc::now(),
            paid_at: None,
        })
    }

    /// Builder: set table
    pub fn at_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Builder: set kitchen note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Description shown on the provider's checkout page
    pub fn description(&self) -> String {
        format!("Order #{}", self.order_code)
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(OrderItem::line_item).collect()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn ensure_pending(&self) -> PaymentResult<()> {
        if self.status.is_final() {
            return Err(PaymentError::InvalidRequest(format!(
                "Order {} is already {:?}",
                self.order_code, self.status
            )));
        }
        Ok(())
    }
}

/// Persistence for orders, keyed by order code
pub trait OrderStore: Send + Sync {
    /// Allocate a fresh, positive order code
    fn next_order_code(&self) -> i64;

    fn insert(&self, order: Order) -> PaymentResult<()>;

    fn get(&self, order_code: i64) -> PaymentResult<Order>;

    /// All orders, newest first
    fn list(&self) -> PaymentResult<Vec<Order>>;

    fn attach_payment_link(&self, order_code: i64, link: &PaymentLink) -> PaymentResult<Order>;

    /// Mark an order paid. Repeating this on a paid order is a no-op.
    fn mark_paid(&self, order_code: i64) -> PaymentResult<Order>;

    fn mark_failed(&self, order_code: i64) -> PaymentResult<Order>;

    fn cancel(&self, order_code: i64) -> PaymentResult<Order>;

    /// Drop pending orders that never got a payment link and are older than
    /// `max_age`. Returns how many were removed.
    fn prune_abandoned(&self, max_age: Duration) -> PaymentResult<usize>;
}

/// Process-local order store.
///
/// Settled orders are kept for the life of the process. Pending orders whose
/// payment link was never created are only removed by `prune_abandoned`.
#[derive(Debug)]
pub struct InMemoryOrderStore {
    orders: RwLock<BTreeMap<i64, Order>>,
    next_code: AtomicI64,
}

impl InMemoryOrderStore {
    /// Order codes start from the current Unix time in milliseconds
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    pub fn starting_at(first_code: i64) -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_code: AtomicI64::new(first_code.max(1)),
        }
    }

    fn update<F>(&self, order_code: i64, apply: F) -> PaymentResult<Order>
    where
        F: FnOnce(&mut Order) -> PaymentResult<()>,
    {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let order = orders
            .get_mut(&order_code)
            .ok_or(PaymentError::OrderNotFound { order_code })?;
        apply(order)?;
        Ok(order.clone())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> PaymentError {
    PaymentError::Internal("order store lock poisoned".to_string())
}

impl OrderStore for InMemoryOrderStore {
    fn next_order_code(&self) -> i64 {
        self.next_code.fetch_add(1, Ordering::SeqCst)
    }

    fn insert(&self, order: Order) -> PaymentResult<()> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        if orders.contains_key(&order.order_code) {
            return Err(PaymentError::InvalidRequest(format!(
                "Order {} already exists",
                order.order_code
            )));
        }
        orders.insert(order.order_code, order);
        Ok(())
    }

    fn get(&self, order_code: i64) -> PaymentResult<Order> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        orders
            .get(&order_code)
            .cloned()
            .ok_or(PaymentError::OrderNotFound { order_code })
    }

    fn list(&self) -> PaymentResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.values().rev().cloned().collect())
    }

    fn attach_payment_link(&self, order_code: i64, link: &PaymentLink) -> PaymentResult<Order> {
        self.update(order_code, |order| {
            order.ensure_pending()?;
            order.payment_link_id = link.payment_link_id.clone();
            order.checkout_url = link.checkout_url.clone();
            Ok(())
        })
    }

    fn mark_paid(&self, order_code: i64) -> PaymentResult<Order> {
        self.update(order_code, |order| {
            if order.status == OrderStatus::Paid {
                return Ok(());
            }
            order.ensure_pending()?;
            order.status = OrderStatus::Paid;
            order.paid_at = Some(Utc::now());
            Ok(())
        })
    }

    fn mark_failed(&self, order_code: i64) -> PaymentResult<Order> {
        self.update(order_code, |order| {
            order.ensure_pending()?;
            order.status = OrderStatus::PaymentFailed;
            Ok(())
        })
    }

    fn cancel(&self, order_code: i64) -> PaymentResult<Order> {
        self.update(order_code, |order| {
            order.ensure_pending()?;
            order.status = OrderStatus::Cancelled;
            Ok(())
        })
    }

    fn prune_abandoned(&self, max_age: Duration) -> PaymentResult<usize> {
        let max_age = chrono::Duration::from_std(max_age)
            .map_err(|e| PaymentError::InvalidRequest(format!("Invalid max age: {}", e)))?;
        let cutoff = Utc::now() - max_age;

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        let before = orders.len();
        orders.retain(|_, order| {
            order.status != OrderStatus::Pending
                || order.payment_link_id.is_some()
                || order.checkout_url.is_some()
                || order.created_at > cutoff
        });
        Ok(before - orders.len())
    }
}
