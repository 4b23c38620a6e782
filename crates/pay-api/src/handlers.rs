//! # Request Handlers
//!
//! Axum request handlers for the ordering and payment API.

use crate::fulfillment::OrderFulfillment;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::{
    Buyer, Order, OrderItem, PaymentError, PaymentLink, PaymentLinkResponse, PaymentRequest,
    PaymentResult, MAX_ITEM_QUANTITY,
};
use pay_payos::{dispatch_notification, PaymentNotification};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Place order request
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Dishes to order
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub buyer_name: String,
    pub buyer_email: String,
    #[serde(default)]
    pub buyer_phone: Option<String>,
    /// Table number or label (dine-in)
    #[serde(default)]
    pub table: Option<String>,
    /// Note for the kitchen
    #[serde(default)]
    pub note: Option<String>,
}

/// Item in place order request
#[derive(Debug, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Pending orders without a payment link are dropped after this long
const ABANDONED_ORDER_AGE: Duration = Duration::from_secs(60 * 60);

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_of(err: &PaymentError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    (status_of(&err), Json(ErrorResponse::new(err.to_string(), code)))
}

/// Payment link outcome with a status matching the failure, if any
fn link_response(result: PaymentResult<PaymentLink>) -> (StatusCode, Json<PaymentLinkResponse>) {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => status_of(err),
    };
    (status, Json(PaymentLinkResponse::from(result)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tablepay",
        "provider": state.gateway.provider_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List available menu items, also grouped by category
pub async fn list_menu(State(state): State<AppState>) -> impl IntoResponse {
    let items: Vec<_> = state.menu.available_items().collect();
    Json(serde_json::json!({
        "items": items,
        "sections": state.menu.by_category(),
        "count": items.len()
    }))
}

/// Get single menu item
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.menu.get(&item_id).ok_or_else(|| {
        payment_error_to_response(PaymentError::MenuItemNotFound {
            item_id: item_id.clone(),
        })
    })?;

    Ok(Json(item.clone()))
}

/// Build an order from the request against the current menu
fn build_order(state: &AppState, request: &PlaceOrderRequest) -> PaymentResult<Order> {
    if request.items.is_empty() {
        return Err(PaymentError::InvalidRequest("No items in order".to_string()));
    }

    let mut items = Vec::with_capacity(request.items.len());
    for line in &request.items {
        if !(1..=MAX_ITEM_QUANTITY).contains(&line.quantity) {
            return Err(PaymentError::InvalidRequest(format!(
                "Quantity for {} must be between 1 and {}",
                line.menu_item_id, MAX_ITEM_QUANTITY
            )));
        }
        let menu_item = state.menu.orderable(&line.menu_item_id)?;
        items.push(OrderItem::from_menu_item(menu_item, line.quantity));
    }

    let buyer = Buyer {
        name: request.buyer_name.clone(),
        email: request.buyer_email.clone(),
        phone: request.buyer_phone.clone(),
    };

    let mut order = Order::new(state.orders.next_order_code(), items, buyer)?;
    if let Some(table) = &request.table {
        order = order.at_table(table.clone());
    }
    if let Some(note) = &request.note {
        order = order.with_note(note.clone());
    }
    Ok(order)
}

/// Place an order and create its payment link
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> (StatusCode, Json<PaymentLinkResponse>) {
    match state.orders.prune_abandoned(ABANDONED_ORDER_AGE) {
        Ok(0) => {}
        Ok(pruned) => info!("Pruned {} abandoned orders", pruned),
        Err(e) => warn!("Failed to prune abandoned orders: {}", e),
    }

    let order = match build_order(&state, &request).and_then(|order| {
        state.orders.insert(order.clone())?;
        Ok(order)
    }) {
        Ok(order) => order,
        Err(e) => {
            warn!("Rejected order: {}", e);
            return link_response(Err(e));
        }
    };

    let code = order.order_code;
    let mut payment = PaymentRequest::new(
        code,
        order.amount,
        order.description(),
        state.urls.return_url(code),
        state.urls.cancel_url(code),
    )
    .with_buyer(order.buyer.name.clone(), order.buyer.email.clone())
    .with_items(order.line_items());
    if let Some(phone) = &order.buyer.phone {
        payment = payment.with_phone(phone.clone());
    }

    info!(
        "Placing order {}: {} items, total={} VND",
        code,
        order.item_count(),
        order.amount
    );

    let result = state.gateway.create_payment_link(&payment).await;

    // the order stays pending without a link when creation fails
    let result = result.and_then(|link| {
        state.orders.attach_payment_link(code, &link)?;
        Ok(link)
    });

    if let Err(e) = &result {
        error!("Failed to create payment link for order {}: {}", code, e);
    }

    link_response(result)
}

/// Create a payment link for an arbitrary payment request
#[instrument(skip(state, request), fields(order_code = request.order_code))]
pub async fn create_payment_link(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> (StatusCode, Json<PaymentLinkResponse>) {
    let result = state.gateway.create_payment_link(&request).await;
    if let Err(e) = &result {
        error!("Failed to create payment link: {}", e);
    }
    link_response(result)
}

/// List all orders, newest first
pub async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state.orders.list().map_err(payment_error_to_response)?;
    Ok(Json(serde_json::json!({
        "orders": orders,
        "count": orders.len()
    })))
}

/// Get single order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_code): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .orders
        .get(order_code)
        .map_err(payment_error_to_response)?;
    Ok(Json(order))
}

/// Cancel a pending order
#[instrument(skip(state))]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_code): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .orders
        .cancel(order_code)
        .map_err(payment_error_to_response)?;
    info!("Cancelled order {}", order_code);
    Ok(Json(order))
}

/// Handle PayOS webhook
#[instrument(skip(state, body))]
pub async fn payos_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Webhook body must be a JSON object", 400).with_details(e.to_string())),
        )
    })?;

    if !state.gateway.verify_webhook(&payload) {
        warn!("Rejected webhook with invalid signature");
        return Err(payment_error_to_response(
            PaymentError::WebhookVerificationFailed("Invalid signature".to_string()),
        ));
    }

    let notification = PaymentNotification::from_payload(&payload).map_err(|e| {
        error!("Webhook parse failed: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Received webhook: order={}, code={}",
        notification.order_code, notification.code
    );

    let handler = OrderFulfillment::new(state.orders.as_ref());
    dispatch_notification(&handler, &notification).map_err(|e| {
        error!("Webhook handler error: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(serde_json::json!({ "success": true })))
}
