//! # Routes
//!
//! Axum router configuration for the ordering and payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Menu:
///   - GET  /api/v1/menu - Available menu items
///   - GET  /api/v1/menu/{item_id} - Get menu item
///
/// - Orders:
///   - POST /api/v1/orders - Place order and create payment link
///   - GET  /api/v1/orders - List orders
///   - GET  /api/v1/orders/{order_code} - Get order
///   - POST /api/v1/orders/{order_code}/cancel - Cancel pending order
///
/// - Payments:
///   - POST /api/v1/payments/links - Create payment link for a raw request
///
/// - Webhooks:
///   - POST /webhook/payos - PayOS payment notifications
pub fn create_router(state: AppState) -> Router {
    // The storefront and admin dashboard are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Menu
        .route("/menu", get(handlers::list_menu))
        .route("/menu/{item_id}", get(handlers::get_menu_item))
        // Orders
        .route("/orders", get(handlers::list_orders).post(handlers::place_order))
        .route("/orders/{order_code}", get(handlers::get_order))
        .route("/orders/{order_code}/cancel", post(handlers::cancel_order))
        // Payments
        .route("/payments/links", post(handlers::create_payment_link));

    // Webhook routes (no CORS, must accept raw body)
    let webhook_routes = Router::new().route("/payos", post(handlers::payos_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes.layer(cors))
        .nest("/webhook", webhook_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
