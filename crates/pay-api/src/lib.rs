//! # pay-api
//!
//! HTTP API layer for tablepay-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the menu, orders and payment links
//! - PayOS webhook handling that settles orders
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/menu` | Available menu items |
//! | GET | `/api/v1/menu/{item_id}` | Get menu item |
//! | POST | `/api/v1/orders` | Place order, create payment link |
//! | GET | `/api/v1/orders` | List orders |
//! | GET | `/api/v1/orders/{order_code}` | Get order |
//! | POST | `/api/v1/orders/{order_code}/cancel` | Cancel pending order |
//! | POST | `/api/v1/payments/links` | Create payment link |
//! | POST | `/webhook/payos` | PayOS webhook |

pub mod fulfillment;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
