//! HTTP API tests with a stubbed payment gateway

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use pay_api::{create_router, AppConfig, AppState};
use pay_core::{
    InMemoryOrderStore, Menu, MenuItem, OrderStatus, OrderStore, PaymentError, PaymentGateway,
    PaymentLink, PaymentRequest, PaymentResult,
};
use pay_payos::{sign_data, verify_webhook_signature};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

const CHECKSUM_KEY: &str = "secret";

/// Gateway that answers every request with a canned outcome
struct StubGateway {
    fail_with: Option<String>,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl StubGateway {
    fn succeeding() -> Self {
        Self {
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment_link(&self, request: &PaymentRequest) -> PaymentResult<PaymentLink> {
        request.validate()?;
        self.requests.lock().unwrap().push(request.clone());

        match &self.fail_with {
            Some(message) => Err(PaymentError::provider("payos", message.clone())),
            None => Ok(PaymentLink {
                order_code: request.order_code,
                payment_link_id: Some(format!("pl_{}", request.order_code)),
                checkout_url: Some(format!("https://pay.payos.vn/web/pl_{}", request.order_code)),
                qr_code_url: Some("qr_data".to_string()),
            }),
        }
    }

    fn verify_webhook(&self, payload: &Map<String, Value>) -> bool {
        verify_webhook_signature(payload, CHECKSUM_KEY)
    }

    fn provider_name(&self) -> &'static str {
        "payos"
    }
}

fn menu() -> Menu {
    Menu::new()
        .with_item(MenuItem::new("pho-bo", "Phở bò", 55000).in_category("Mains"))
        .with_item(MenuItem::new("tra-da", "Trà đá", 5000).in_category("Drinks"))
        .with_item(MenuItem::new("banh-xeo", "Bánh xèo", 40000).sold_out())
}

fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        frontend_url: "https://quan-an.vn/".to_string(),
        environment: "test".to_string(),
    }
}

fn server_with(gateway: Arc<StubGateway>) -> (TestServer, Arc<InMemoryOrderStore>) {
    let orders = Arc::new(InMemoryOrderStore::starting_at(1000));
    let state = AppState::with_parts(config(), gateway, menu(), orders.clone());
    let server = TestServer::new(create_router(state)).unwrap();
    (server, orders)
}

fn signed_webhook(order_code: i64, amount: i64, code: &str) -> Value {
    let mut fields = Map::new();
    fields.insert("orderCode".to_string(), json!(order_code));
    fields.insert("amount".to_string(), json!(amount));
    fields.insert("code".to_string(), json!(code));
    fields.insert("desc".to_string(), json!("success"));
    fields.insert("reference".to_string(), json!("FT123"));
    fields.insert("paymentLinkId".to_string(), json!(format!("pl_{}", order_code)));

    let signature = sign_data(&fields, CHECKSUM_KEY);
    fields.insert("signature".to_string(), json!(signature));
    Value::Object(fields)
}

fn order_body() -> Value {
    json!({
        "items": [
            { "menu_item_id": "pho-bo", "quantity": 2 },
            { "menu_item_id": "tra-da" }
        ],
        "buyer_name": "Lan",
        "buyer_email": "lan@example.com",
        "table": "7"
    })
}

#[tokio::test]
async fn test_health() {
    let (server, _) = server_with(Arc::new(StubGateway::succeeding()));

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "payos");
}

#[tokio::test]
async fn test_menu_lists_available_items() {
    let (server, _) = server_with(Arc::new(StubGateway::succeeding()));

    let body: Value = server.get("/api/v1/menu").await.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["sections"]["Mains"][0]["id"], "pho-bo");

    server.get("/api/v1/menu/tra-da").await.assert_status_ok();
    server
        .get("/api/v1/menu/bun-bo")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_order_creates_payment_link() {
    let gateway = Arc::new(StubGateway::succeeding());
    let (server, orders) = server_with(gateway.clone());

    let response = server.post("/api/v1/orders").json(&order_body()).await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "success": true,
        "order_code": 1000,
        "payment_link_id": "pl_1000",
        "checkout_url": "https://pay.payos.vn/web/pl_1000",
        "qr_code_url": "qr_data"
    }));

    let sent = gateway.requests.lock().unwrap()[0].clone();
    assert_eq!(sent.amount, 115000);
    assert_eq!(sent.description, "Order #1000");
    assert_eq!(sent.return_url, "https://quan-an.vn/payment/success?orderCode=1000");
    assert_eq!(sent.cancel_url, "https://quan-an.vn/payment/cancel?orderCode=1000");
    assert_eq!(sent.items.as_ref().map(Vec::len), Some(2));

    let order = orders.get(1000).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.table.as_deref(), Some("7"));
    assert_eq!(order.payment_link_id.as_deref(), Some("pl_1000"));
}

#[tokio::test]
async fn test_provider_failure_is_reported() {
    let (server, orders) = server_with(Arc::new(StubGateway::failing("Invalid amount")));

    let response = server.post("/api/v1/orders").json(&order_body()).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_json(&json!({ "success": false, "error": "Invalid amount" }));

    // the order is kept, still pending and without a link
    let order = orders.get(1000).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.checkout_url.is_none());
}

#[tokio::test]
async fn test_order_rejects_unknown_and_sold_out_items() {
    let (server, orders) = server_with(Arc::new(StubGateway::succeeding()));

    let unknown = json!({
        "items": [{ "menu_item_id": "bun-bo" }],
        "buyer_name": "Lan",
        "buyer_email": "lan@example.com"
    });
    server
        .post("/api/v1/orders")
        .json(&unknown)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let sold_out = json!({
        "items": [{ "menu_item_id": "banh-xeo" }],
        "buyer_name": "Lan",
        "buyer_email": "lan@example.com"
    });
    server
        .post("/api/v1/orders")
        .json(&sold_out)
        .await
        .assert_status(StatusCode::CONFLICT);

    let empty = json!({ "items": [], "buyer_name": "Lan", "buyer_email": "lan@example.com" });
    server
        .post("/api/v1/orders")
        .json(&empty)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(orders.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_order_rejects_oversized_quantity() {
    let gateway = Arc::new(StubGateway::succeeding());
    let (server, orders) = server_with(gateway.clone());

    let body = json!({
        "items": [
            { "menu_item_id": "pho-bo", "quantity": 4294967295u32 },
            { "menu_item_id": "pho-bo", "quantity": 4294967295u32 }
        ],
        "buyer_name": "Lan",
        "buyer_email": "lan@example.com"
    });
    let response = server.post("/api/v1/orders").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "success": false,
        "error": "Quantity for pho-bo must be between 1 and 999"
    }));

    assert!(orders.list().unwrap().is_empty());
    assert!(gateway.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_raw_payment_link() {
    let (server, _) = server_with(Arc::new(StubGateway::succeeding()));

    let request = json!({
        "orderCode": 42,
        "amount": 10000,
        "description": "Order #42",
        "buyerName": "Lan",
        "buyerEmail": "lan@example.com",
        "returnUrl": "https://x/return",
        "cancelUrl": "https://x/cancel"
    });
    let response = server.post("/api/v1/payments/links").json(&request).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["order_code"], 42);

    let mut invalid = request.clone();
    invalid["amount"] = json!(0);
    let response = server.post("/api/v1/payments/links").json(&invalid).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_webhook_marks_order_paid() {
    let (server, orders) = server_with(Arc::new(StubGateway::succeeding()));
    server.post("/api/v1/orders").json(&order_body()).await.assert_status_ok();

    let response = server
        .post("/webhook/payos")
        .json(&signed_webhook(1000, 115000, "00"))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));

    let order = orders.get(1000).unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.paid_at.is_some());

    // redelivery is harmless
    server
        .post("/webhook/payos")
        .json(&signed_webhook(1000, 115000, "00"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_webhook_failure_code_marks_order_failed() {
    let (server, orders) = server_with(Arc::new(StubGateway::succeeding()));
    server.post("/api/v1/orders").json(&order_body()).await.assert_status_ok();

    server
        .post("/webhook/payos")
        .json(&signed_webhook(1000, 115000, "01"))
        .await
        .assert_status_ok();

    assert_eq!(orders.get(1000).unwrap().status, OrderStatus::PaymentFailed);
}

#[tokio::test]
async fn test_webhook_underpayment_keeps_order_pending() {
    let (server, orders) = server_with(Arc::new(StubGateway::succeeding()));
    server.post("/api/v1/orders").json(&order_body()).await.assert_status_ok();

    server
        .post("/webhook/payos")
        .json(&signed_webhook(1000, 100000, "00"))
        .await
        .assert_status_ok();

    assert_eq!(orders.get(1000).unwrap().status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let (server, orders) = server_with(Arc::new(StubGateway::succeeding()));
    server.post("/api/v1/orders").json(&order_body()).await.assert_status_ok();

    let mut payload = signed_webhook(1000, 115000, "00");
    payload["amount"] = json!(1);

    server
        .post("/webhook/payos")
        .json(&payload)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let mut unsigned = signed_webhook(1000, 115000, "00");
    unsigned.as_object_mut().unwrap().remove("signature");
    server
        .post("/webhook/payos")
        .json(&unsigned)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(orders.get(1000).unwrap().status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_webhook_for_unknown_order_is_acknowledged() {
    let (server, _) = server_with(Arc::new(StubGateway::succeeding()));

    server
        .post("/webhook/payos")
        .json(&signed_webhook(123, 2000, "00"))
        .await
        .assert_status_ok();

    server
        .post("/webhook/payos")
        .text("not json")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_cancel_order() {
    let (server, _) = server_with(Arc::new(StubGateway::succeeding()));
    server.post("/api/v1/orders").json(&order_body()).await.assert_status_ok();

    let order: Value = server.get("/api/v1/orders/1000").await.json();
    assert_eq!(order["amount"], 115000);
    assert_eq!(order["status"], "pending");

    let listed: Value = server.get("/api/v1/orders").await.json();
    assert_eq!(listed["count"], 1);

    let cancelled: Value = server.post("/api/v1/orders/1000/cancel").await.json();
    assert_eq!(cancelled["status"], "cancelled");

    server
        .post("/api/v1/orders/1000/cancel")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/v1/orders/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
