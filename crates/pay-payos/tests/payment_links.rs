//! PayOS payment-request contract tests against a mock server

use chrono::Utc;
use pay_core::{
    LineItem, PaymentError, PaymentGateway, PaymentLinkResponse, PaymentRequest,
    GENERIC_PAYMENT_FAILURE,
};
use pay_payos::{PayOsConfig, PayOsGateway};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SIGNATURE_OF_ORDER_1: &str =
    "3dfbe56784da9fc585edc01b3942124b328e58fd3403c3935155109790d8acef";

fn gateway_for(base_url: &str) -> PayOsGateway {
    let config = PayOsConfig::new("client-1", "key-1", "secret").with_api_base_url(base_url);
    PayOsGateway::new(config).expect("client builds")
}

fn request() -> PaymentRequest {
    PaymentRequest::new(123, 10000, "Order #1", "https://x/return", "https://x/cancel")
        .with_buyer("Lan", "lan@example.com")
}

#[tokio::test]
async fn test_creates_payment_link() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/payment-requests"))
        .and(header("x-client-id", "client-1"))
        .and(header("x-api-key", "key-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "00",
            "desc": "success",
            "data": { "id": "pl_1", "checkoutUrl": "https://pay/x", "qrCode": "qr_data" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway_for(&server.uri()).create_payment_link(&request()).await;

    assert_eq!(
        serde_json::to_value(PaymentLinkResponse::from(result)).unwrap(),
        json!({
            "success": true,
            "order_code": 123,
            "payment_link_id": "pl_1",
            "checkout_url": "https://pay/x",
            "qr_code_url": "qr_data"
        })
    );
}

#[tokio::test]
async fn test_sends_signed_body_with_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/payment-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "00", "data": {} })))
        .mount(&server)
        .await;

    let before = Utc::now().timestamp();
    gateway_for(&server.uri())
        .create_payment_link(&request().with_items(vec![LineItem::new("Phở bò", 2, 5000)]))
        .await
        .unwrap();
    let after = Utc::now().timestamp();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = received[0].body_json().unwrap();

    assert_eq!(body["signature"], SIGNATURE_OF_ORDER_1);
    assert_eq!(body["orderCode"], 123);
    assert_eq!(body["buyerName"], "Lan");
    assert_eq!(body["items"][0]["name"], "Phở bò");

    let expired_at = body["expiredAt"].as_i64().unwrap();
    assert!(expired_at >= before + 900 && expired_at <= after + 900);
}

#[tokio::test]
async fn test_provider_failure_surfaces_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/payment-requests"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": "01", "message": "Invalid amount" })),
        )
        .mount(&server)
        .await;

    let result = gateway_for(&server.uri()).create_payment_link(&request()).await;

    assert_eq!(
        serde_json::to_value(PaymentLinkResponse::from(result)).unwrap(),
        json!({ "success": false, "error": "Invalid amount" })
    );
}

#[tokio::test]
async fn test_unparseable_response_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/payment-requests"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = gateway_for(&server.uri())
        .create_payment_link(&request())
        .await
        .unwrap_err();

    assert_eq!(err.public_message(), GENERIC_PAYMENT_FAILURE);
}

#[tokio::test]
async fn test_network_failure_is_retryable() {
    // nothing listens on port 1
    let err = gateway_for("http://127.0.0.1:1")
        .create_payment_link(&request())
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::NetworkError(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_request_never_reaches_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = request();
    bad.amount = 0;

    let err = gateway_for(&server.uri())
        .create_payment_link(&bad)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::InvalidRequest(_)));
}
