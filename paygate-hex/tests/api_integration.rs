//! End-to-end tests for the HTTP API over an in-memory SQLite repository.
//!
//! These tests drive the full stack through the router: registration, the
//! card payment flow, session misses, and the period query contract.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use paygate_hex::{HttpNotifier, PaymentService, inbound::HttpServer};
use paygate_repo::{MemorySessionStore, SqliteRepo};
use tower::ServiceExt;

async fn test_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = PaymentService::new(repo, MemorySessionStore::new(), HttpNotifier::new());
    HttpServer::new(service).router()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_body(order_id: &str) -> serde_json::Value {
    serde_json::json!({
        "purpose": "Office chair, order #4711",
        "amount": "149.99",
        "orderId": order_id,
    })
}

fn card_body() -> serde_json::Value {
    serde_json::json!({
        "number": "4242424242424242",
        "cardholderName": "JANE A DOE",
        "expiryDate": "12/2030",
        "securityNumber": "123",
    })
}

async fn register(app: &Router, order_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/payment/register",
            register_body(order_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "Success");
    json["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_card_payment_flow() {
    let app = test_app().await;
    let session_id = register(&app, "order-1").await;

    // The card form serves the payment's amount and purpose.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/payment/card/{session_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let form = body_json(response).await;
    assert_eq!(form["amount"], "149.99");
    assert_eq!(form["purpose"], "Office chair, order #4711");

    // Submitting valid card data completes the payment.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/payment/card/{session_id}"),
            card_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "Success");

    // The payment now reads as completed.
    let response = app
        .clone()
        .oneshot(get_request("/api/payment/order-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["payment"]["status"], "Success");

    // The session was consumed by the completion.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/payment/card/{session_id}"),
            card_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/payment/register",
            serde_json::json!({
                "purpose": "abc",
                "amount": "12.345",
                "orderId": "",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Validation error occurred");
    assert!(json["errors"]["purpose"].is_array());
    assert!(json["errors"]["amount"].is_array());
    assert!(json["errors"]["orderId"].is_array());
}

#[tokio::test]
async fn test_duplicate_order_id_reported_on_field() {
    let app = test_app().await;
    register(&app, "order-1").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/payment/register",
            register_body("order-1"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["orderId"][0], "This value is already used.");
}

#[tokio::test]
async fn test_malformed_session_id_is_bad_request() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/payment/card/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "Invalid payment session.");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request(
            "/payment/card/67e55044-10b1-426f-9247-bb680e5fe0c8",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], "Payment session expired.");
}

#[tokio::test]
async fn test_invalid_card_is_rejected_and_payment_stays_pending() {
    let app = test_app().await;
    let session_id = register(&app, "order-1").await;

    let mut body = card_body();
    body["number"] = serde_json::json!("4242424242424241");
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/payment/card/{session_id}"),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["number"][0], "Invalid card number.");

    let response = app
        .clone()
        .oneshot(get_request("/api/payment/order-1"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["payment"]["status"].is_null());
}

#[tokio::test]
async fn test_session_create_requires_pending_payment() {
    let app = test_app().await;
    let session_id = register(&app, "order-1").await;

    // Pending payment: a second session can be opened.
    let response = app
        .clone()
        .oneshot(get_request("/api/session/create/order-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let second_session = json["sessionId"].as_str().unwrap();
    assert_ne!(second_session, session_id);
    assert_eq!(
        json["cardPaymentUrl"],
        format!("/payment/card/{second_session}")
    );

    // Complete the payment, then session creation stops.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/payment/card/{session_id}"),
            card_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/session/create/order-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_request("/api/session/create/order-404"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_period_query_contract() {
    let app = test_app().await;
    for i in 1..=3 {
        register(&app, &format!("order-{i}")).await;
    }

    // Everything falls inside a wide-open period.
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/period?startsOn=2000-01-01T00:00:00&endsOn=2100-01-01T00:00:00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["nextPageExists"], false);
    assert_eq!(json["payments"].as_array().unwrap().len(), 3);
    // Default fields only.
    assert!(json["payments"][0].get("createdAt").is_none());

    // A page past the end snaps back to page 1.
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/period?startsOn=2000-01-01T00:00:00&endsOn=2100-01-01T00:00:00&page=5&resOnPage=100",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["payments"].as_array().unwrap().len(), 3);

    // Pagination: two per page, second page holds the remainder.
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/period?startsOn=2000-01-01T00:00:00&endsOn=2100-01-01T00:00:00&page=1&resOnPage=2",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["nextPageExists"], true);
    assert_eq!(json["payments"].as_array().unwrap().len(), 2);

    // An empty period is a miss.
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/period?startsOn=1990-01-01T00:00:00&endsOn=1991-01-01T00:00:00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["status"],
        "No payments found for this period."
    );

    // Missing bounds are a validation failure.
    let response = app
        .clone()
        .oneshot(get_request("/api/payments/period"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payments_listing_with_order_expression() {
    let app = test_app().await;
    for (order_id, amount) in [("b-order", "30.00"), ("a-order", "10.00"), ("c-order", "20.00")] {
        let mut body = register_body(order_id);
        body["amount"] = serde_json::json!(amount);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/payment/register", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/payments?orderBy=asc_amount"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let amounts: Vec<&str> = json["payments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["amount"].as_str().unwrap())
        .collect();
    assert_eq!(amounts, ["10.00", "20.00", "30.00"]);
}

#[tokio::test]
async fn test_get_payment_miss_reports_order_id() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/payment/order-404"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Payment not found");
    assert_eq!(json["orderId"], "order-404");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api-docs/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "Paygate API");
    assert!(json["paths"]["/api/payment/register"].is_object());
}
