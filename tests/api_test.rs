use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use flounderx_preorder::config::Config;
use flounderx_preorder::gateway::{CONFIRM_PAYMENT_PATH, CREATE_INTENT_PATH};
use flounderx_preorder::{create_app, AppState};
use mockito::Server;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_for(payment_api_url: String) -> Router {
    let config = Config {
        payment_api_url,
        ..Config::default()
    };
    create_app(AppState::from_config(&config))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn full_draft(amount: Value) -> Value {
    json!({
        "email": "fan@example.com",
        "amount": amount,
        "card_name": "Ada Lovelace",
        "card_number": "4242424242424242",
        "expiry": "0927",
        "cvc": "123"
    })
}

#[tokio::test]
async fn test_campaign_starts_at_base_offset() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = send(&app, "GET", "/api/campaign", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supporters"], 0);
    assert_eq!(body["total_raised"], "2795.00");
    assert_eq!(body["bonus_percent"], 20);
    assert_eq!(body["minimum_amount"], "10.00");
}

#[tokio::test]
async fn test_draft_patch_formats_card_fields() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/preorder/draft",
        Some(json!({ "card_number": "4242424242424242", "expiry": "0927", "cvc": "98765" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card_number"], "4242 4242 4242 4242");
    assert_eq!(body["expiry"], "09/27");
    assert_eq!(body["cvc"], "987");

    let (_, view) = send(&app, "GET", "/api/preorder", None).await;
    assert_eq!(view["draft"]["expiry"], "09/27");
    assert_eq!(view["loading"], false);
    assert_eq!(view["success"], false);
}

#[tokio::test]
async fn test_malformed_patch_is_a_bad_request() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/preorder/draft",
        Some(json!({ "coupon": "FREE" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_submit_with_missing_fields_is_rejected() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/preorder",
        Some(json!({ "email": "fan@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please fill in all fields");

    let (_, view) = send(&app, "GET", "/api/preorder", None).await;
    assert_eq!(view["error"], "Please fill in all fields");
}

#[tokio::test]
async fn test_submit_confirms_and_lists_the_order() {
    let mut server = Server::new_async().await;
    let _intent = server
        .mock("POST", CREATE_INTENT_PATH)
        .with_status(200)
        .with_body(r#"{"clientSecret": "pi_9_secret_z"}"#)
        .create_async()
        .await;
    let _confirm = server
        .mock("POST", CONFIRM_PAYMENT_PATH)
        .with_status(200)
        .with_body(r#"{"success": true, "order": {"id": "ord_9"}}"#)
        .create_async()
        .await;

    let app = app_for(server.url());

    let (status, order) = send(&app, "POST", "/api/preorder", Some(full_draft(json!(25)))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["id"], "ord_9");
    assert_eq!(order["amount"], "25.00");
    assert_eq!(order["bonus"], "5.00");
    assert_eq!(order["card_last4"], "4242");

    let (_, orders) = send(&app, "GET", "/api/orders", None).await;
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    assert_eq!(orders[0]["id"], "ord_9");

    let (_, campaign) = send(&app, "GET", "/api/campaign", None).await;
    assert_eq!(campaign["supporters"], 1);
    assert_eq!(campaign["total_raised"], "2820.00");

    let (_, view) = send(&app, "GET", "/api/preorder", None).await;
    assert_eq!(view["success"], true);
    assert_eq!(
        view["success_message"],
        "Payment successful! Check your email for details."
    );
    assert_eq!(view["draft"]["email"], "");
}

#[tokio::test]
async fn test_declined_payment_maps_to_payment_required() {
    let mut server = Server::new_async().await;
    let _intent = server
        .mock("POST", CREATE_INTENT_PATH)
        .with_status(200)
        .with_body(r#"{"clientSecret": "pi_9_secret_z"}"#)
        .create_async()
        .await;
    let _confirm = server
        .mock("POST", CONFIRM_PAYMENT_PATH)
        .with_status(402)
        .with_body(r#"{"success": false, "error": "card declined"}"#)
        .create_async()
        .await;

    let app = app_for(server.url());

    let (status, body) = send(&app, "POST", "/api/preorder", Some(full_draft(json!("25")))).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "card declined");

    let (_, orders) = send(&app, "GET", "/api/orders", None).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_rejected_intent_maps_to_bad_gateway() {
    let mut server = Server::new_async().await;
    let _intent = server
        .mock("POST", CREATE_INTENT_PATH)
        .with_status(503)
        .create_async()
        .await;

    let app = app_for(server.url());

    let (status, body) = send(&app, "POST", "/api/preorder", Some(full_draft(json!(25)))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to create payment intent");
}

#[tokio::test]
async fn test_health_reports_payment_api() {
    let mut server = Server::new_async().await;
    let _root = server.mock("GET", "/").with_status(200).create_async().await;

    let app = app_for(server.url());

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["payment_api"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degrades_when_payment_api_is_down() {
    let app = app_for("http://127.0.0.1:9".to_string());

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}
