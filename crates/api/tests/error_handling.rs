//! Error envelope and routing fallbacks.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp, SHOP};

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::new().await;
    let response = app.get("/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_without_shop_header_is_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .post_webhook("/webhooks/app/uninstalled", None, serde_json::json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("X-Shopify-Shop-Domain"));
}

#[tokio::test]
async fn webhook_with_invalid_shop_is_validation_error() {
    let app = TestApp::new().await;
    let response = app
        .post_webhook(
            "/webhooks/app/uninstalled",
            Some("evil.example.com"),
            serde_json::json!({}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn scopes_update_with_malformed_body_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .post_webhook(
            "/webhooks/app/scopes_update",
            Some(SHOP),
            serde_json::json!({ "current": "not-a-list" }),
        )
        .await;
    assert!(response.status().is_client_error());
}
