//! Integration tests for the landing page, login and session gating.

mod common;

use axum::http::StatusCode;
use common::{body_json, redirect_location, TestApp, SHOP};
use shopkeep_api::handlers::auth::{INVALID_SHOP, MISSING_SHOP};
use shopkeep_core::session::{offline_session_id, Session};
use shopkeep_core::session_storage::SessionStorage;

// ---------------------------------------------------------------------------
// Landing and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn landing_without_shop_shows_form() {
    let app = TestApp::new().await;
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["show_form"], true);
}

#[tokio::test]
async fn landing_with_shop_forwards_query_to_app() {
    let app = TestApp::new().await;
    let response = app.get("/?shop=a.myshopify.com&host=abc").await;
    assert_eq!(
        redirect_location(&response),
        "/app?shop=a.myshopify.com&host=abc"
    );
}

#[tokio::test]
async fn login_page_without_shop_has_no_errors() {
    let app = TestApp::new().await;
    let json = body_json(app.get("/auth/login").await).await;
    assert_eq!(json["data"]["errors"], serde_json::json!({}));
}

#[tokio::test]
async fn login_with_blank_shop_reports_missing() {
    let app = TestApp::new().await;
    let json = body_json(app.post_form("/auth/login", "shop=++").await).await;
    assert_eq!(json["data"]["errors"]["shop"], MISSING_SHOP);
}

#[tokio::test]
async fn login_with_invalid_shop_reports_invalid() {
    let app = TestApp::new().await;
    let json = body_json(app.post_form("/auth/login", "shop=not-a-shop.com").await).await;
    assert_eq!(json["data"]["errors"]["shop"], INVALID_SHOP);
}

#[tokio::test]
async fn login_with_valid_shop_redirects_sanitized() {
    let app = TestApp::new().await;
    let response = app
        .post_form("/auth/login", "shop=https%3A%2F%2FA.myshopify.com%2F")
        .await;
    assert_eq!(redirect_location(&response), "/app?shop=a.myshopify.com");
}

// ---------------------------------------------------------------------------
// Session gating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn app_without_shop_redirects_to_login() {
    let app = TestApp::new().await;
    let response = app.get("/app").await;
    assert_eq!(redirect_location(&response), "/auth/login");
}

#[tokio::test]
async fn app_without_session_redirects_with_shop() {
    let app = TestApp::new().await;
    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(redirect_location(&response), "/auth/login?shop=a.myshopify.com");
}

#[tokio::test]
async fn app_with_active_session_returns_shell() {
    let app = TestApp::new().await;
    app.install(SHOP).await;

    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["shop"], SHOP);
    assert_eq!(json["data"]["api_key"], "test-api-key");
}

#[tokio::test]
async fn shop_header_is_accepted_without_query() {
    let app = TestApp::new().await;
    app.install(SHOP).await;

    let request = axum::http::Request::get("/app")
        .header("x-shopify-shop-domain", SHOP)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_missing_required_scope_redirects() {
    let app = TestApp::new().await;
    let mut session = Session::new(offline_session_id(SHOP), SHOP, "", false);
    session.scope = Some("read_products".into());
    session.access_token = Some("shpat_test".into());
    assert!(app.sessions.store_session(session).await);

    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(redirect_location(&response), "/auth/login?shop=a.myshopify.com");
}

#[tokio::test]
async fn session_without_token_redirects() {
    let app = TestApp::new().await;
    let mut session = Session::new(offline_session_id(SHOP), SHOP, "", false);
    session.scope = Some("write_products".into());
    assert!(app.sessions.store_session(session).await);

    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn session_expired_redirects() {
    let app = TestApp::new().await;
    let mut session = Session::new(offline_session_id(SHOP), SHOP, "", false);
    session.scope = Some("write_products".into());
    session.access_token = Some("shpat_test".into());
    session.expires = Some(chrono::Utc::now() - chrono::Duration::hours(1));
    assert!(app.sessions.store_session(session).await);

    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(redirect_location(&response), "/auth/login?shop=a.myshopify.com");
}

#[tokio::test]
async fn missing_primary_database_fails_closed_to_login() {
    let app = TestApp::with_stores(&[]).await;
    let response = app.get("/app?shop=a.myshopify.com").await;
    assert_eq!(redirect_location(&response), "/auth/login?shop=a.myshopify.com");
}
