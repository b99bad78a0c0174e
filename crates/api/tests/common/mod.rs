//! Shared harness for API integration tests.
//!
//! Every test gets private in-memory SQLite databases and the production
//! router from [`build_app_router`], driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shopkeep_api::config::{ServerConfig, ShopifyConfig};
use shopkeep_api::router::build_app_router;
use shopkeep_api::state::AppState;
use shopkeep_core::session::{offline_session_id, Session};
use shopkeep_core::session_storage::SessionStorage;
use shopkeep_core::settings::StoreId;
use shopkeep_db::{DatabaseHandles, DbPool, SessionStore};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const SHOP: &str = "a.myshopify.com";
pub const OTHER_SHOP: &str = "b.myshopify.com";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["https://admin.shopify.com".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_urls: Vec::new(),
        shopify: ShopifyConfig {
            api_key: "test-api-key".to_string(),
            scopes: vec!["write_products".to_string()],
            custom_shop_domain: None,
        },
    }
}

/// A private in-memory database that lives as long as its pool.
pub async fn memory_pool() -> DbPool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

pub struct TestApp {
    pub router: Router,
    pub databases: Arc<DatabaseHandles>,
    pub sessions: Arc<SessionStore>,
}

impl TestApp {
    /// An app with a pool bound for each of `stores`.
    pub async fn with_stores(stores: &[StoreId]) -> Self {
        let mut sources = Vec::new();
        for id in stores {
            sources.push((*id, memory_pool().await));
        }
        let databases = Arc::new(DatabaseHandles::from_sources(sources));

        let sessions = Arc::new(SessionStore::from_handles(&databases));
        // Without a primary database there is no table to create.
        let _ = sessions.initialize().await;

        let config = test_config();
        let state = AppState {
            databases: Arc::clone(&databases),
            sessions: sessions.clone(),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app_router(state, &config),
            databases,
            sessions,
        }
    }

    /// An app with all three databases bound.
    pub async fn new() -> Self {
        Self::with_stores(&StoreId::ALL).await
    }

    /// Store an active offline session for `shop`.
    pub async fn install(&self, shop: &str) -> Session {
        let mut session = Session::new(offline_session_id(shop), shop, "", false);
        session.scope = Some("write_products,read_orders".into());
        session.access_token = Some("shpat_test".into());
        assert!(self.sessions.store_session(session.clone()).await);
        session
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_webhook(&self, uri: &str, shop: Option<&str>, body: Value) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-shopify-topic", "test/topic");
        if let Some(shop) = shop {
            request = request.header("x-shopify-shop-domain", shop);
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Assert a redirect and return its `Location`.
pub fn redirect_location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
        .to_string()
}
