//! Handlers for platform webhooks.
//!
//! Webhooks can be delivered more than once, including after the app was
//! already uninstalled, so both handlers are safe to repeat.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use shopkeep_core::error::CoreError;
use shopkeep_core::shop::sanitize_shop;

use crate::error::{AppError, AppResult};
use crate::middleware::shop_session::SHOP_DOMAIN_HEADER;
use crate::state::AppState;

const TOPIC_HEADER: &str = "x-shopify-topic";

/// Body of an `app/scopes_update` webhook.
#[derive(Debug, Deserialize)]
pub struct ScopesUpdatePayload {
    #[serde(default)]
    pub previous: Vec<String>,
    pub current: Vec<String>,
}

/// Read and sanitize the shop a webhook was sent for.
fn webhook_shop(headers: &HeaderMap, state: &AppState) -> AppResult<String> {
    let raw = headers
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing X-Shopify-Shop-Domain header".into()))?;

    sanitize_shop(raw, state.config.shopify.custom_shop_domain.as_deref()).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Invalid shop domain '{raw}'")))
    })
}

fn webhook_topic(headers: &HeaderMap) -> &str {
    headers
        .get(TOPIC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// POST /webhooks/app/uninstalled
///
/// Purge every session stored for the shop.
pub async fn app_uninstalled(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let shop = webhook_shop(&headers, &state)?;
    tracing::info!(topic = webhook_topic(&headers), shop = %shop, "Received webhook");

    let purged = state.sessions.delete_sessions_by_shop(&shop).await;
    tracing::info!(shop = %shop, purged, "Purged sessions for uninstalled shop");

    Ok(StatusCode::OK)
}

/// POST /webhooks/app/scopes_update
///
/// Rewrite the granted scopes on every session stored for the shop.
pub async fn scopes_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScopesUpdatePayload>,
) -> AppResult<StatusCode> {
    let shop = webhook_shop(&headers, &state)?;
    tracing::info!(
        topic = webhook_topic(&headers),
        shop = %shop,
        previous = ?payload.previous,
        current = ?payload.current,
        "Received webhook",
    );

    let scope = payload.current.join(",");
    for mut session in state.sessions.find_sessions_by_shop(&shop).await {
        session.scope = Some(scope.clone());
        let id = session.id.clone();
        if !state.sessions.store_session(session).await {
            tracing::warn!(shop = %shop, session_id = %id, "Failed to update session scope");
        }
    }

    Ok(StatusCode::OK)
}
