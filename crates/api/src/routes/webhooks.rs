//! Route definitions for the `/webhooks` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /app/uninstalled    -> app_uninstalled
/// POST /app/scopes_update  -> scopes_update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app/uninstalled", post(webhooks::app_uninstalled))
        .route("/app/scopes_update", post(webhooks::scopes_update))
}
