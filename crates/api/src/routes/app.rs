//! Route definitions for the landing page and `/app` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{app, settings};
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET /  -> index
/// ```
pub fn landing_router() -> Router<AppState> {
    Router::new().route("/", get(app::index))
}

/// Routes mounted at `/app`. Every handler requires an active shop session.
///
/// ```text
/// GET  /            -> shell
/// GET  /settings    -> load
/// POST /settings    -> submit
/// GET  /databases   -> databases
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(app::shell))
        .route("/settings", get(settings::load).post(settings::submit))
        .route("/databases", get(app::databases))
}
