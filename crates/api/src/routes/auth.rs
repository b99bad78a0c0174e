//! Route definitions for the `/auth` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /login  -> login_page
/// POST /login  -> login_submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login", get(auth::login_page).post(auth::login_submit))
}
