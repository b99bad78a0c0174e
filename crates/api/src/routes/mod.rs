pub mod app;
pub mod auth;
pub mod health;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// Route hierarchy:
///
/// ```text
/// /                                   landing page, forwards `?shop=` to /app
///
/// /auth/login                         login form (GET), submit (POST)
///
/// /app                                embedded shell (session required)
/// /app/settings                       load (GET), update (POST)
/// /app/databases                      bound database report
///
/// /webhooks/app/uninstalled           purge the shop's sessions
/// /webhooks/app/scopes_update         rewrite the shop's session scopes
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(app::landing_router())
        .nest("/auth", auth::router())
        .nest("/app", app::router())
        .nest("/webhooks", webhooks::router())
}
