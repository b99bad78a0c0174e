use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use shopkeep_core::settings::StoreId;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the primary database is reachable.
    pub db_healthy: bool,
    /// Configuration keys of the bound databases.
    pub databases: Vec<StoreId>,
}

/// GET /health -- returns service and primary database health.
///
/// Secondary databases are optional, so only the primary one decides
/// between `ok` and `degraded`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match state.databases.resolve(StoreId::Primary) {
        Some(pool) => shopkeep_db::health_check(pool).await.is_ok(),
        None => false,
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        databases: state.databases.bound().collect(),
    })
}

/// Mount health check routes at the root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
