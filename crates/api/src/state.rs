use std::sync::Arc;

use shopkeep_core::session_storage::SessionStorage;
use shopkeep_db::DatabaseHandles;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Settings databases, built once at startup. The primary one also
    /// holds the sessions table.
    pub databases: Arc<DatabaseHandles>,
    /// Session persistence backend used for request authentication.
    pub sessions: Arc<dyn SessionStorage>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
