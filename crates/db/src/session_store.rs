//! Fail-closed session persistence.
//!
//! [`SessionStore`] is the storage backend handed to the platform auth
//! framework. No operation returns an error: failures are logged and
//! reported as [`StoreOutcome::Failure`] carrying the fail-closed value, so
//! a broken database degrades to "please log in again".

use async_trait::async_trait;
use shopkeep_core::outcome::StoreOutcome;
use shopkeep_core::session::Session;
use shopkeep_core::session_storage::SessionStorage;
use shopkeep_core::settings::StoreId;
use validator::Validate;

use crate::models::session::SessionRow;
use crate::repositories::SessionRepo;
use crate::settings_store::DatabaseHandles;
use crate::DbPool;

const UNAVAILABLE: &str = "Session database is not available";

/// Session persistence over the primary database handle.
#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: Option<DbPool>,
}

impl SessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Use the primary handle from `handles`. Without one, every operation
    /// fails closed.
    pub fn from_handles(handles: &DatabaseHandles) -> Self {
        Self {
            pool: handles.resolve(StoreId::Primary).cloned(),
        }
    }

    fn pool(&self) -> Result<&DbPool, &'static str> {
        self.pool.as_ref().ok_or(UNAVAILABLE)
    }

    /// Create the sessions table if needed.
    pub async fn initialize(&self) -> StoreOutcome<bool> {
        let result = match self.pool() {
            Ok(pool) => SessionRepo::create_table(pool).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                tracing::info!("Session table initialized");
                StoreOutcome::done()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize session table");
                StoreOutcome::failed(false, e)
            }
        }
    }

    /// Insert or fully replace the session with `session.id`.
    pub async fn put(&self, session: &Session) -> StoreOutcome<bool> {
        match self.try_put(session).await {
            Ok(()) => StoreOutcome::done(),
            Err(e) => {
                tracing::error!(error = %e, session_id = %session.id, shop = %session.shop, "Failed to store session");
                StoreOutcome::failed(false, e)
            }
        }
    }

    async fn try_put(&self, session: &Session) -> Result<(), String> {
        session.validate().map_err(|e| e.to_string())?;
        let row = SessionRow::from_session(session).map_err(|e| e.to_string())?;
        let pool = self.pool()?;
        SessionRepo::upsert(pool, &row).await.map_err(|e| e.to_string())
    }

    /// Load a session by id. `Success(None)` means it does not exist.
    pub async fn get(&self, id: &str) -> StoreOutcome<Option<Session>> {
        match self.try_get(id).await {
            Ok(session) => StoreOutcome::Success(session),
            Err(e) => {
                tracing::error!(error = %e, session_id = %id, "Failed to load session");
                StoreOutcome::failed(None, e)
            }
        }
    }

    async fn try_get(&self, id: &str) -> Result<Option<Session>, String> {
        let pool = self.pool()?;
        let row = SessionRepo::find_by_id(pool, id)
            .await
            .map_err(|e| e.to_string())?;
        row.map(SessionRow::into_session)
            .transpose()
            .map_err(|e| e.to_string())
    }

    /// Delete a session by id. Deleting an absent id succeeds.
    pub async fn delete(&self, id: &str) -> StoreOutcome<bool> {
        let result = match self.pool() {
            Ok(pool) => SessionRepo::delete(pool, id).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(removed) => {
                tracing::debug!(session_id = %id, removed, "Session deleted");
                StoreOutcome::done()
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = %id, "Failed to delete session");
                StoreOutcome::failed(false, e)
            }
        }
    }

    /// Delete a batch of sessions in one statement. An empty batch succeeds
    /// without touching the database.
    pub async fn delete_many(&self, ids: &[String]) -> StoreOutcome<bool> {
        if ids.is_empty() {
            return StoreOutcome::done();
        }

        let result = match self.pool() {
            Ok(pool) => SessionRepo::delete_many(pool, ids)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(removed) => {
                tracing::debug!(requested = ids.len(), removed, "Sessions deleted");
                StoreOutcome::done()
            }
            Err(e) => {
                tracing::error!(error = %e, count = ids.len(), "Failed to delete sessions");
                StoreOutcome::failed(false, e)
            }
        }
    }

    /// Delete every session for `shop` in one statement. Rows are matched
    /// on the `shop` column alone, so undecodable rows go too.
    pub async fn delete_by_shop(&self, shop: &str) -> StoreOutcome<bool> {
        let result = match self.pool() {
            Ok(pool) => SessionRepo::delete_by_shop(pool, shop)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(removed) => {
                tracing::debug!(shop = %shop, removed, "Sessions deleted for shop");
                StoreOutcome::done()
            }
            Err(e) => {
                tracing::error!(error = %e, shop = %shop, "Failed to delete sessions for shop");
                StoreOutcome::failed(false, e)
            }
        }
    }

    /// All sessions for `shop`, in storage order.
    ///
    /// A row that fails to decode is logged and skipped; it does not hide
    /// the shop's other sessions.
    pub async fn find_by_shop(&self, shop: &str) -> StoreOutcome<Vec<Session>> {
        match self.try_find_by_shop(shop).await {
            Ok(sessions) => StoreOutcome::Success(sessions),
            Err(e) => {
                tracing::error!(error = %e, shop = %shop, "Failed to find sessions by shop");
                StoreOutcome::failed(Vec::new(), e)
            }
        }
    }

    async fn try_find_by_shop(&self, shop: &str) -> Result<Vec<Session>, String> {
        let pool = self.pool()?;
        let rows = SessionRepo::find_by_shop(pool, shop)
            .await
            .map_err(|e| e.to_string())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match row.into_session() {
                    Ok(session) => Some(session),
                    Err(e) => {
                        tracing::warn!(error = %e, session_id = %id, shop = %shop, "Skipping undecodable session");
                        None
                    }
                }
            })
            .collect())
    }
}

#[async_trait]
impl SessionStorage for SessionStore {
    async fn store_session(&self, session: Session) -> bool {
        self.put(&session).await.into_value()
    }

    async fn load_session(&self, id: &str) -> Option<Session> {
        self.get(id).await.into_value()
    }

    async fn delete_session(&self, id: &str) -> bool {
        self.delete(id).await.into_value()
    }

    async fn delete_sessions(&self, ids: &[String]) -> bool {
        self.delete_many(ids).await.into_value()
    }

    async fn find_sessions_by_shop(&self, shop: &str) -> Vec<Session> {
        self.find_by_shop(shop).await.into_value()
    }

    async fn delete_sessions_by_shop(&self, shop: &str) -> bool {
        self.delete_by_shop(shop).await.into_value()
    }
}
