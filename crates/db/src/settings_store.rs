//! Settings toggles replicated across up to three independent databases.
//!
//! Each database is optional. An unbound or broken database is reported in
//! its own [`DatabaseStatus`] / [`SettingsFailure`] instead of failing the
//! whole request, so a page can render the databases that work.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use shopkeep_core::settings::{
    decode_flag, encode_flag, unavailable_message, DatabaseConfig, StoreId, DATABASE_CONFIGS,
};
use shopkeep_core::types::now_millis;

use crate::models::setting::Setting;
use crate::repositories::SettingRepo;
use crate::DbPool;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Database handles keyed by store, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct DatabaseHandles {
    handles: BTreeMap<StoreId, DbPool>,
}

impl DatabaseHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(store, handle)` pairs. When a store appears more than
    /// once the first handle wins, so callers list preferred sources first.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (StoreId, DbPool)>,
    {
        let mut handles = Self::new();
        for (id, pool) in sources {
            handles.bind(id, pool);
        }
        handles
    }

    /// Bind `pool` to `id` unless the store is already bound.
    /// Returns `false` if an earlier binding was kept.
    pub fn bind(&mut self, id: StoreId, pool: DbPool) -> bool {
        match self.handles.entry(id) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(pool);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// The handle for `id`, or `None` if that database is not provisioned.
    pub fn resolve(&self, id: StoreId) -> Option<&DbPool> {
        self.handles.get(&id)
    }

    /// Resolve by configuration key (`"DB"`, `"DB2"`, `"DB3"`).
    pub fn resolve_key(&self, key: &str) -> Option<&DbPool> {
        StoreId::from_key(key).and_then(|id| self.resolve(id))
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.resolve_key(key).is_some()
    }

    /// Bound stores, in configuration order.
    pub fn bound(&self) -> impl Iterator<Item = StoreId> + '_ {
        self.handles.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A read or write that could not be served by its database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{error}")]
pub struct SettingsFailure {
    pub error: String,
    pub db_available: bool,
}

impl SettingsFailure {
    fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            db_available: false,
        }
    }
}

/// Everything the settings page needs about one database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub key: StoreId,
    pub name: &'static str,
    pub table_name: &'static str,
    pub is_checked: bool,
    pub db_available: bool,
    pub all_settings: Vec<Setting>,
    pub error: Option<String>,
}

impl DatabaseStatus {
    fn empty(config: &DatabaseConfig) -> Self {
        Self {
            key: config.id,
            name: config.name,
            table_name: config.table_name,
            is_checked: false,
            db_available: false,
            all_settings: Vec::new(),
            error: None,
        }
    }
}

/// Result of toggling one database's setting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_key: Option<StoreId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_settings: Option<Vec<Setting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SettingsUpdate {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            db_key: None,
            is_checked: None,
            all_settings: None,
            error: Some(error.into()),
        }
    }
}

/// Whether one configured database has a bound handle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseAvailability {
    pub key: StoreId,
    pub name: &'static str,
    pub table_name: &'static str,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Table-level operations
// ---------------------------------------------------------------------------

const NO_HANDLE: &str = "Database is not available";

/// Create the settings table if it does not exist.
///
/// Unlike the read/write helpers this propagates the error; the loaders
/// catch it per database.
pub async fn ensure_table(handle: &DbPool, table: &str) -> Result<(), sqlx::Error> {
    SettingRepo::create_table(handle, table).await
}

/// Read one setting. A missing handle or failing query is a [`SettingsFailure`].
pub async fn read_one(
    handle: Option<&DbPool>,
    table: &str,
    key: &str,
) -> Result<Option<Setting>, SettingsFailure> {
    let pool = handle.ok_or_else(|| SettingsFailure::unavailable(NO_HANDLE))?;
    SettingRepo::find_by_key(pool, table, key)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, table, key, "Failed to read setting");
            SettingsFailure::unavailable(e.to_string())
        })
}

/// Read every setting, newest first.
pub async fn read_all(
    handle: Option<&DbPool>,
    table: &str,
) -> Result<Vec<Setting>, SettingsFailure> {
    let pool = handle.ok_or_else(|| SettingsFailure::unavailable(NO_HANDLE))?;
    SettingRepo::list(pool, table).await.map_err(|e| {
        tracing::error!(error = %e, table, "Failed to read settings");
        SettingsFailure::unavailable(e.to_string())
    })
}

/// Overwrite a setting with a fresh `updated_at`.
pub async fn write(
    handle: Option<&DbPool>,
    table: &str,
    key: &str,
    value: &str,
) -> Result<Setting, SettingsFailure> {
    let pool = handle.ok_or_else(|| SettingsFailure::unavailable(NO_HANDLE))?;
    SettingRepo::upsert(pool, table, key, value, now_millis())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, table, key, "Failed to write setting");
            SettingsFailure {
                error: e.to_string(),
                db_available: true,
            }
        })
}

// ---------------------------------------------------------------------------
// Page-level operations
// ---------------------------------------------------------------------------

/// Load the checkbox state and full listing for one database.
pub async fn load_database_settings(
    handles: &DatabaseHandles,
    config: &DatabaseConfig,
) -> DatabaseStatus {
    let mut status = DatabaseStatus::empty(config);

    let Some(pool) = handles.resolve(config.id) else {
        status.error = Some(unavailable_message(config));
        return status;
    };

    if let Err(e) = ensure_table(pool, config.table_name).await {
        tracing::error!(error = %e, db_key = %config.id, "Failed to create settings table");
        status.error = Some(e.to_string());
        return status;
    }

    let loaded = async {
        let current = read_one(Some(pool), config.table_name, config.setting_key).await?;
        let all = read_all(Some(pool), config.table_name).await?;
        Ok::<_, SettingsFailure>((current, all))
    }
    .await;

    match loaded {
        Ok((current, all)) => {
            status.is_checked = decode_flag(current.as_ref().and_then(|s| s.value.as_deref()));
            tracing::debug!(db_key = %config.id, is_checked = status.is_checked, "Loaded setting");
            status.db_available = true;
            status.all_settings = all;
        }
        Err(failure) => {
            tracing::error!(error = %failure, db_key = %config.id, "Database error");
            status.error = Some(failure.error);
        }
    }

    status
}

/// Load every configured database concurrently. Results are in
/// configuration order; one database failing does not affect the others.
pub async fn load_all(handles: &DatabaseHandles) -> Vec<DatabaseStatus> {
    join_all(
        DATABASE_CONFIGS
            .iter()
            .map(|config| load_database_settings(handles, config)),
    )
    .await
}

/// Set the checkbox for the database with configuration key `key` and
/// return a fresh listing.
pub async fn update(handles: &DatabaseHandles, key: &str, is_checked: bool) -> SettingsUpdate {
    let Some(id) = StoreId::from_key(key) else {
        tracing::warn!(key, "Rejected settings update for unknown database");
        return SettingsUpdate::failed("Invalid database key");
    };
    let config = id.config();

    let Some(pool) = handles.resolve(id) else {
        return SettingsUpdate::failed(unavailable_message(config));
    };

    if let Err(e) = ensure_table(pool, config.table_name).await {
        tracing::error!(error = %e, db_key = %id, "Failed to create settings table");
        return SettingsUpdate::failed(e.to_string());
    }

    let value = encode_flag(is_checked);
    tracing::info!(db_key = %id, value, "Saving setting");

    let refreshed = async {
        write(Some(pool), config.table_name, config.setting_key, value).await?;
        read_all(Some(pool), config.table_name).await
    }
    .await;

    match refreshed {
        Ok(all_settings) => SettingsUpdate {
            success: true,
            db_key: Some(id),
            is_checked: Some(is_checked),
            all_settings: Some(all_settings),
            error: None,
        },
        Err(failure) => SettingsUpdate::failed(failure.error),
    }
}

/// Which configured databases have a bound handle.
pub fn availability_report(handles: &DatabaseHandles) -> Vec<DatabaseAvailability> {
    DATABASE_CONFIGS
        .iter()
        .map(|config| DatabaseAvailability {
            key: config.id,
            name: config.name,
            table_name: config.table_name,
            available: handles.resolve(config.id).is_some(),
        })
        .collect()
}
