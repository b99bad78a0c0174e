//! Repository for the per-database settings tables.
//!
//! Unlike the session repository the table name is a parameter: each settings
//! database names its own table. Names are checked with
//! [`validate_table_name`] before being interpolated.

use shopkeep_core::settings::validate_table_name;
use shopkeep_core::types::EpochMillis;

use crate::models::setting::Setting;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "key, value, updated_at";

/// Provides CRUD operations for key/value settings tables.
pub struct SettingRepo;

impl SettingRepo {
    /// Create `table` with the `(key, value, updated_at)` schema if absent.
    pub async fn create_table(pool: &DbPool, table: &str) -> Result<(), sqlx::Error> {
        let table = checked_table(table)?;
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                key TEXT PRIMARY KEY,
                value TEXT,
                updated_at INTEGER
            )"
        );
        sqlx::query(&query).execute(pool).await?;
        Ok(())
    }

    /// Find a setting by key.
    pub async fn find_by_key(
        pool: &DbPool,
        table: &str,
        key: &str,
    ) -> Result<Option<Setting>, sqlx::Error> {
        let table = checked_table(table)?;
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE key = ?");
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List every setting, most recently updated first.
    pub async fn list(pool: &DbPool, table: &str) -> Result<Vec<Setting>, sqlx::Error> {
        let table = checked_table(table)?;
        let query = format!("SELECT {COLUMNS} FROM {table} ORDER BY updated_at DESC");
        sqlx::query_as::<_, Setting>(&query).fetch_all(pool).await
    }

    /// Insert or overwrite a setting, returning the stored row.
    pub async fn upsert(
        pool: &DbPool,
        table: &str,
        key: &str,
        value: &str,
        updated_at: EpochMillis,
    ) -> Result<Setting, sqlx::Error> {
        let table = checked_table(table)?;
        let query = format!(
            "INSERT OR REPLACE INTO {table} ({COLUMNS}) VALUES (?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .bind(value)
            .bind(updated_at)
            .fetch_one(pool)
            .await
    }
}

fn checked_table(table: &str) -> Result<&str, sqlx::Error> {
    validate_table_name(table).map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;
    Ok(table)
}
