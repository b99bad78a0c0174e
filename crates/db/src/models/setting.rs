//! Row mapping for the per-database settings tables.

use serde::Serialize;
use shopkeep_core::types::EpochMillis;
use sqlx::FromRow;

/// A row from a settings table (`example_table_db1` and friends).
///
/// `value` and `updated_at` are nullable in the schema; rows written by this
/// crate always carry both.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: Option<EpochMillis>,
}
