//! Settings database identifiers, static configuration, and value encoding.
//!
//! Up to three independently provisioned databases each hold one settings
//! table. Which databases exist is fixed at compile time by
//! [`DATABASE_CONFIGS`]; whether each is actually bound is decided at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Store identifiers
// ---------------------------------------------------------------------------

/// Identifier of one settings database, in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreId {
    #[serde(rename = "DB")]
    Primary,
    #[serde(rename = "DB2")]
    Secondary,
    #[serde(rename = "DB3")]
    Tertiary,
}

impl StoreId {
    pub const ALL: [StoreId; 3] = [StoreId::Primary, StoreId::Secondary, StoreId::Tertiary];

    /// The configuration key (`DB`, `DB2`, `DB3`).
    pub fn key(self) -> &'static str {
        match self {
            StoreId::Primary => "DB",
            StoreId::Secondary => "DB2",
            StoreId::Tertiary => "DB3",
        }
    }

    /// Parse a configuration key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Map a settings-page target (`DB1`, `DB2`, `DB3`) to its configuration key.
    ///
    /// The page numbers the primary database `DB1`; any other value is passed
    /// through unchanged so it can be rejected by key validation.
    pub fn key_for_page_target(target: &str) -> &str {
        match target {
            "DB1" => StoreId::Primary.key(),
            other => other,
        }
    }

    /// Static configuration for this store.
    pub fn config(self) -> &'static DatabaseConfig {
        match self {
            StoreId::Primary => &DATABASE_CONFIGS[0],
            StoreId::Secondary => &DATABASE_CONFIGS[1],
            StoreId::Tertiary => &DATABASE_CONFIGS[2],
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Static configuration
// ---------------------------------------------------------------------------

/// Where one database keeps its settings toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub id: StoreId,
    /// Human-readable name used in error text.
    pub name: &'static str,
    pub table_name: &'static str,
    /// Key of the checkbox setting inside `table_name`.
    pub setting_key: &'static str,
}

/// Every settings database, in display order.
pub static DATABASE_CONFIGS: [DatabaseConfig; 3] = [
    DatabaseConfig {
        id: StoreId::Primary,
        name: "Primary Database",
        table_name: "example_table_db1",
        setting_key: "test_checkbox_db1",
    },
    DatabaseConfig {
        id: StoreId::Secondary,
        name: "Secondary Database",
        table_name: "example_table_db2",
        setting_key: "test_checkbox_db2",
    },
    DatabaseConfig {
        id: StoreId::Tertiary,
        name: "Tertiary Database",
        table_name: "example_table_db3",
        setting_key: "test_checkbox_db3",
    },
];

/// Look up the configuration for a key such as `"DB2"`.
pub fn database_config(key: &str) -> Option<&'static DatabaseConfig> {
    StoreId::from_key(key).map(StoreId::config)
}

/// Error text reported when a database has no bound handle.
pub fn unavailable_message(config: &DatabaseConfig) -> String {
    format!("{} is not available", config.name)
}

// ---------------------------------------------------------------------------
// Value encoding
// ---------------------------------------------------------------------------

/// Booleans are stored as the literal text `"true"` / `"false"`.
pub fn encode_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Only the exact text `"true"` decodes to `true`.
pub fn decode_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

// ---------------------------------------------------------------------------
// Table name validation
// ---------------------------------------------------------------------------

/// Table names are interpolated into SQL, so they must be plain identifiers.
pub fn validate_table_name(name: &str) -> Result<(), CoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid table name '{name}'. Must be a plain SQL identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for id in StoreId::ALL {
            assert_eq!(StoreId::from_key(id.key()), Some(id));
        }
        assert_eq!(StoreId::from_key("DB9"), None);
        assert_eq!(StoreId::from_key("db2"), None);
    }

    #[test]
    fn config_order_matches_ids() {
        for (config, id) in DATABASE_CONFIGS.iter().zip(StoreId::ALL) {
            assert_eq!(config.id, id);
            assert_eq!(id.config(), config);
        }
    }

    #[test]
    fn page_target_db1_maps_to_primary_key() {
        assert_eq!(StoreId::key_for_page_target("DB1"), "DB");
        assert_eq!(StoreId::key_for_page_target("DB3"), "DB3");
        assert_eq!(StoreId::key_for_page_target("DB9"), "DB9");
    }

    #[test]
    fn only_literal_true_decodes_true() {
        assert!(decode_flag(Some(encode_flag(true))));
        assert!(!decode_flag(Some(encode_flag(false))));
        assert!(!decode_flag(Some("TRUE")));
        assert!(!decode_flag(Some("1")));
        assert!(!decode_flag(None));
    }

    #[test]
    fn store_id_serializes_as_key() {
        assert_eq!(serde_json::to_string(&StoreId::Secondary).unwrap(), "\"DB2\"");
    }

    #[test]
    fn table_name_validation() {
        assert!(validate_table_name("example_table_db1").is_ok());
        assert!(validate_table_name("_t").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("1table").is_err());
        assert!(validate_table_name("t; DROP TABLE x").is_err());
    }

    #[test]
    fn unavailable_message_names_database() {
        assert_eq!(
            unavailable_message(StoreId::Tertiary.config()),
            "Tertiary Database is not available"
        );
    }
}
