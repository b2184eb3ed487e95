//! `SQLite` schema definitions for the record store.
//!
//! The store keeps each record collection as one JSON blob in a key-value
//! table, so the schema is deliberately small: a `records` table for the
//! blobs and a `metadata` table for schema versioning.

/// Storage slot for the spare-part inventory collection.
pub const INVENTORY_KEY: &str = "db_inventory";

/// Storage slot for the ship certificate collection.
pub const CERTIFICATES_KEY: &str = "db_certificates";

/// Storage slot for the 24-hour rest log.
pub const REST_HOURS_KEY: &str = "db_rest_hours";

/// Storage slot for the assistant provider settings.
pub const AI_SETTINGS_KEY: &str = "ai_settings";

/// SQL statement to create the records table.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_RECORDS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_records_table_structure() {
        assert!(CREATE_RECORDS_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_RECORDS_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_slot_keys_are_distinct() {
        let keys = [INVENTORY_KEY, CERTIFICATES_KEY, REST_HOURS_KEY, AI_SETTINGS_KEY];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
