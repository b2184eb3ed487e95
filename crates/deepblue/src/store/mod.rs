//! Record store for deepblue.
//!
//! This module provides `SQLite`-backed persistence for the shipboard record
//! collections. Each collection lives as one JSON blob under a fixed key, is
//! seeded with defaults on first read, and is always written back whole:
//! callers read a fresh copy, modify it, and save the full collection. There
//! is no atomicity across keys; each save rewrites exactly one slot.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assistant::AssistantSettings;
use crate::error::{Error, Result};
use crate::records::{
    default_certificates, default_inventory, Certificate, IdGenerator, InventoryItem, RestLog,
    UuidGenerator,
};

/// Maximum id re-draws before an add gives up on the generator.
const MAX_ID_ATTEMPTS: usize = 1024;

/// Durable store for the shipboard record collections.
///
/// Owns the inventory, certificate, and rest-log collections exclusively;
/// consumers never hold a writable reference into the store, they
/// read-modify-write whole collections through it.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Identifier generator for added records.
    ids: Box<dyn IdGenerator>,
}

impl Store {
    /// Open or create a record store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and initializes the schema on a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_ids(path, Box::new(UuidGenerator))
    }

    /// Open a store with an injected identifier generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open_with_ids(path: impl AsRef<Path>, ids: Box<dyn IdGenerator>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening record store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent readers cheap; the store itself is single-writer.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Record store opened at {}", path.display());
        Ok(Self { path, conn, ids })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_ids(Box::new(UuidGenerator))
    }

    /// Create an in-memory store with an injected identifier generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory_with_ids(ids: Box<dyn IdGenerator>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            ids,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Inventory ===

    /// Get the spare-part inventory, seeding defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn inventory(&self) -> Result<Vec<InventoryItem>> {
        self.load_or_seed(schema::INVENTORY_KEY, default_inventory)
    }

    /// Overwrite the whole inventory collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn save_inventory(&self, items: &[InventoryItem]) -> Result<()> {
        self.save_slot(schema::INVENTORY_KEY, &items)
    }

    /// Add a spare part with a freshly generated unique identifier.
    ///
    /// The initial stock is clamped into `0..=max_stock`. Returns the new
    /// record after persisting the extended collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero `max_stock`, or an error
    /// if the database operation fails.
    pub fn add_inventory_item(
        &mut self,
        name: impl Into<String>,
        stock: u32,
        max_stock: u32,
    ) -> Result<InventoryItem> {
        if max_stock == 0 {
            return Err(Error::invalid_input("max stock must be greater than zero"));
        }

        let mut items = self.inventory()?;
        let existing: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
        let id = self.fresh_id(&existing)?;

        let item = InventoryItem::new(id, name, stock, max_stock, "General");
        items.push(item.clone());
        self.save_inventory(&items)?;
        Ok(item)
    }

    /// Adjust the stock of an item by `delta`, clamped into `0..=max_stock`.
    ///
    /// Returns the updated item, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn adjust_stock(&self, id: &str, delta: i64) -> Result<Option<InventoryItem>> {
        let mut items = self.inventory()?;
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        item.adjust_stock(delta);
        let updated = item.clone();
        self.save_inventory(&items)?;
        Ok(Some(updated))
    }

    // === Certificates ===

    /// Get the ship certificates, seeding defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn certificates(&self) -> Result<Vec<Certificate>> {
        self.load_or_seed(schema::CERTIFICATES_KEY, || default_certificates(Utc::now()))
    }

    /// Overwrite the whole certificate collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn save_certificates(&self, certs: &[Certificate]) -> Result<()> {
        self.save_slot(schema::CERTIFICATES_KEY, &certs)
    }

    /// Add a certificate with a freshly generated unique identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn add_certificate(
        &mut self,
        name: impl Into<String>,
        expiry_date: DateTime<Utc>,
    ) -> Result<Certificate> {
        let mut certs = self.certificates()?;
        let existing: Vec<String> = certs.iter().map(|c| c.id.clone()).collect();
        let id = self.fresh_id(&existing)?;

        let cert = Certificate::new(id, name, expiry_date);
        certs.push(cert.clone());
        self.save_certificates(&certs)?;
        Ok(cert)
    }

    // === Rest log ===

    /// Get the 24-hour rest log, seeding an all-resting day on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn rest_log(&self) -> Result<RestLog> {
        self.load_or_seed(schema::REST_HOURS_KEY, RestLog::new)
    }

    /// Overwrite the rest log.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn save_rest_log(&self, log: &RestLog) -> Result<()> {
        self.save_slot(schema::REST_HOURS_KEY, log)
    }

    /// Flip one hour slot of the rest log and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an out-of-range hour, or an error
    /// if the database operation fails.
    pub fn toggle_rest_slot(&self, hour: usize) -> Result<RestLog> {
        let mut log = self.rest_log()?;
        log.toggle(hour)?;
        self.save_rest_log(&log)?;
        Ok(log)
    }

    // === Assistant settings ===

    /// Get the assistant provider settings, seeding defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn assistant_settings(&self) -> Result<AssistantSettings> {
        self.load_or_seed(schema::AI_SETTINGS_KEY, AssistantSettings::default)
    }

    /// Overwrite the assistant provider settings.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database operation fails.
    pub fn save_assistant_settings(&self, settings: &AssistantSettings) -> Result<()> {
        self.save_slot(schema::AI_SETTINGS_KEY, settings)
    }

    // === Stats ===

    /// Get summary statistics for the stored collections.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let now = Utc::now();
        let inventory = self.inventory()?;
        let certificates = self.certificates()?;
        let rest_log = self.rest_log()?;

        let expired_certificates = certificates
            .iter()
            .filter(|c| c.status_at(now).is_expired())
            .count();
        let low_stock_items = inventory.iter().filter(|i| i.is_low()).count();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            inventory_items: inventory.len(),
            low_stock_items,
            certificates: certificates.len(),
            expired_certificates,
            rest_hours: rest_log.rest_hours(),
            db_size_bytes,
        })
    }

    // === Slot plumbing ===

    /// Read the raw JSON blob stored under a key, if any.
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Overwrite the blob stored under a key.
    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO records (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            (key, value),
        )?;
        Ok(())
    }

    /// Serialize and persist a collection under its key.
    fn save_slot<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.write_slot(key, &serde_json::to_string(value)?)
    }

    /// Load a collection, seeding (and persisting) defaults when the slot is
    /// empty or holds a blob that no longer deserializes.
    ///
    /// Only this store ever writes a slot, so a malformed blob is not an
    /// expected state; it is handled by reseeding rather than surfacing a
    /// parse error to every reader.
    fn load_or_seed<T>(&self, key: &str, seed: impl FnOnce() -> T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(raw) = self.read_slot(key)? {
            match serde_json::from_str(&raw) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(key, error = %err, "Malformed record blob, reseeding defaults");
                }
            }
        }

        let value = seed();
        self.save_slot(key, &value)?;
        Ok(value)
    }

    /// Draw identifiers until one not present in `existing` comes up.
    fn fresh_id(&mut self, existing: &[String]) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !existing.iter().any(|e| *e == id) {
                return Ok(id);
            }
        }
        Err(Error::internal(
            "id generator failed to produce a fresh identifier",
        ))
    }
}

/// Summary statistics for the stored collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of inventory items.
    pub inventory_items: usize,
    /// Inventory items below the low-stock threshold.
    pub low_stock_items: usize,
    /// Number of certificates.
    pub certificates: usize,
    /// Certificates past their expiry date.
    pub expired_certificates: usize,
    /// Resting hours in the current rest log.
    pub rest_hours: u32,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SequenceGenerator;
    use chrono::Duration;

    fn create_test_store() -> Store {
        Store::open_in_memory_with_ids(Box::new(SequenceGenerator::starting_at(1)))
            .expect("failed to create test store")
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Store::open_in_memory().is_ok());
    }

    #[test]
    fn test_inventory_seeded_on_first_access() {
        let store = create_test_store();
        let items = store.inventory().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Main engine fuel injector");

        // Second read comes from the persisted slot, not a fresh seed.
        let again = store.inventory().unwrap();
        assert_eq!(items, again);
    }

    #[test]
    fn test_inventory_round_trip() {
        let store = create_test_store();
        let items = vec![
            InventoryItem::new("a", "O-ring kit", 7, 12, "Mechanical"),
            InventoryItem::new("b", "Grease cartridge", 0, 8, "Consumables"),
        ];
        store.save_inventory(&items).unwrap();
        assert_eq!(store.inventory().unwrap(), items);
    }

    #[test]
    fn test_add_inventory_item_skips_taken_ids() {
        // Seeds occupy ids 1..=3; the sequence generator starts at 1, so the
        // first add must skip ahead to "4".
        let mut store = create_test_store();
        store.inventory().unwrap();

        let item = store.add_inventory_item("Gasket set", 2, 5).unwrap();
        assert_eq!(item.id, "4");

        let items = store.inventory().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[3], item);
    }

    #[test]
    fn test_add_inventory_item_unique_ids() {
        let mut store = create_test_store();
        let a = store.add_inventory_item("Part A", 1, 5).unwrap();
        let b = store.add_inventory_item("Part B", 1, 5).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_inventory_item_clamps_stock() {
        let mut store = create_test_store();
        let item = store.add_inventory_item("Overfull", 50, 10).unwrap();
        assert_eq!(item.stock, 10);
    }

    #[test]
    fn test_add_inventory_item_rejects_zero_capacity() {
        let mut store = create_test_store();
        let err = store.add_inventory_item("Ghost part", 0, 0).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_adjust_stock_clamps() {
        let store = create_test_store();
        store.inventory().unwrap();

        // Seed item "1" has stock 4 of 6.
        let item = store.adjust_stock("1", 100).unwrap().unwrap();
        assert_eq!(item.stock, 6);

        let item = store.adjust_stock("1", -100).unwrap().unwrap();
        assert_eq!(item.stock, 0);

        let item = store.adjust_stock("1", 2).unwrap().unwrap();
        assert_eq!(item.stock, 2);
    }

    #[test]
    fn test_adjust_stock_unknown_id() {
        let store = create_test_store();
        assert!(store.adjust_stock("no-such-id", 1).unwrap().is_none());
    }

    #[test]
    fn test_adjust_stock_persists() {
        let store = create_test_store();
        store.adjust_stock("1", -1).unwrap();
        let items = store.inventory().unwrap();
        assert_eq!(items[0].stock, 3);
    }

    #[test]
    fn test_certificates_seeded_on_first_access() {
        let store = create_test_store();
        let certs = store.certificates().unwrap();
        assert_eq!(certs.len(), 3);

        let now = Utc::now();
        assert!(certs[2].status_at(now).is_expired());
    }

    #[test]
    fn test_add_certificate() {
        let mut store = create_test_store();
        store.certificates().unwrap();

        let expiry = Utc::now() + Duration::days(365);
        let cert = store.add_certificate("Tonnage Certificate", expiry).unwrap();
        assert_eq!(cert.id, "4");

        let certs = store.certificates().unwrap();
        assert_eq!(certs.len(), 4);
        assert_eq!(certs[3].name, "Tonnage Certificate");
    }

    #[test]
    fn test_certificates_round_trip() {
        let store = create_test_store();
        let certs = vec![Certificate::new(
            "c1",
            "Cargo Ship Safety Certificate",
            Utc::now() + Duration::days(10),
        )];
        store.save_certificates(&certs).unwrap();
        assert_eq!(store.certificates().unwrap(), certs);
    }

    #[test]
    fn test_rest_log_seeded_all_resting() {
        let store = create_test_store();
        let log = store.rest_log().unwrap();
        assert_eq!(log.rest_hours(), 24);
    }

    #[test]
    fn test_toggle_rest_slot_persists() {
        let store = create_test_store();
        let log = store.toggle_rest_slot(8).unwrap();
        assert_eq!(log.is_on_duty(8), Some(true));

        let reloaded = store.rest_log().unwrap();
        assert_eq!(reloaded, log);
    }

    #[test]
    fn test_toggle_rest_slot_out_of_range() {
        let store = create_test_store();
        let err = store.toggle_rest_slot(24).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_corrupt_inventory_blob_reseeds() {
        let store = create_test_store();
        store
            .write_slot(schema::INVENTORY_KEY, "{not valid json")
            .unwrap();

        let items = store.inventory().unwrap();
        assert_eq!(items, default_inventory());

        // The slot was healed, not just read around.
        let raw = store.read_slot(schema::INVENTORY_KEY).unwrap().unwrap();
        let parsed: Vec<InventoryItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, items);
    }

    #[test]
    fn test_corrupt_rest_log_blob_reseeds() {
        let store = create_test_store();
        // Wrong shape: 24 slots is an invariant of the type.
        store
            .write_slot(schema::REST_HOURS_KEY, "[true, false]")
            .unwrap();

        let log = store.rest_log().unwrap();
        assert_eq!(log, RestLog::new());
    }

    #[test]
    fn test_assistant_settings_seeded_and_round_trips() {
        let store = create_test_store();
        let settings = store.assistant_settings().unwrap();
        assert_eq!(settings, AssistantSettings::default());

        let mut changed = settings;
        changed.model_name = "deepseek-chat".to_string();
        store.save_assistant_settings(&changed).unwrap();
        assert_eq!(store.assistant_settings().unwrap(), changed);
    }

    #[test]
    fn test_stats() {
        let store = create_test_store();
        let stats = store.stats().unwrap();

        assert_eq!(stats.inventory_items, 3);
        assert_eq!(stats.certificates, 3);
        assert_eq!(stats.expired_certificates, 1);
        assert_eq!(stats.rest_hours, 24);
        assert_eq!(stats.low_stock_items, 1); // hydraulic oil at 20%
        assert_eq!(stats.db_size_bytes, 0); // in-memory
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("deepblue_test_{}.db", std::process::id()));

        let store = Store::open(&db_path).unwrap();
        store.inventory().unwrap();
        assert_eq!(store.path(), db_path);
        assert!(store.stats().unwrap().db_size_bytes > 0);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir.join(format!(
            "deepblue_test_{}/nested/records.db",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let store = Store::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }

    #[test]
    fn test_collections_are_independent_slots() {
        let store = create_test_store();
        store.save_inventory(&[]).unwrap();

        // Emptying one collection leaves the others untouched.
        assert_eq!(store.certificates().unwrap().len(), 3);
        assert_eq!(store.rest_log().unwrap().rest_hours(), 24);
        assert!(store.inventory().unwrap().is_empty());
    }
}
