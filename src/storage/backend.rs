//! Key-value backends
//!
//! Each collection lives in one named slot holding its whole JSON text.
//! The file backend maps a slot to `<dir>/<key>.json`; the memory backend
//! keeps slots in a map and is what tests run against.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::error::ExpenseError;

use super::file_io::{read_bytes, write_atomic};

/// A process-wide namespace of named text slots
pub trait KeyValueStore: Send + Sync {
    /// Read a slot, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, ExpenseError>;

    /// Replace a slot's contents
    fn set(&self, key: &str, value: &str) -> Result<(), ExpenseError>;
}

/// Slots stored as JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing a slot
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    /// A file that is not UTF-8 is corrupt data, not a backend failure
    fn get(&self, key: &str) -> Result<Option<String>, ExpenseError> {
        let Some(bytes) = read_bytes(self.slot_path(key))? else {
            return Ok(None);
        };

        String::from_utf8(bytes).map(Some).map_err(|e| {
            warn!(key, error = %e, "persisted collection is not valid UTF-8");
            ExpenseError::storage_unavailable(key, format!("not valid UTF-8: {}", e))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExpenseError> {
        write_atomic(self.slot_path(key), value.as_bytes())
    }
}

/// Slots held in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot pre-filled with raw text
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.write() {
            slots.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ExpenseError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExpenseError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("expenses").unwrap(), None);

        store.set("expenses", "[]").unwrap();
        assert_eq!(store.get("expenses").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("budgets").unwrap(), None);
    }

    #[test]
    fn test_memory_store_seeded() {
        let store = MemoryKeyValueStore::with_slot("budgets", "not json");
        assert_eq!(store.get("budgets").unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn test_file_store_maps_keys_to_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.get("expenses").unwrap(), None);
        store.set("expenses", "[]").unwrap();

        assert!(temp_dir.path().join("expenses.json").exists());
        assert_eq!(store.get("expenses").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_non_utf8_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        std::fs::write(&path, [0xff, 0xfe]).unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());

        let err = store.get("expenses").unwrap_err();
        assert!(err.is_storage_unavailable());
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xfe]);
    }
}
