//! Key/value storage port
//!
//! Persisted state lives behind string keys holding JSON-encoded strings,
//! the way a browser's local storage would hold it.

use mindmingle_domain::DomainError;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted state
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store file: {0}")]
    Corrupt(String),

    #[error("Lock poisoned")]
    Poisoned,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Synchronous string key/value store.
///
/// Writes are last-write-wins; no transactions span multiple keys.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert!(store.contains("k"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(!store.contains("k"));
    }

    #[test]
    fn test_store_error_maps_to_storage_domain_error() {
        let err: DomainError = StoreError::Corrupt("bad json".to_string()).into();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
