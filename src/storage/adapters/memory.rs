//! In-memory key/value store for tests and ephemeral sessions.

use crate::storage::ports::{KeyValueStore, StorageError, StorageResult, validate_key};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory key/value store.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    records: Arc<RwLock<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes and removals fail, emulating a full or
    /// read-only medium.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Returns the stored keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self
            .records
            .read()
            .map(|records| records.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::persistence(std::io::Error::other(
                "storage quota exceeded",
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let records = self
            .records
            .read()
            .map_err(|err| StorageError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.check_writable()?;
        let mut records = self
            .records
            .write()
            .map_err(|err| StorageError::persistence(std::io::Error::other(err.to_string())))?;
        records.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.check_writable()?;
        let mut records = self
            .records
            .write()
            .map_err(|err| StorageError::persistence(std::io::Error::other(err.to_string())))?;
        records.remove(key);
        Ok(())
    }
}
