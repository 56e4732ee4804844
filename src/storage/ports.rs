//! Port contract for local key/value storage.

use std::sync::Arc;
use thiserror::Error;

/// Result type for key/value storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous key/value storage of string records.
///
/// Keys are restricted to ASCII letters, digits, `-` and `_` so that every
/// implementation can map them onto file names or table keys verbatim.
pub trait KeyValueStore: Send + Sync {
    /// Reads the record stored under `key`.
    ///
    /// Returns `None` when nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for malformed keys or
    /// [`StorageError::Persistence`] when the backing medium fails.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for malformed keys or
    /// [`StorageError::Persistence`] when the backing medium fails.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes the record stored under `key`. Missing records are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for malformed keys or
    /// [`StorageError::Persistence`] when the backing medium fails.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Errors returned by key/value storage implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The key contains characters outside the permitted set.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// A stored record could not be decoded.
    #[error("record '{key}' could not be decoded: {message}")]
    Decode {
        /// Key of the undecodable record.
        key: String,
        /// Decoder error text.
        message: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Validates a storage key.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] when the key is empty or contains a
/// character other than an ASCII letter, digit, `-` or `_`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}
