//! JSON encoding helpers over [`KeyValueStore`].
//!
//! The `*_best_effort` and `load_lenient` helpers swallow failures after
//! logging them, matching the policy that local storage problems never
//! interrupt the user.

use super::{KeyValueStore, StorageError, StorageResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Reads and decodes the record stored under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Decode`] when the record is not valid JSON for
/// `T`, or any error raised by the store.
pub fn read_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::Decode {
            key: key.to_owned(),
            message: err.to_string(),
        })
}

/// Encodes `value` and stores it under `key`.
///
/// # Errors
///
/// Returns any error raised by the encoder or the store.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(StorageError::persistence)?;
    store.set(key, &encoded)
}

/// Reads a record, treating any failure as absence.
#[must_use]
pub fn load_lenient<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match read_json(store, key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "ignoring unreadable local record");
            None
        }
    }
}

/// Stores a record, logging and discarding any failure.
pub fn save_best_effort<T, S>(store: &S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    if let Err(err) = write_json(store, key, value) {
        warn!(key, error = %err, "failed to save local record");
    }
}

/// Deletes a record, logging and discarding any failure.
pub fn remove_best_effort<S>(store: &S, key: &str)
where
    S: KeyValueStore + ?Sized,
{
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to remove local record");
    }
}
