//! Directory-backed key/value store.
//!
//! Each key is stored as `<key>.json` inside a single directory opened
//! through a capability handle. Writes go to a temporary sibling first and
//! are renamed into place, so a crash never leaves a half-written record.

use crate::storage::ports::{KeyValueStore, StorageError, StorageResult, validate_key};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use tracing::debug;

const RECORD_SUFFIX: &str = ".json";
const TEMP_SUFFIX: &str = ".json.tmp";

/// Key/value store persisting one JSON file per key.
#[derive(Debug)]
pub struct DirectoryStore {
    dir: Dir,
}

impl DirectoryStore {
    /// Opens the store rooted at `path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &str) -> StorageResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(StorageError::persistence)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(StorageError::persistence)?;
        debug!(path, "opened local storage directory");
        Ok(Self { dir })
    }

    /// Wraps an already opened directory handle.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }

    fn record_name(key: &str) -> StorageResult<String> {
        validate_key(key)?;
        Ok(format!("{key}{RECORD_SUFFIX}"))
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let name = Self::record_name(key)?;
        match self.dir.read_to_string(&name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::persistence(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let name = Self::record_name(key)?;
        let temp_name = format!("{key}{TEMP_SUFFIX}");
        self.dir
            .write(&temp_name, value)
            .map_err(StorageError::persistence)?;
        self.dir
            .rename(&temp_name, &self.dir, &name)
            .map_err(StorageError::persistence)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let name = Self::record_name(key)?;
        match self.dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::persistence(err)),
        }
    }
}
