//! Local durable key/value storage.
//!
//! Board state, layout preferences and the remembered session token are kept
//! as JSON-encoded records under fixed keys. Failures of this layer are
//! never fatal: callers use the best-effort helpers in [`json`], which log
//! and carry on.
//!
//! - Port contract in [`ports`]
//! - Filesystem and in-memory implementations in [`adapters`]

pub mod adapters;
pub mod json;
pub mod keys;
pub mod ports;

pub use ports::{KeyValueStore, StorageError, StorageResult};

#[cfg(test)]
mod tests;
