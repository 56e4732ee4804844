//! Remote realtime document store.
//!
//! Documents are JSON objects addressed by a namespace, a collection and a
//! document identifier. Collections and single documents can be watched:
//! every notification carries the complete current snapshot.
//!
//! - Addressing and document types in [`document`]
//! - Port contract in [`ports`]
//! - In-memory and `PostgreSQL` implementations in [`adapters`]

pub mod adapters;
pub mod document;
pub mod ports;

pub use document::{CollectionPath, Document, DocumentPath};
pub use ports::{DocumentStore, DocumentStoreError, DocumentStoreResult};

#[cfg(test)]
mod tests;
