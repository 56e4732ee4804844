//! `PostgreSQL` adapter for realtime document storage.
//!
//! All documents live in one JSONB table keyed by namespace, collection and
//! document identifier. Watches poll the table and emit a snapshot whenever
//! its SHA-256 fingerprint changes.

mod models;
mod poller;
mod repository;
mod schema;

pub use repository::{DocumentPgPool, PostgresDocumentStore};
