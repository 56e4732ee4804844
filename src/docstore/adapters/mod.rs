//! Document store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::{DocumentPgPool, PostgresDocumentStore};
