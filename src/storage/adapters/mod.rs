//! Key/value storage implementations.

pub mod directory;
pub mod memory;

pub use directory::DirectoryStore;
pub use memory::InMemoryKeyValueStore;
