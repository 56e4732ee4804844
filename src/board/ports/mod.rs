//! Port contracts for board persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod persistence;

pub use persistence::{BoardPersistence, PersistenceError, PersistenceMode, PersistenceResult};
