//! Production board.
//!
//! Work items are placed on a fixed grid of columns grouped into stages and
//! reordered with fractional order keys. The board is held in memory by
//! [`services::BoardService`] and committed through a
//! [`ports::BoardPersistence`] backend, either local snapshots or remote
//! per-item documents.
//!
//! - Domain types and rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Persistence implementations in [`adapters`]
//! - Orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
