//! Board access control.
//!
//! Resolves, from the identity provider and the board's membership records,
//! whether the current user may view or change the board, and applies the
//! soft one-browser-per-account sign-in policy.
//!
//! - Domain types and the route guard in [`domain`]
//! - Port contracts in [`ports`]
//! - Document-store and in-memory implementations in [`adapters`]
//! - Membership and sign-in services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
