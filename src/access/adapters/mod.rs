//! Access storage and identity implementations.

pub mod documents;
pub mod memory;

pub use documents::{DocumentMembershipDirectory, DocumentSessionStore};
pub use memory::StaticIdentityProvider;
