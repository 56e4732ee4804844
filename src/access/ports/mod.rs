//! Port contracts for identity, membership and session markers.

pub mod directory;
pub mod identity;
pub mod sessions;

pub use directory::{AccessStoreError, AccessStoreResult, MembershipDirectory};
pub use identity::{IdentityError, IdentityProvider};
pub use sessions::ActiveSessionStore;
