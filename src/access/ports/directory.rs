//! Membership and join-request storage contract.

use crate::access::domain::{JoinRequest, MembershipRecord, Role, UserId};
use crate::realtime::Subscription;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for access storage operations.
pub type AccessStoreResult<T> = Result<T, AccessStoreError>;

/// Storage of one board's members and pending join requests.
///
/// Listings are ordered newest first. Subscriptions must be opened from
/// within a Tokio runtime.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Reads one membership.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the read fails.
    async fn membership(&self, user: &UserId) -> AccessStoreResult<Option<MembershipRecord>>;

    /// Lists members, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the read fails.
    async fn list_members(&self) -> AccessStoreResult<Vec<MembershipRecord>>;

    /// Creates or replaces a membership.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the write fails.
    async fn upsert_member(&self, record: &MembershipRecord) -> AccessStoreResult<()>;

    /// Changes the role of an existing member.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError::NotFound`] when the user is not a member.
    async fn set_role(&self, user: &UserId, role: Role) -> AccessStoreResult<()>;

    /// Deletes a membership. Missing members are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the delete fails.
    async fn delete_member(&self, user: &UserId) -> AccessStoreResult<()>;

    /// Reads one join request.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the read fails.
    async fn join_request(&self, user: &UserId) -> AccessStoreResult<Option<JoinRequest>>;

    /// Lists pending join requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the read fails.
    async fn list_join_requests(&self) -> AccessStoreResult<Vec<JoinRequest>>;

    /// Creates or replaces a join request.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the write fails.
    async fn upsert_join_request(&self, request: &JoinRequest) -> AccessStoreResult<()>;

    /// Deletes a join request. Missing requests are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AccessStoreError`] when the delete fails.
    async fn delete_join_request(&self, user: &UserId) -> AccessStoreResult<()>;

    /// Watches one user's membership.
    fn subscribe_membership(&self, user: &UserId) -> Subscription<Option<MembershipRecord>>;

    /// Watches the member list.
    fn subscribe_members(&self) -> Subscription<Vec<MembershipRecord>>;

    /// Watches pending join requests.
    fn subscribe_join_requests(&self) -> Subscription<Vec<JoinRequest>>;

    /// Watches one user's join request.
    fn subscribe_join_request(&self, user: &UserId) -> Subscription<Option<JoinRequest>>;
}

/// Errors returned by access storage implementations.
#[derive(Debug, Clone, Error)]
pub enum AccessStoreError {
    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The addressed record already exists.
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// The backing store refused the operation.
    #[error("missing or insufficient permissions: {0}")]
    PermissionDenied(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AccessStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
