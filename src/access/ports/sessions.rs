//! Active-session marker storage contract.

use super::AccessStoreResult;
use crate::access::domain::{ActiveSessionRecord, SessionToken, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage of the per-account active-session markers.
#[async_trait]
pub trait ActiveSessionStore: Send + Sync {
    /// Reads the marker of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessStoreError`] when the read fails.
    async fn get(&self, user: &UserId) -> AccessStoreResult<Option<ActiveSessionRecord>>;

    /// Creates the marker of `user`, failing when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessStoreError::AlreadyExists`] when a marker is
    /// present, or another variant when the write fails.
    async fn create(&self, user: &UserId, record: &ActiveSessionRecord) -> AccessStoreResult<()>;

    /// Refreshes the last-seen time of an existing marker.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessStoreError::NotFound`] when no marker exists,
    /// or another variant when the write fails.
    async fn touch(
        &self,
        user: &UserId,
        token: SessionToken,
        seen_at: DateTime<Utc>,
    ) -> AccessStoreResult<()>;

    /// Deletes the marker of `user`. Missing markers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`super::AccessStoreError`] when the delete fails.
    async fn delete(&self, user: &UserId) -> AccessStoreResult<()>;
}
