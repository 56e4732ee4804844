//! Persistence port committing board mutations.

use crate::board::domain::{WorkItem, WorkItemId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Where board mutations are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceMode {
    /// Whole-board snapshots in local durable storage.
    Local,
    /// Per-item documents in a remote realtime store.
    Remote,
}

impl PersistenceMode {
    /// Returns a stable code for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board persistence contract.
///
/// Implementations receive both the changed item and the full board after
/// the change; local storage writes the snapshot, remote storage writes only
/// the item.
#[async_trait]
pub trait BoardPersistence: Send + Sync {
    /// Returns the backend kind.
    fn mode(&self) -> PersistenceMode;

    /// Commits an inserted or updated item.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when a remote write fails. Local
    /// implementations log storage failures and succeed.
    async fn commit(&self, updated: &WorkItem, snapshot: &[WorkItem]) -> PersistenceResult<()>;

    /// Commits the removal of an item.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when a remote delete fails. Local
    /// implementations log storage failures and succeed.
    async fn remove(&self, id: &WorkItemId, snapshot: &[WorkItem]) -> PersistenceResult<()>;
}

/// Errors returned by board persistence implementations.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// The backend refused the write.
    #[error("missing or insufficient permissions: {0}")]
    PermissionDenied(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PersistenceError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
