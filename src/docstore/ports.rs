//! Port contract for realtime document storage.

use super::{CollectionPath, Document, DocumentPath};
use crate::realtime::{Subscription, SubscriptionError, SubscriptionErrorKind};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Result type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

/// Realtime document storage contract.
///
/// Writes are last-writer-wins per document. Watch methods spawn a
/// producer task and must be called from within a Tokio runtime.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document.
    ///
    /// Returns `None` when the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::PermissionDenied`] or
    /// [`DocumentStoreError::Persistence`] when the read fails.
    async fn get(&self, path: &DocumentPath) -> DocumentStoreResult<Option<Document>>;

    /// Lists every document of a collection ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::PermissionDenied`] or
    /// [`DocumentStoreError::Persistence`] when the read fails.
    async fn list(&self, collection: &CollectionPath) -> DocumentStoreResult<Vec<Document>>;

    /// Creates or replaces a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::PermissionDenied`] or
    /// [`DocumentStoreError::Persistence`] when the write fails.
    async fn set(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()>;

    /// Creates a document that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::AlreadyExists`] when the document is
    /// present, or another variant when the write fails.
    async fn create(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()>;

    /// Merges top-level fields into a document, creating it when absent.
    ///
    /// Fields not named in `patch` keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::PermissionDenied`] or
    /// [`DocumentStoreError::Persistence`] when the write fails.
    async fn merge(&self, path: &DocumentPath, patch: Map<String, Value>)
    -> DocumentStoreResult<()>;

    /// Merges top-level fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotFound`] when the document is absent,
    /// or another variant when the write fails.
    async fn update(&self, path: &DocumentPath, patch: Map<String, Value>)
    -> DocumentStoreResult<()>;

    /// Deletes a document. Missing documents are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::PermissionDenied`] or
    /// [`DocumentStoreError::Persistence`] when the delete fails.
    async fn delete(&self, path: &DocumentPath) -> DocumentStoreResult<()>;

    /// Watches a collection, emitting the full document list on each change.
    fn subscribe_collection(&self, collection: &CollectionPath) -> Subscription<Vec<Document>>;

    /// Watches one document, emitting `None` while it does not exist.
    fn subscribe_document(&self, path: &DocumentPath) -> Subscription<Option<Document>>;
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    /// The addressed document does not exist.
    #[error("document not found: {0}")]
    NotFound(DocumentPath),

    /// The addressed document already exists.
    #[error("document already exists: {0}")]
    AlreadyExists(DocumentPath),

    /// The backing store refused the operation.
    #[error("missing or insufficient permissions: {0}")]
    PermissionDenied(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DocumentStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Converts the error into a subscription notification.
    #[must_use]
    pub fn to_subscription_error(&self) -> SubscriptionError {
        let kind = match self {
            Self::PermissionDenied(_) => SubscriptionErrorKind::PermissionDenied,
            Self::NotFound(_) | Self::AlreadyExists(_) | Self::Persistence(_) => {
                SubscriptionErrorKind::Backend
            }
        };
        SubscriptionError::new(kind, self.to_string())
    }
}
