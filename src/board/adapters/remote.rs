//! Per-item persistence in the remote document store.
//!
//! Items live at `boards/{board}/cards/{item}`. The store is the source of
//! truth: the board subscribes to the collection and replaces its state with
//! every snapshot.

use super::record::{RecordFallback, WorkItemRecord};
use crate::board::domain::{BoardId, WorkItem, WorkItemId};
use crate::board::ports::{BoardPersistence, PersistenceError, PersistenceMode, PersistenceResult};
use crate::docstore::{CollectionPath, Document, DocumentStore, DocumentStoreError};
use crate::realtime::Subscription;
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collection holding the items of a board.
pub const CARDS_COLLECTION: &str = "cards";

/// Board persistence writing one document per item.
///
/// The clock supplies the fallback day for documents with blank dates.
#[derive(Clone)]
pub struct RemoteBoardPersistence<D: DocumentStore, C = DefaultClock> {
    store: Arc<D>,
    board: BoardId,
    cards: CollectionPath,
    clock: Arc<C>,
}

impl<D, C> RemoteBoardPersistence<D, C>
where
    D: DocumentStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a persistence adapter for `board`.
    #[must_use]
    pub fn new(store: Arc<D>, board: BoardId, clock: Arc<C>) -> Self {
        let cards = CollectionPath::new(board.namespace(), CARDS_COLLECTION);
        Self {
            store,
            board,
            cards,
            clock,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn board(&self) -> &BoardId {
        &self.board
    }

    /// Returns the item collection path.
    #[must_use]
    pub const fn collection(&self) -> &CollectionPath {
        &self.cards
    }

    /// Reads every decodable item once.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the collection cannot be read.
    pub async fn list(&self) -> PersistenceResult<Vec<WorkItem>> {
        let documents = self.store.list(&self.cards).await.map_err(map_store_error)?;
        Ok(decode_documents(
            documents,
            RecordFallback::remote(self.clock.as_ref()),
        ))
    }

    /// Watches the board, emitting every decodable item on each change.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Vec<WorkItem>> {
        let clock = Arc::clone(&self.clock);
        self.store
            .subscribe_collection(&self.cards)
            .map(move |documents| {
                Ok(decode_documents(
                    documents,
                    RecordFallback::remote(clock.as_ref()),
                ))
            })
    }

    /// Uploads `items` when the remote board holds nothing yet.
    ///
    /// Returns the number of items uploaded.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the collection cannot be read or a
    /// write fails.
    pub async fn import_local_if_empty(&self, items: &[WorkItem]) -> PersistenceResult<usize> {
        let existing = self.store.list(&self.cards).await.map_err(map_store_error)?;
        if !existing.is_empty() {
            debug!(board = %self.board, "remote board not empty; skipping import");
            return Ok(0);
        }
        for item in items {
            self.write(item).await?;
        }
        info!(board = %self.board, count = items.len(), "imported local items");
        Ok(items.len())
    }

    async fn write(&self, item: &WorkItem) -> PersistenceResult<()> {
        let body = serde_json::to_value(WorkItemRecord::from_item(item))
            .map_err(PersistenceError::persistence)?;
        self.store
            .set(&self.cards.doc(item.id().as_str()), body)
            .await
            .map_err(map_store_error)
    }
}

#[async_trait]
impl<D, C> BoardPersistence for RemoteBoardPersistence<D, C>
where
    D: DocumentStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Remote
    }

    async fn commit(&self, updated: &WorkItem, _snapshot: &[WorkItem]) -> PersistenceResult<()> {
        self.write(updated).await
    }

    async fn remove(&self, id: &WorkItemId, _snapshot: &[WorkItem]) -> PersistenceResult<()> {
        self.store
            .delete(&self.cards.doc(id.as_str()))
            .await
            .map_err(map_store_error)
    }
}

/// Decodes documents into items, skipping the unreadable ones.
///
/// Skipped documents stay in the store untouched; only the board view
/// omits them.
#[must_use]
pub fn decode_documents(documents: Vec<Document>, fallback: RecordFallback) -> Vec<WorkItem> {
    documents
        .into_iter()
        .filter_map(|document| {
            match WorkItemRecord::decode(document.body(), Some(document.id()), fallback) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(document = document.id(), error = %err, "skipping unreadable remote item");
                    None
                }
            }
        })
        .collect()
}

fn map_store_error(err: DocumentStoreError) -> PersistenceError {
    match err {
        DocumentStoreError::PermissionDenied(message) => PersistenceError::PermissionDenied(message),
        other => PersistenceError::persistence(other),
    }
}
