//! Snapshot persistence in local durable storage.

use super::record::{RecordFallback, WorkItemRecord, decode_snapshot, encode_snapshot};
use crate::board::domain::{WorkItem, WorkItemId, demo_items};
use crate::board::ports::{BoardPersistence, PersistenceMode, PersistenceResult};
use crate::storage::{
    KeyValueStore,
    json::{load_lenient, remove_best_effort, save_best_effort},
    keys,
};
use async_trait::async_trait;
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// One entry of the stored snapshot.
#[derive(Serialize)]
#[serde(untagged)]
enum StoredEntry<'a> {
    Item(WorkItemRecord),
    Unreadable(&'a Value),
}

/// Board persistence writing the whole board under one local key.
///
/// Storage failures are logged and swallowed, so commits always succeed.
/// Stored entries that could not be decoded are held aside on load and
/// written back with every snapshot, so a save never erases them.
#[derive(Debug, Clone)]
pub struct LocalBoardPersistence<S: KeyValueStore> {
    store: Arc<S>,
    unreadable: Arc<RwLock<Vec<Value>>>,
}

impl<S: KeyValueStore> LocalBoardPersistence<S> {
    /// Creates a persistence adapter over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            unreadable: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Loads the stored board.
    ///
    /// Returns `None` when nothing is stored or the record is unreadable.
    /// Entries that do not decode are kept for the next snapshot.
    #[must_use]
    pub fn load(&self, clock: &impl Clock) -> Option<Vec<WorkItem>> {
        let raw: Value = load_lenient(self.store.as_ref(), keys::CARDS)?;
        let contents = decode_snapshot(&raw, RecordFallback::local(clock));
        if !contents.unreadable.is_empty() {
            warn!(
                count = contents.unreadable.len(),
                "stored work items could not be read; keeping them untouched"
            );
        }
        self.hold_unreadable(contents.unreadable);
        Some(contents.items)
    }

    /// Loads the stored board, seeding and saving the demonstration data
    /// when nothing usable is stored.
    #[must_use]
    pub fn load_or_seed(&self, clock: &impl Clock) -> Vec<WorkItem> {
        if let Some(items) = self.load(clock).filter(|items| !items.is_empty()) {
            debug!(count = items.len(), "loaded local board");
            return items;
        }
        let seeded = demo_items(clock);
        info!(count = seeded.len(), "seeding local board with demonstration data");
        self.save_snapshot(&seeded);
        seeded
    }

    /// Writes the whole board, followed by any entries held aside on load.
    pub fn save_snapshot(&self, items: &[WorkItem]) {
        let held = match self.unreadable.read() {
            Ok(held) => held,
            Err(err) => {
                warn!(error = %err, "unreadable entries unavailable; saving items only");
                save_best_effort(self.store.as_ref(), keys::CARDS, &encode_snapshot(items));
                return;
            }
        };
        let entries: Vec<StoredEntry<'_>> = encode_snapshot(items)
            .into_iter()
            .map(StoredEntry::Item)
            .chain(held.iter().map(StoredEntry::Unreadable))
            .collect();
        save_best_effort(self.store.as_ref(), keys::CARDS, &entries);
    }

    /// Deletes the stored board, including entries held aside.
    pub fn clear(&self) {
        self.hold_unreadable(Vec::new());
        remove_best_effort(self.store.as_ref(), keys::CARDS);
    }

    fn hold_unreadable(&self, entries: Vec<Value>) {
        match self.unreadable.write() {
            Ok(mut held) => *held = entries,
            Err(err) => warn!(error = %err, "could not hold unreadable entries"),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> BoardPersistence for LocalBoardPersistence<S> {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Local
    }

    async fn commit(&self, _updated: &WorkItem, snapshot: &[WorkItem]) -> PersistenceResult<()> {
        self.save_snapshot(snapshot);
        Ok(())
    }

    async fn remove(&self, _id: &WorkItemId, snapshot: &[WorkItem]) -> PersistenceResult<()> {
        self.save_snapshot(snapshot);
        Ok(())
    }
}
