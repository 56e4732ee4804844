//! In-memory realtime document store for tests and local demos.

use crate::docstore::{
    CollectionPath, Document, DocumentPath,
    ports::{DocumentStore, DocumentStoreError, DocumentStoreResult},
};
use crate::realtime::{SUBSCRIPTION_BUFFER, Subscription, SubscriptionEvent};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, watch};

/// Thread-safe in-memory document store with change notifications.
///
/// Clones share the same documents and notify the same watchers.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryDocumentState>>,
    revision: Arc<watch::Sender<u64>>,
}

#[derive(Debug, Default)]
struct InMemoryDocumentState {
    collections: HashMap<CollectionPath, BTreeMap<String, Value>>,
    denied: HashSet<CollectionPath>,
    reject_writes: bool,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(InMemoryDocumentState::default())),
            revision: Arc::new(revision),
        }
    }

    /// Makes reads and watches of `collection` fail with a permission error.
    ///
    /// Live watchers receive the error and stop.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn deny_reads(&self, collection: &CollectionPath) -> DocumentStoreResult<()> {
        self.write_state()?.denied.insert(collection.clone());
        self.notify();
        Ok(())
    }

    /// Makes subsequent writes fail, emulating an unreachable backend.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn reject_writes(&self, reject: bool) -> DocumentStoreResult<()> {
        self.write_state()?.reject_writes = reject;
        Ok(())
    }

    fn read_state(
        &self,
    ) -> DocumentStoreResult<std::sync::RwLockReadGuard<'_, InMemoryDocumentState>> {
        self.state
            .read()
            .map_err(|err| DocumentStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> DocumentStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryDocumentState>> {
        self.state
            .write()
            .map_err(|err| DocumentStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn writable_state(
        &self,
    ) -> DocumentStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryDocumentState>> {
        let state = self.write_state()?;
        if state.reject_writes {
            return Err(DocumentStoreError::persistence(std::io::Error::other(
                "backend unavailable",
            )));
        }
        Ok(state)
    }

    fn notify(&self) {
        self.revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    fn snapshot_collection(&self, collection: &CollectionPath) -> DocumentStoreResult<Vec<Document>> {
        let state = self.read_state()?;
        if state.denied.contains(collection) {
            return Err(DocumentStoreError::PermissionDenied(collection.to_string()));
        }
        Ok(state
            .collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, body)| Document::new(id.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn snapshot_document(&self, path: &DocumentPath) -> DocumentStoreResult<Option<Document>> {
        let state = self.read_state()?;
        if state.denied.contains(path.collection()) {
            return Err(DocumentStoreError::PermissionDenied(path.to_string()));
        }
        Ok(state
            .collections
            .get(path.collection())
            .and_then(|documents| documents.get(path.id()))
            .map(|body| Document::new(path.id(), body.clone())))
    }

    /// Spawns a watcher that re-reads a snapshot after every change and
    /// forwards it when it differs from the previous one.
    fn watch<T, F>(&self, read: F) -> Subscription<T>
    where
        T: PartialEq + Clone + Send + 'static,
        F: Fn(&Self) -> DocumentStoreResult<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<SubscriptionEvent<T>>(SUBSCRIPTION_BUFFER);
        let mut changes = self.revision.subscribe();
        let store = self.clone();
        let producer = tokio::spawn(async move {
            let mut last: Option<T> = None;
            loop {
                match read(&store) {
                    Ok(snapshot) => {
                        if last.as_ref() != Some(&snapshot) {
                            last = Some(snapshot.clone());
                            if sender.send(Ok(snapshot)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        drop(sender.send(Err(err.to_subscription_error())).await);
                        break;
                    }
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
        });
        Subscription::new(receiver, producer)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> DocumentStoreResult<Option<Document>> {
        self.snapshot_document(path)
    }

    async fn list(&self, collection: &CollectionPath) -> DocumentStoreResult<Vec<Document>> {
        self.snapshot_collection(collection)
    }

    async fn set(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()> {
        {
            let mut state = self.writable_state()?;
            state
                .collections
                .entry(path.collection().clone())
                .or_default()
                .insert(path.id().to_owned(), body);
        }
        self.notify();
        Ok(())
    }

    async fn create(&self, path: &DocumentPath, body: Value) -> DocumentStoreResult<()> {
        {
            let mut state = self.writable_state()?;
            let documents = state
                .collections
                .entry(path.collection().clone())
                .or_default();
            if documents.contains_key(path.id()) {
                return Err(DocumentStoreError::AlreadyExists(path.clone()));
            }
            documents.insert(path.id().to_owned(), body);
        }
        self.notify();
        Ok(())
    }

    async fn merge(
        &self,
        path: &DocumentPath,
        patch: Map<String, Value>,
    ) -> DocumentStoreResult<()> {
        {
            let mut state = self.writable_state()?;
            let body = state
                .collections
                .entry(path.collection().clone())
                .or_default()
                .entry(path.id().to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = body {
                fields.extend(patch);
            } else {
                *body = Value::Object(patch);
            }
        }
        self.notify();
        Ok(())
    }

    async fn update(
        &self,
        path: &DocumentPath,
        patch: Map<String, Value>,
    ) -> DocumentStoreResult<()> {
        {
            let mut state = self.writable_state()?;
            let body = state
                .collections
                .get_mut(path.collection())
                .and_then(|documents| documents.get_mut(path.id()))
                .ok_or_else(|| DocumentStoreError::NotFound(path.clone()))?;
            if let Value::Object(fields) = body {
                fields.extend(patch);
            } else {
                *body = Value::Object(patch);
            }
        }
        self.notify();
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> DocumentStoreResult<()> {
        {
            let mut state = self.writable_state()?;
            if let Some(documents) = state.collections.get_mut(path.collection()) {
                documents.remove(path.id());
            }
        }
        self.notify();
        Ok(())
    }

    fn subscribe_collection(&self, collection: &CollectionPath) -> Subscription<Vec<Document>> {
        let watched = collection.clone();
        self.watch(move |store| store.snapshot_collection(&watched))
    }

    fn subscribe_document(&self, path: &DocumentPath) -> Subscription<Option<Document>> {
        let watched = path.clone();
        self.watch(move |store| store.snapshot_document(&watched))
    }
}
