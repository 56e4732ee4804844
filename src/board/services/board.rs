//! Service layer owning the in-memory board.
//!
//! Saves and deletes are pessimistic: the board changes only after the
//! backend accepted the write. Moves, completion changes and density
//! changes are optimistic: the board changes first and stays changed even
//! when the write fails, until the next remote snapshot replaces it.

use crate::access::domain::{AccessDenied, Action, Role};
use crate::board::{
    adapters::{LocalBoardPersistence, RemoteBoardPersistence},
    domain::{
        BoardDomainError, BoardState, Column, CompletionIncrement, DropTarget, WorkItem,
        WorkItemDetails, WorkItemId, place,
    },
    ports::{BoardPersistence, PersistenceError, PersistenceMode},
};
use crate::docstore::DocumentStore;
use crate::realtime::Subscription;
use crate::storage::{KeyValueStore, json::remove_best_effort, keys};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating or editing a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveWorkItemRequest {
    id: Option<WorkItemId>,
    details: WorkItemDetails,
    column: Column,
}

impl SaveWorkItemRequest {
    /// Creates a request for a new item.
    #[must_use]
    pub const fn new(details: WorkItemDetails, column: Column) -> Self {
        Self {
            id: None,
            details,
            column,
        }
    }

    /// Targets an existing item, or creates one with this identifier.
    #[must_use]
    pub fn with_id(mut self, id: WorkItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// The current user may not change the board.
    #[error("permission denied: {0}")]
    Forbidden(#[from] AccessDenied),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The backend rejected the write.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Board orchestration service.
///
/// The service is the single owner of the board state; every mutation takes
/// `&mut self`, so mutations are serialized by the caller.
pub struct BoardService<P, C>
where
    P: BoardPersistence,
    C: Clock + Send + Sync,
{
    state: BoardState,
    persistence: Arc<P>,
    clock: Arc<C>,
    role: Option<Role>,
}

impl<P, C> BoardService<P, C>
where
    P: BoardPersistence,
    C: Clock + Send + Sync,
{
    /// Creates a service over an empty board.
    #[must_use]
    pub const fn new(persistence: Arc<P>, clock: Arc<C>, role: Option<Role>) -> Self {
        Self {
            state: BoardState::new(),
            persistence,
            clock,
            role,
        }
    }

    /// Replaces the initial board contents.
    #[must_use]
    pub fn with_items(mut self, items: Vec<WorkItem>) -> Self {
        self.state.replace_all(items);
        self
    }

    /// Returns the board.
    #[must_use]
    pub const fn state(&self) -> &BoardState {
        &self.state
    }

    /// Returns the persistence backend kind.
    #[must_use]
    pub fn mode(&self) -> PersistenceMode {
        self.persistence.mode()
    }

    /// Returns the role used for permission checks.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Updates the role after a membership change.
    pub const fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
    }

    /// Returns `true` when the current role may change work items.
    #[must_use]
    pub const fn can_write(&self) -> bool {
        matches!(self.role, Some(role) if role.permits(Action::EditItems))
    }

    /// Creates or edits a work item once the backend accepted it.
    ///
    /// Edits keep the item's order key, completion history and density. New
    /// items go to the front of the board with an order key taken from the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for read-only users and
    /// [`BoardServiceError::Persistence`] when the write fails; the board is
    /// unchanged in both cases.
    pub async fn save(&mut self, request: SaveWorkItemRequest) -> BoardServiceResult<WorkItem> {
        self.require_write()?;
        let SaveWorkItemRequest {
            id,
            details,
            column,
        } = request;
        let item = self.prepare(id, details, column);
        let mut next = self.state.clone();
        let created = next.upsert(item.clone());
        self.persistence.commit(&item, next.items()).await?;
        self.state = next;
        info!(item = %item.id(), created, column = %item.column(), "work item saved");
        Ok(item)
    }

    /// Deletes a work item once the backend accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for read-only users,
    /// [`BoardServiceError::Domain`] for unknown items and
    /// [`BoardServiceError::Persistence`] when the delete fails; the board
    /// is unchanged in every case.
    pub async fn delete(&mut self, id: &WorkItemId) -> BoardServiceResult<WorkItem> {
        self.require_write()?;
        let mut next = self.state.clone();
        let removed = next
            .remove(id)
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))?;
        self.persistence.remove(id, next.items()).await?;
        self.state = next;
        info!(item = %id, "work item deleted");
        Ok(removed)
    }

    /// Moves a work item to a drop target.
    ///
    /// Returns `Ok(None)` when an item is dropped before itself.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for read-only users and
    /// [`BoardServiceError::Domain`] for unknown items, leaving the board
    /// unchanged. Returns [`BoardServiceError::Persistence`] when the write
    /// fails, with the move still applied.
    pub async fn move_item(
        &mut self,
        id: &WorkItemId,
        target: &DropTarget,
    ) -> BoardServiceResult<Option<WorkItem>> {
        self.require_write()?;
        let Some(placement) = place(self.state.items(), id, target)? else {
            debug!(item = %id, "item dropped onto itself");
            return Ok(None);
        };
        let moved = self.state.relocate(id, placement, &*self.clock)?.clone();
        debug!(
            item = %id,
            column = %placement.column,
            order = placement.order,
            "work item moved"
        );
        self.commit_optimistic(&moved).await?;
        Ok(Some(moved))
    }

    /// Records finished pieces on a work item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for read-only users and
    /// [`BoardServiceError::Domain`] for unknown items or increments that
    /// would pass the ordered quantity, leaving the board unchanged. Returns
    /// [`BoardServiceError::Persistence`] when the write fails, with the
    /// increment still applied.
    pub async fn record_completion(
        &mut self,
        id: &WorkItemId,
        amount: u32,
        note: Option<String>,
    ) -> BoardServiceResult<CompletionIncrement> {
        self.require_write()?;
        let item = self
            .state
            .get_mut(id)
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))?;
        let increment = item.record_completion(amount, note, &*self.clock)?;
        let updated = item.clone();
        debug!(item = %id, amount, completed = updated.quantity_completed(), "completion recorded");
        self.commit_optimistic(&updated).await?;
        Ok(increment)
    }

    /// Reverts the most recent completion increment of a work item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for read-only users and
    /// [`BoardServiceError::Domain`] for unknown items or an empty history,
    /// leaving the board unchanged. Returns
    /// [`BoardServiceError::Persistence`] when the write fails, with the
    /// undo still applied.
    pub async fn undo_last_completion(
        &mut self,
        id: &WorkItemId,
    ) -> BoardServiceResult<CompletionIncrement> {
        self.require_write()?;
        let item = self
            .state
            .get_mut(id)
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))?;
        let undone = item.undo_last_completion(&*self.clock)?;
        let updated = item.clone();
        debug!(item = %id, amount = undone.amount(), "completion undone");
        self.commit_optimistic(&updated).await?;
        Ok(undone)
    }

    /// Sets the density flag of one work item.
    ///
    /// Read-only users change only their local view; nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for unknown items and
    /// [`BoardServiceError::Persistence`] when the write fails, with the
    /// change still applied.
    pub async fn set_density(
        &mut self,
        id: &WorkItemId,
        density: Option<bool>,
    ) -> BoardServiceResult<()> {
        let item = self
            .state
            .get_mut(id)
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))?;
        item.set_density(density);
        let updated = item.clone();
        if self.can_write() {
            self.commit_optimistic(&updated).await?;
        }
        Ok(())
    }

    /// Flips every item of a column between compact and expanded.
    ///
    /// All items become compact unless every item already is, in which case
    /// all become expanded. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Persistence`] for the first failed
    /// write; every item keeps its new flag.
    pub async fn toggle_column_density(&mut self, column: Column) -> BoardServiceResult<bool> {
        let compact = !self.state.column_all_compact(column);
        let ids: Vec<WorkItemId> = self
            .state
            .items()
            .iter()
            .filter(|item| item.column() == column)
            .map(|item| item.id().clone())
            .collect();
        let mut updated = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(item) = self.state.get_mut(id) {
                item.set_density(Some(compact));
                updated.push(item.clone());
            }
        }
        if self.can_write() {
            let mut first_failure = None;
            for item in &updated {
                if let Err(err) = self.persistence.commit(item, self.state.items()).await {
                    warn!(item = %item.id(), error = %err, "density change not saved");
                    first_failure.get_or_insert(err);
                }
            }
            if let Some(err) = first_failure {
                return Err(err.into());
            }
        }
        Ok(compact)
    }

    /// Replaces the board with an authoritative remote snapshot.
    pub fn replace_with_snapshot(&mut self, items: Vec<WorkItem>) {
        debug!(count = items.len(), "board replaced from snapshot");
        self.state.replace_all(items);
    }

    /// Empties the board, as when the user signs out or loses access.
    pub fn clear(&mut self) {
        self.state.clear();
    }

    fn prepare(&self, id: Option<WorkItemId>, details: WorkItemDetails, column: Column) -> WorkItem {
        if let Some(known) = id.as_ref()
            && let Some(current) = self.state.get(known)
        {
            let mut edited = current.clone();
            edited.apply_details(details, column, &*self.clock);
            return edited;
        }
        let order = self.fresh_order();
        WorkItem::create(id.unwrap_or_default(), details, column, order, &*self.clock)
    }

    const fn require_write(&self) -> Result<(), AccessDenied> {
        match self.role {
            Some(role) if role.permits(Action::EditItems) => Ok(()),
            Some(role) => Err(AccessDenied::InsufficientRole {
                role,
                action: Action::EditItems,
            }),
            None => Err(AccessDenied::NotAuthorized(Action::EditItems)),
        }
    }

    async fn commit_optimistic(&self, updated: &WorkItem) -> BoardServiceResult<()> {
        if let Err(err) = self.persistence.commit(updated, self.state.items()).await {
            warn!(
                item = %updated.id(),
                mode = %self.persistence.mode(),
                error = %err,
                "change kept locally but not saved"
            );
            return Err(err.into());
        }
        Ok(())
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond timestamps stay far below 2^53"
    )]
    fn fresh_order(&self) -> f64 {
        self.clock.utc().timestamp_millis() as f64
    }
}

impl<S, C> BoardService<LocalBoardPersistence<S>, C>
where
    S: KeyValueStore + 'static,
    C: Clock + Send + Sync,
{
    /// Opens the local board, seeding demonstration data on first use.
    ///
    /// Local mode has no sign-in, so the user acts as an administrator.
    #[must_use]
    pub fn open_local(persistence: Arc<LocalBoardPersistence<S>>, clock: Arc<C>) -> Self {
        let items = persistence.load_or_seed(&*clock);
        info!(count = items.len(), "opened local board");
        Self::new(persistence, clock, Some(Role::Admin)).with_items(items)
    }
}

impl<D, C> BoardService<RemoteBoardPersistence<D, C>, C>
where
    D: DocumentStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Opens the remote board empty, waiting for sign-in and the first
    /// snapshot.
    ///
    /// Any board snapshot left in `local` storage is discarded so that the
    /// remote store stays the only source of items.
    #[must_use]
    pub fn open_remote<K>(
        persistence: Arc<RemoteBoardPersistence<D, C>>,
        local: &K,
        clock: Arc<C>,
    ) -> Self
    where
        K: KeyValueStore + ?Sized,
    {
        remove_best_effort(local, keys::CARDS);
        info!(board = %persistence.board(), "opened remote board");
        Self::new(persistence, clock, None)
    }

    /// Watches the remote board; feed each snapshot to
    /// [`BoardService::replace_with_snapshot`].
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Vec<WorkItem>> {
        self.persistence.subscribe()
    }
}
