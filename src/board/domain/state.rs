//! In-memory board state container.

use super::{
    BoardDomainError, Category, Column, Stage, WorkItem, WorkItemId,
    placement::{Placement, sorted_column},
};
use mockable::Clock;
use std::collections::BTreeSet;

/// Ordered collection of the work items on a board.
///
/// Collection order matters only for ties between equal order keys; display
/// order within a column always comes from [`BoardState::column_items`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    items: Vec<WorkItem>,
}

impl BoardState {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a board holding `items` in the given order.
    #[must_use]
    pub const fn from_items(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    /// Returns every item in collection order.
    #[must_use]
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the board holds no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds an item by identifier.
    #[must_use]
    pub fn get(&self, id: &WorkItemId) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &WorkItemId) -> Option<&mut WorkItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Inserts or replaces an item.
    ///
    /// New items go to the front of the collection; existing items are
    /// replaced in place. Returns `true` when the item was new.
    pub fn upsert(&mut self, item: WorkItem) -> bool {
        if let Some(existing) = self.get_mut(item.id()) {
            *existing = item;
            return false;
        }
        self.items.insert(0, item);
        true
    }

    /// Removes an item, returning it when present.
    pub fn remove(&mut self, id: &WorkItemId) -> Option<WorkItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Replaces the whole collection with an authoritative snapshot.
    pub fn replace_all(&mut self, items: Vec<WorkItem>) {
        self.items = items;
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Moves an item to `placement`, appending it to the end of the
    /// collection, and returns the updated item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownWorkItem`] when the item is absent.
    pub fn relocate(
        &mut self,
        id: &WorkItemId,
        placement: Placement,
        clock: &impl Clock,
    ) -> Result<&WorkItem, BoardDomainError> {
        let mut moving = self
            .remove(id)
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))?;
        moving.relocate(placement.column, placement.order, clock);
        self.items.push(moving);
        self.items
            .last()
            .ok_or_else(|| BoardDomainError::UnknownWorkItem(id.clone()))
    }

    /// Returns the items of a column sorted for display.
    #[must_use]
    pub fn column_items(&self, column: Column) -> Vec<&WorkItem> {
        sorted_column(&self.items, column)
    }

    /// Returns the items of a stage in collection order.
    #[must_use]
    pub fn stage_items(&self, stage: Stage) -> Vec<&WorkItem> {
        self.items
            .iter()
            .filter(|item| item.stage() == stage)
            .collect()
    }

    /// Returns the items passing a category filter.
    #[must_use]
    pub fn visible(&self, filter: &CategoryFilter) -> Vec<&WorkItem> {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .collect()
    }

    /// Returns `true` when the column is non-empty and every item in it is
    /// explicitly compact.
    #[must_use]
    pub fn column_all_compact(&self, column: Column) -> bool {
        let mut in_column = self
            .items
            .iter()
            .filter(|item| item.column() == column)
            .peekable();
        in_column.peek().is_some() && in_column.all(|item| item.density() == Some(true))
    }

    /// Returns every distinct trimmed label, sorted ignoring case.
    #[must_use]
    pub fn known_labels(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .items
            .iter()
            .flat_map(|item| item.details().labels.iter())
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();
        let mut labels: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
        labels.sort_by_key(|label| label.to_lowercase());
        labels
    }
}

/// Selection of categories shown on the board; empty shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: BTreeSet<Category>,
}

impl CategoryFilter {
    /// Creates a filter that shows every item.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    /// Adds a category to the selection, or removes it when selected.
    pub fn toggle(&mut self, category: Category) {
        if !self.selected.remove(&category) {
            self.selected.insert(category);
        }
    }

    /// Returns the selected categories.
    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<Category> {
        &self.selected
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns `true` when `item` passes the filter.
    #[must_use]
    pub fn matches(&self, item: &WorkItem) -> bool {
        self.selected.is_empty() || self.selected.contains(&item.details().category)
    }
}

impl FromIterator<Category> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
