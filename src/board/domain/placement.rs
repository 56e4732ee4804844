//! Fractional reordering for drag-and-drop moves.
//!
//! A move never renumbers other items: the mover gets an order key below the
//! column minimum or halfway between two neighbours. Repeated insertion at
//! the same boundary halves the gap each time, so after enough moves two
//! neighbours can collapse onto the same key. Keys are not rebalanced; a
//! collapse is logged and ties then sort by board position.

use super::{BoardDomainError, Column, WorkItem, WorkItemId};
use std::cmp::Ordering;
use tracing::warn;

/// Where a dragged item was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Above every item of the column.
    ColumnTop(Column),
    /// Immediately before the given item, in that item's column.
    Before(WorkItemId),
}

/// Computed destination of a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Destination column.
    pub column: Column,
    /// Order key within the destination column.
    pub order: f64,
}

/// Orders two keys ascending with a total order over `f64`.
#[must_use]
pub fn compare_order(left: f64, right: f64) -> Ordering {
    left.total_cmp(&right)
}

/// Returns the items of `column` sorted by ascending order key.
///
/// The sort is stable, so equal keys keep their collection order.
#[must_use]
pub fn sorted_column<'a>(
    items: impl IntoIterator<Item = &'a WorkItem>,
    column: Column,
) -> Vec<&'a WorkItem> {
    let mut in_column: Vec<&WorkItem> = items
        .into_iter()
        .filter(|item| item.column() == column)
        .collect();
    in_column.sort_by(|left, right| compare_order(left.order(), right.order()));
    in_column
}

/// Computes where `mover` lands when dropped on `target`.
///
/// Returns `Ok(None)` when an item is dropped before itself.
///
/// # Errors
///
/// Returns [`BoardDomainError::UnknownWorkItem`] when the mover or the
/// target item is not in `items`.
pub fn place(
    items: &[WorkItem],
    mover: &WorkItemId,
    target: &DropTarget,
) -> Result<Option<Placement>, BoardDomainError> {
    if !items.iter().any(|item| item.id() == mover) {
        return Err(BoardDomainError::UnknownWorkItem(mover.clone()));
    }
    let others = items.iter().filter(|item| item.id() != mover);

    match target {
        DropTarget::ColumnTop(column) => {
            let order = sorted_column(others, *column)
                .first()
                .map_or(0.0, |first| below(first.order()));
            Ok(Some(Placement {
                column: *column,
                order,
            }))
        }
        DropTarget::Before(target_id) if target_id == mover => Ok(None),
        DropTarget::Before(target_id) => {
            let anchor = items
                .iter()
                .find(|item| item.id() == target_id)
                .ok_or_else(|| BoardDomainError::UnknownWorkItem(target_id.clone()))?;
            let column = anchor.column();
            let neighbours = sorted_column(others, column);
            let predecessor = neighbours
                .iter()
                .position(|item| item.id() == target_id)
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| neighbours.get(index));
            let order = match predecessor {
                Some(previous) => between(previous.order(), anchor.order()),
                None => below(anchor.order()),
            };
            Ok(Some(Placement { column, order }))
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "order keys are fractional by construction"
)]
fn below(order: f64) -> f64 {
    order - 1.0
}

fn between(lower: f64, upper: f64) -> f64 {
    let midpoint = lower.midpoint(upper);
    if compare_order(midpoint, lower).is_eq() || compare_order(midpoint, upper).is_eq() {
        warn!(
            lower,
            upper, "order keys exhausted between neighbours; items will tie"
        );
    }
    midpoint
}
