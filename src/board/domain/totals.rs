//! Aggregate counts shown in column, stage and board headers.

use super::{Column, Stage, WorkItem};

/// Number of orders and pieces still to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Number of work items.
    pub orders: usize,
    /// Sum of remaining pieces.
    pub pieces: u64,
}

impl Totals {
    /// Sums the items matching `include`.
    #[must_use]
    pub fn collect<'a>(
        items: impl IntoIterator<Item = &'a WorkItem>,
        include: impl Fn(&WorkItem) -> bool,
    ) -> Self {
        items
            .into_iter()
            .filter(|item| include(item))
            .fold(Self::default(), |totals, item| Self {
                orders: totals.orders.saturating_add(1),
                pieces: totals.pieces.saturating_add(u64::from(item.remaining())),
            })
    }
}

/// Totals for one column.
#[must_use]
pub fn column_totals<'a>(items: impl IntoIterator<Item = &'a WorkItem>, column: Column) -> Totals {
    Totals::collect(items, |item| item.column() == column)
}

/// Totals for one stage.
#[must_use]
pub fn stage_totals<'a>(items: impl IntoIterator<Item = &'a WorkItem>, stage: Stage) -> Totals {
    Totals::collect(items, |item| item.stage() == stage)
}

/// Totals for every item not yet in the done column.
#[must_use]
pub fn open_totals<'a>(items: impl IntoIterator<Item = &'a WorkItem>) -> Totals {
    Totals::collect(items, |item| !item.column().is_done())
}
