//! Delivery deadline classification.

use super::WorkItem;
use chrono::NaiveDate;

/// Urgency indicator derived from the delivery date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineStatus {
    /// The item sits in the done column.
    Completed,
    /// More than two days left.
    OnTrack,
    /// Due today or within two days.
    DueSoon,
    /// Delivery date has passed.
    Overdue,
}

/// Calendar days from `today` until the item's delivery date.
///
/// Negative once the date has passed.
#[must_use]
pub fn days_to_delivery(item: &WorkItem, today: NaiveDate) -> i64 {
    item.details()
        .delivery_date
        .signed_duration_since(today)
        .num_days()
}

/// Classifies an item's deadline as seen on `today`.
#[must_use]
pub fn deadline_status(item: &WorkItem, today: NaiveDate) -> DeadlineStatus {
    if item.column().is_done() {
        return DeadlineStatus::Completed;
    }
    match days_to_delivery(item, today) {
        days if days > 2 => DeadlineStatus::OnTrack,
        days if days >= 0 => DeadlineStatus::DueSoon,
        _ => DeadlineStatus::Overdue,
    }
}
