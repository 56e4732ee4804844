//! Unit tests for the board module.

mod service_tests;

use crate::board::domain::{Column, WorkItem, WorkItemDetails, WorkItemId};
use mockable::{Clock, DefaultClock};

/// Builds an item of `quantity` pieces in `column` at `order`.
fn item_in(raw: &str, column: Column, order: f64, quantity: u32) -> WorkItem {
    let clock = DefaultClock;
    let today = clock.utc().date_naive();
    let details = WorkItemDetails::new(format!("OP-{raw}"), quantity, today);
    WorkItem::create(
        WorkItemId::parse(raw).expect("valid id"),
        details,
        column,
        order,
        &clock,
    )
}

fn id(raw: &str) -> WorkItemId {
    WorkItemId::parse(raw).expect("valid id")
}
