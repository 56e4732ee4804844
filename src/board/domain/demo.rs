//! Demonstration dataset seeded into an empty local board.

use super::{Category, Column, Priority, WorkItem, WorkItemDetails, WorkItemId};
use chrono::{Days, NaiveDate};
use mockable::Clock;

struct DemoOrder {
    id: &'static str,
    number: &'static str,
    description: &'static str,
    quantity: u32,
    due_in_days: i64,
    priority: Priority,
    category: Category,
    column: Column,
    order: f64,
    labels: &'static [&'static str],
}

const DEMO_ORDERS: [DemoOrder; 8] = [
    DemoOrder {
        id: "demo-1001",
        number: "1001",
        description: "Camisetas básicas brancas",
        quantity: 120,
        due_in_days: 30,
        priority: Priority::Medium,
        category: Category::Casual,
        column: Column::December,
        order: 1.0,
        labels: &["algodão"],
    },
    DemoOrder {
        id: "demo-1002",
        number: "1002",
        description: "Uniforme escolar manga curta",
        quantity: 300,
        due_in_days: 21,
        priority: Priority::High,
        category: Category::School,
        column: Column::AwaitingMaterial,
        order: 1.0,
        labels: &["escola municipal", "bordado"],
    },
    DemoOrder {
        id: "demo-1003",
        number: "1003",
        description: "Regatas dry-fit",
        quantity: 80,
        due_in_days: 12,
        priority: Priority::Medium,
        category: Category::Sports,
        column: Column::AwaitingCutting,
        order: 1.0,
        labels: &["dry-fit"],
    },
    DemoOrder {
        id: "demo-1004",
        number: "1004",
        description: "Moletons com capuz",
        quantity: 60,
        due_in_days: 9,
        priority: Priority::Low,
        category: Category::ReadyStock,
        column: Column::Planning,
        order: 1.0,
        labels: &[],
    },
    DemoOrder {
        id: "demo-1005",
        number: "1005",
        description: "Camisas polo bordadas",
        quantity: 45,
        due_in_days: 2,
        priority: Priority::High,
        category: Category::Service,
        column: Column::Sewing,
        order: 1.0,
        labels: &["bordado", "urgente"],
    },
    DemoOrder {
        id: "demo-1006",
        number: "1006",
        description: "Camisetas estampadas evento",
        quantity: 200,
        due_in_days: 5,
        priority: Priority::Medium,
        category: Category::Casual,
        column: Column::PrintFilm,
        order: 1.0,
        labels: &["silk"],
    },
    DemoOrder {
        id: "demo-1007",
        number: "1007",
        description: "Jaquetas do time",
        quantity: 25,
        due_in_days: -1,
        priority: Priority::High,
        category: Category::Sports,
        column: Column::Packaging,
        order: 1.0,
        labels: &[],
    },
    DemoOrder {
        id: "demo-1008",
        number: "1008",
        description: "Aventais personalizados",
        quantity: 40,
        due_in_days: -3,
        priority: Priority::Low,
        category: Category::Service,
        column: Column::Completed,
        order: 1.0,
        labels: &[],
    },
];

/// Builds the fixed demonstration board with dates relative to today.
///
/// Items in the done column start fully completed.
#[must_use]
pub fn demo_items(clock: &impl Clock) -> Vec<WorkItem> {
    let today = clock.utc().date_naive();
    DEMO_ORDERS
        .iter()
        .filter_map(|demo| {
            let id = WorkItemId::parse(demo.id).ok()?;
            let due = shift(today, demo.due_in_days);
            let issued = shift(due, -30);
            let details = WorkItemDetails::new(demo.number, demo.quantity, issued)
                .with_description(demo.description)
                .with_dates(issued, due)
                .with_priority(demo.priority)
                .with_category(demo.category)
                .with_labels(demo.labels.iter().copied());
            let mut item = WorkItem::create(id, details, demo.column, demo.order, clock);
            if demo.column.is_done() {
                item.record_completion(demo.quantity, None, clock).ok()?;
            }
            Some(item)
        })
        .collect()
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(date)
}
