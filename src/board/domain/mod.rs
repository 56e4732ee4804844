//! Domain model for the production board.
//!
//! Work items move across a fixed grid of columns grouped into four stages.
//! This module holds the item aggregate, the column classifier, fractional
//! reordering and the header aggregates, with no infrastructure concerns.

mod column;
mod completion;
mod deadline;
mod demo;
mod error;
mod ids;
mod item;
mod labels;
pub mod placement;
mod state;
mod totals;

pub use column::{Column, Stage, classify};
pub use completion::CompletionIncrement;
pub use deadline::{DeadlineStatus, days_to_delivery, deadline_status};
pub use demo::demo_items;
pub use error::{
    BoardDomainError, ParseCategoryError, ParseColumnError, ParsePriorityError, ParseStageError,
};
pub use ids::{BoardId, WorkItemId};
pub use item::{Category, PersistedWorkItemData, Priority, WorkItem, WorkItemDetails};
pub use labels::{LabelSet, SUGGESTION_LIMIT};
pub use placement::{DropTarget, Placement, place};
pub use state::{BoardState, CategoryFilter};
pub use totals::{Totals, column_totals, open_totals, stage_totals};
