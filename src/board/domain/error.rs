//! Error types for board domain validation and parsing.

use super::WorkItemId;
use thiserror::Error;

/// Errors returned while constructing or mutating board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A work-item identifier was empty after trimming.
    #[error("work item identifier must not be empty")]
    EmptyWorkItemId,

    /// A board identifier was empty or contained a path separator.
    #[error("invalid board identifier '{0}'")]
    InvalidBoardId(String),

    /// A completion increment of zero pieces was requested.
    #[error("completion increment must be at least one piece")]
    ZeroCompletion,

    /// A completion increment would exceed the ordered quantity.
    #[error(
        "completion exceeds the order total: ordered {ordered}, completed {completed}, requested {requested}"
    )]
    CompletionExceedsOrdered {
        /// Quantity ordered.
        ordered: u32,
        /// Quantity completed before the increment.
        completed: u32,
        /// Rejected increment.
        requested: u32,
    },

    /// Undo was requested on an item with no recorded increments.
    #[error("work item {0} has no completion to undo")]
    NoCompletionToUndo(WorkItemId),

    /// A referenced work item is not on the board.
    #[error("work item not found: {0}")]
    UnknownWorkItem(WorkItemId),
}

/// Error returned while parsing a column code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column: {0}")]
pub struct ParseColumnError(pub String);

/// Error returned while parsing a stage code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);

/// Error returned while parsing a priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing an order category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order category: {0}")]
pub struct ParseCategoryError(pub String);
