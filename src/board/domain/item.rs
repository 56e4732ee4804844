//! Work-item aggregate root and its descriptive value types.

use super::{
    BoardDomainError, Column, CompletionIncrement, LabelSet, ParseCategoryError,
    ParsePriorityError, Stage, WorkItemId, classify,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a work item.
///
/// Serialized with its board label (`Baixa`, `Média`, `Alta`), the form
/// stored records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    /// Low urgency.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// High urgency.
    High,
}

impl Priority {
    /// Returns the canonical code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Returns the board label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "low" | "baixa" => Ok(Self::Low),
            "medium" | "média" | "media" => Ok(Self::Medium),
            "high" | "alta" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.label().to_owned()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Business category of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Casual wear.
    #[default]
    Casual,
    /// School uniforms.
    School,
    /// Ready-to-ship stock.
    ReadyStock,
    /// Walk-in customer service.
    Service,
    /// Sportswear.
    Sports,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Self; 5] = [
        Self::Casual,
        Self::School,
        Self::ReadyStock,
        Self::Service,
        Self::Sports,
    ];

    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "CASUAL",
            Self::School => "ESCOLAR",
            Self::ReadyStock => "PRONTA_ENTREGA",
            Self::Service => "ATENDIMENTO",
            Self::Sports => "ESPORTIVO",
        }
    }

    /// Returns the filter label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Casual => "Casual",
            Self::School => "Escolar",
            Self::ReadyStock => "Pronta Entrega",
            Self::Service => "Atendimento",
            Self::Sports => "Esportivo",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = ParseCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseCategoryError(value.to_owned()))
    }
}

impl TryFrom<String> for Category {
    type Error = ParseCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-editable description of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItemDetails {
    /// Customer-facing order number.
    pub order_number: String,
    /// Free-text description.
    pub description: String,
    /// Date the order was issued.
    pub issue_date: NaiveDate,
    /// Promised delivery date.
    pub delivery_date: NaiveDate,
    /// Number of pieces ordered.
    pub quantity_ordered: u32,
    /// Urgency.
    pub priority: Priority,
    /// Business category.
    pub category: Category,
    /// Free-form labels.
    pub labels: LabelSet,
}

impl WorkItemDetails {
    /// Creates details issued and due on `date` with default priority and
    /// category and no labels.
    #[must_use]
    pub fn new(order_number: impl Into<String>, quantity_ordered: u32, date: NaiveDate) -> Self {
        Self {
            order_number: order_number.into(),
            description: String::new(),
            issue_date: date,
            delivery_date: date,
            quantity_ordered,
            priority: Priority::default(),
            category: Category::default(),
            labels: LabelSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets issue and delivery dates.
    #[must_use]
    pub const fn with_dates(mut self, issue_date: NaiveDate, delivery_date: NaiveDate) -> Self {
        self.issue_date = issue_date;
        self.delivery_date = delivery_date;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels<S: AsRef<str>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }
}

/// Work-item aggregate root.
///
/// The stage is not stored independently: it is derived from the column
/// whenever the column is set.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    id: WorkItemId,
    details: WorkItemDetails,
    quantity_completed: u32,
    completions: Vec<CompletionIncrement>,
    column: Column,
    stage: Stage,
    order: f64,
    updated_at: DateTime<Utc>,
    density: Option<bool>,
}

/// Parameter object for reconstructing a persisted work item.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedWorkItemData {
    /// Persisted identifier.
    pub id: WorkItemId,
    /// Persisted descriptive fields.
    pub details: WorkItemDetails,
    /// Persisted completed quantity; clamped into range on load.
    pub quantity_completed: u32,
    /// Persisted increments, newest first.
    pub completions: Vec<CompletionIncrement>,
    /// Persisted column.
    pub column: Column,
    /// Persisted order key.
    pub order: f64,
    /// Persisted last-modified timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted density flag.
    pub density: Option<bool>,
}

impl WorkItem {
    /// Creates a new work item with nothing completed.
    #[must_use]
    pub fn create(
        id: WorkItemId,
        details: WorkItemDetails,
        column: Column,
        order: f64,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            details,
            quantity_completed: 0,
            completions: Vec::new(),
            column,
            stage: classify(column),
            order,
            updated_at: clock.utc(),
            density: None,
        }
    }

    /// Reconstructs a work item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkItemData) -> Self {
        let quantity_completed = data.quantity_completed.min(data.details.quantity_ordered);
        Self {
            id: data.id,
            details: data.details,
            quantity_completed,
            completions: data.completions,
            column: data.column,
            stage: classify(data.column),
            order: data.order,
            updated_at: data.updated_at,
            density: data.density,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &WorkItemId {
        &self.id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &WorkItemDetails {
        &self.details
    }

    /// Returns the number of pieces ordered.
    #[must_use]
    pub const fn quantity_ordered(&self) -> u32 {
        self.details.quantity_ordered
    }

    /// Returns the number of pieces completed.
    #[must_use]
    pub const fn quantity_completed(&self) -> u32 {
        self.quantity_completed
    }

    /// Returns the pieces still to produce.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.details
            .quantity_ordered
            .saturating_sub(self.quantity_completed)
    }

    /// Returns recorded increments, newest first.
    #[must_use]
    pub fn completions(&self) -> &[CompletionIncrement] {
        &self.completions
    }

    /// Returns the column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Returns the stage derived from the column.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the order key within the column.
    #[must_use]
    pub const fn order(&self) -> f64 {
        self.order
    }

    /// Returns the last-modified timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the density flag; `None` inherits the column setting.
    #[must_use]
    pub const fn density(&self) -> Option<bool> {
        self.density
    }

    /// Replaces the descriptive fields and moves the item to `column`,
    /// keeping its order key.
    ///
    /// The completed quantity is clamped to the new ordered quantity.
    pub fn apply_details(&mut self, details: WorkItemDetails, column: Column, clock: &impl Clock) {
        self.quantity_completed = self.quantity_completed.min(details.quantity_ordered);
        self.details = details;
        self.set_column(column);
        self.touch(clock);
    }

    /// Moves the item to `column` at `order`.
    pub fn relocate(&mut self, column: Column, order: f64, clock: &impl Clock) {
        self.set_column(column);
        self.order = order;
        self.touch(clock);
    }

    /// Records `amount` more finished pieces.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ZeroCompletion`] for an empty increment or
    /// [`BoardDomainError::CompletionExceedsOrdered`] when the total would
    /// pass the ordered quantity. The item is unchanged on error.
    pub fn record_completion(
        &mut self,
        amount: u32,
        note: Option<String>,
        clock: &impl Clock,
    ) -> Result<CompletionIncrement, BoardDomainError> {
        if amount == 0 {
            return Err(BoardDomainError::ZeroCompletion);
        }
        let ordered = self.details.quantity_ordered;
        let total = match self.quantity_completed.checked_add(amount) {
            Some(total) if total <= ordered => total,
            _ => {
                return Err(BoardDomainError::CompletionExceedsOrdered {
                    ordered,
                    completed: self.quantity_completed,
                    requested: amount,
                });
            }
        };

        let increment = CompletionIncrement::record(amount, note, clock);
        self.quantity_completed = total;
        self.completions.insert(0, increment.clone());
        self.touch(clock);
        Ok(increment)
    }

    /// Removes the most recent increment and gives its pieces back.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NoCompletionToUndo`] when nothing has been
    /// recorded.
    pub fn undo_last_completion(
        &mut self,
        clock: &impl Clock,
    ) -> Result<CompletionIncrement, BoardDomainError> {
        if self.completions.is_empty() {
            return Err(BoardDomainError::NoCompletionToUndo(self.id.clone()));
        }
        let undone = self.completions.remove(0);
        self.quantity_completed = self.quantity_completed.saturating_sub(undone.amount());
        self.touch(clock);
        Ok(undone)
    }

    /// Sets the density flag.
    pub const fn set_density(&mut self, density: Option<bool>) {
        self.density = density;
    }

    const fn set_column(&mut self, column: Column) {
        self.column = column;
        self.stage = classify(column);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
