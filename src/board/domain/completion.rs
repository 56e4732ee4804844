//! Completion increments recorded against a work item.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One production report: `amount` more pieces finished at `at`.
///
/// Increments are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionIncrement {
    id: String,
    at: DateTime<Utc>,
    #[serde(rename = "qtd")]
    amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl CompletionIncrement {
    /// Records a new increment stamped with the current time.
    #[must_use]
    pub fn record(amount: u32, note: Option<String>, clock: &impl Clock) -> Self {
        let cleaned = note
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self {
            id: Uuid::new_v4().to_string(),
            at: clock.utc(),
            amount,
            note: cleaned,
        }
    }

    /// Returns the increment identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns when the increment was recorded.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns the number of pieces reported.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns the optional operator note.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
