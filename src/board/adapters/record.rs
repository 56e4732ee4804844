//! Stored representation of work items.
//!
//! Local snapshots and remote documents share one JSON layout. Decoding is
//! lenient so that records written by older versions still load: missing
//! counts, histories, labels and categories take defaults, blank or
//! unreadable dates fall back to a [`RecordFallback`] day, and the stored
//! stage is ignored in favour of the column.

use crate::board::domain::{
    Category, Column, CompletionIncrement, LabelSet, ParseColumnError, PersistedWorkItemData,
    Priority, WorkItem, WorkItemDetails, WorkItemId,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Order key given to local records stored without one.
pub const LOCAL_FALLBACK_ORDER: f64 = 0.0;

/// Order key given to remote documents stored without one; sorts last.
pub const REMOTE_FALLBACK_ORDER: f64 = 9_007_199_254_740_991.0;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Values used for fields a stored record lacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordFallback {
    /// Order key for records stored without one.
    pub order: f64,
    /// Day used for a blank or unreadable date when the record carries no
    /// last-modified timestamp either.
    pub today: NaiveDate,
}

impl RecordFallback {
    /// Fallback for local snapshots, as seen on the clock's current day.
    #[must_use]
    pub fn local(clock: &impl Clock) -> Self {
        Self {
            order: LOCAL_FALLBACK_ORDER,
            today: clock.utc().date_naive(),
        }
    }

    /// Fallback for remote documents, as seen on the clock's current day.
    #[must_use]
    pub fn remote(clock: &impl Clock) -> Self {
        Self {
            order: REMOTE_FALLBACK_ORDER,
            today: clock.utc().date_naive(),
        }
    }
}

/// Decoded local snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotContents {
    /// Items that decoded.
    pub items: Vec<WorkItem>,
    /// Raw entries that did not decode, kept so they can be written back.
    pub unreadable: Vec<Value>,
}

/// Serialized work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRecord {
    /// Item identifier; remote documents may carry it in the path instead.
    #[serde(default)]
    pub id: String,
    /// Order number.
    #[serde(default, rename = "numero")]
    pub order_number: String,
    /// Description.
    #[serde(default, rename = "descricao")]
    pub description: String,
    /// Issue date as `YYYY-MM-DD`.
    #[serde(default, rename = "emissao")]
    pub issue_date: String,
    /// Delivery date as `YYYY-MM-DD`.
    #[serde(default, rename = "entrega")]
    pub delivery_date: String,
    /// Pieces ordered.
    #[serde(default, rename = "qtd", deserialize_with = "lenient_count")]
    pub quantity_ordered: u32,
    /// Pieces completed.
    #[serde(default, rename = "qtdConcluida", deserialize_with = "lenient_count")]
    pub quantity_completed: u32,
    /// Completion history, newest first.
    #[serde(default, rename = "apontamentos", deserialize_with = "lenient_list")]
    pub completions: Vec<CompletionIncrement>,
    /// Priority label.
    #[serde(default, rename = "prioridade")]
    pub priority: Option<String>,
    /// Last-modified timestamp in RFC 3339.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Stage code kept for readers that do not classify columns.
    #[serde(default)]
    pub stage: Option<String>,
    /// Column code.
    pub column: String,
    /// Density flag.
    #[serde(default, rename = "compact", skip_serializing_if = "Option::is_none")]
    pub density: Option<bool>,
    /// Order key within the column.
    #[serde(default)]
    pub order: Option<f64>,
    /// Labels.
    #[serde(default, rename = "tags", deserialize_with = "lenient_list")]
    pub labels: Vec<String>,
    /// Category code.
    #[serde(default, rename = "tipo")]
    pub category: Option<String>,
}

/// Errors raised while decoding a stored work item.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The JSON does not have the record shape.
    #[error("malformed work item record: {0}")]
    Malformed(String),

    /// The record has no usable identifier.
    #[error("work item record has no identifier")]
    MissingId,

    /// The column code is unknown.
    #[error(transparent)]
    Column(#[from] ParseColumnError),
}

impl WorkItemRecord {
    /// Encodes a work item.
    #[must_use]
    pub fn from_item(item: &WorkItem) -> Self {
        let details = item.details();
        Self {
            id: item.id().to_string(),
            order_number: details.order_number.clone(),
            description: details.description.clone(),
            issue_date: details.issue_date.format(DATE_FORMAT).to_string(),
            delivery_date: details.delivery_date.format(DATE_FORMAT).to_string(),
            quantity_ordered: details.quantity_ordered,
            quantity_completed: item.quantity_completed(),
            completions: item.completions().to_vec(),
            priority: Some(details.priority.label().to_owned()),
            updated_at: Some(item.updated_at().to_rfc3339()),
            stage: Some(item.stage().as_str().to_owned()),
            column: item.column().as_str().to_owned(),
            density: item.density(),
            order: Some(item.order()),
            labels: details.labels.iter().map(str::to_owned).collect(),
            category: Some(details.category.as_str().to_owned()),
        }
    }

    /// Decodes the record into a work item.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the identifier or column is unusable.
    pub fn into_item(self, fallback: RecordFallback) -> Result<WorkItem, RecordError> {
        let id = WorkItemId::parse(self.id.as_str()).map_err(|_| RecordError::MissingId)?;
        let column = Column::try_from(self.column.as_str())?;
        if let Some(stored) = self.stage.as_deref()
            && stored != column.stage().as_str()
        {
            warn!(
                item = %id,
                stored,
                derived = column.stage().as_str(),
                "stored stage disagrees with column; using derived stage"
            );
        }

        let priority = match self.priority.as_deref().map(Priority::try_from) {
            None => Priority::default(),
            Some(Ok(priority)) => priority,
            Some(Err(err)) => {
                warn!(item = %id, error = %err, "unknown priority; using default");
                Priority::default()
            }
        };
        let category = match self.category.as_deref().map(Category::try_from) {
            None => Category::default(),
            Some(Ok(category)) => category,
            Some(Err(err)) => {
                warn!(item = %id, error = %err, "unknown category; using default");
                Category::default()
            }
        };
        let stamped = self
            .updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|stamp| stamp.with_timezone(&Utc));
        let fallback_day = stamped.map_or(fallback.today, |stamp| stamp.date_naive());
        let issue_date = date_or(&id, "issue date", &self.issue_date, fallback_day);
        let delivery_date = date_or(&id, "delivery date", &self.delivery_date, fallback_day);
        let updated_at = stamped.unwrap_or_default();

        let details = WorkItemDetails {
            order_number: self.order_number,
            description: self.description,
            issue_date,
            delivery_date,
            quantity_ordered: self.quantity_ordered,
            priority,
            category,
            labels: LabelSet::from(self.labels),
        };
        Ok(WorkItem::from_persisted(PersistedWorkItemData {
            id,
            details,
            quantity_completed: self.quantity_completed,
            completions: self.completions,
            column,
            order: self
                .order
                .filter(|order| order.is_finite())
                .unwrap_or(fallback.order),
            updated_at,
            density: self.density,
        }))
    }

    /// Decodes a JSON value into a work item.
    ///
    /// `id_override` replaces the embedded identifier, as remote documents
    /// are keyed by their path.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the value is not a usable record.
    pub fn decode(
        value: &Value,
        id_override: Option<&str>,
        fallback: RecordFallback,
    ) -> Result<WorkItem, RecordError> {
        let mut record = Self::deserialize(value)
            .map_err(|err| RecordError::Malformed(err.to_string()))?;
        if let Some(id) = id_override {
            id.clone_into(&mut record.id);
        }
        record.into_item(fallback)
    }
}

/// Decodes a local snapshot.
///
/// Entries that do not decode are returned verbatim in
/// [`SnapshotContents::unreadable`]. Anything other than a JSON array
/// decodes to an empty board.
#[must_use]
pub fn decode_snapshot(value: &Value, fallback: RecordFallback) -> SnapshotContents {
    let Some(entries) = value.as_array() else {
        warn!("stored work items are not a list; starting empty");
        return SnapshotContents::default();
    };
    let mut contents = SnapshotContents::default();
    for entry in entries {
        match WorkItemRecord::decode(entry, None, fallback) {
            Ok(item) => contents.items.push(item),
            Err(err) => {
                warn!(error = %err, "keeping unreadable stored work item aside");
                contents.unreadable.push(entry.clone());
            }
        }
    }
    contents
}

/// Encodes a board snapshot.
#[must_use]
pub fn encode_snapshot(items: &[WorkItem]) -> Vec<WorkItemRecord> {
    items.iter().map(WorkItemRecord::from_item).collect()
}

fn date_or(id: &WorkItemId, field: &'static str, raw: &str, fallback: NaiveDate) -> NaiveDate {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, DATE_FORMAT).unwrap_or_else(|_| {
        if day.is_empty() {
            debug!(item = %id, field, %fallback, "blank date; using fallback day");
        } else {
            warn!(item = %id, field, value = raw, %fallback, "unreadable date; using fallback day");
        }
        fallback
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, count_from_value))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

fn count_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(|whole| u32::try_from(whole).unwrap_or(u32::MAX))
            .or_else(|| number.as_f64().map(count_from_float))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse::<f64>().map_or(0, count_from_float),
        _ => 0,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite, non-negative and clamped to the u32 range"
)]
fn count_from_float(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
