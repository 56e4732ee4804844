//! Work-in-progress limits per column.

use super::parse_entries;
use crate::board::domain::Column;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Load indicator of a column against its WIP limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WipStatus {
    /// Unlimited, or below 80% of the limit.
    Normal,
    /// At 80% of the limit or more.
    Warning,
    /// At or over the limit.
    AtLimit,
}

/// Classifies `count` items against an optional limit.
#[must_use]
pub fn wip_status(count: usize, limit: Option<u32>) -> WipStatus {
    let Some(ceiling) = limit.filter(|value| *value > 0).map(u64::from) else {
        return WipStatus::Normal;
    };
    let held = u64::try_from(count).unwrap_or(u64::MAX);
    if held >= ceiling {
        WipStatus::AtLimit
    } else if held.saturating_mul(5) >= ceiling.saturating_mul(4) {
        WipStatus::Warning
    } else {
        WipStatus::Normal
    }
}

/// Optional item limits per column; absent columns are unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<Column, Option<u32>>")]
pub struct WipLimits {
    limits: BTreeMap<Column, u32>,
}

impl WipLimits {
    /// Creates limits with every column unlimited.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limits: BTreeMap::new(),
        }
    }

    /// Returns the limit of `column`.
    #[must_use]
    pub fn limit(&self, column: Column) -> Option<u32> {
        self.limits.get(&column).copied()
    }

    /// Sets or clears the limit of `column`; zero clears it.
    pub fn set(&mut self, column: Column, limit: Option<u32>) {
        self.limits.remove(&column);
        if let Some(value) = limit.filter(|candidate| *candidate > 0) {
            self.limits.insert(column, value);
        }
    }

    /// Classifies a column holding `count` items.
    #[must_use]
    pub fn status(&self, column: Column, count: usize) -> WipStatus {
        wip_status(count, self.limit(column))
    }
}

impl From<BTreeMap<String, Value>> for WipLimits {
    fn from(mut raw: BTreeMap<String, Value>) -> Self {
        raw.retain(|_, value| !value.is_null());
        let limits = parse_entries(raw, "wip limits", |key, value| {
            let column = Column::try_from(key).ok()?;
            let limit = value.as_u64().and_then(|whole| u32::try_from(whole).ok())?;
            (limit > 0).then_some((column, limit))
        });
        Self { limits }
    }
}

impl From<WipLimits> for BTreeMap<Column, Option<u32>> {
    fn from(value: WipLimits) -> Self {
        value
            .limits
            .into_iter()
            .map(|(column, limit)| (column, Some(limit)))
            .collect()
    }
}
