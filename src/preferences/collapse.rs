//! Collapsed stages and columns.

use crate::board::domain::{Column, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collapse flags per stage and per column; absent entries are expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseState {
    #[serde(default)]
    stages: BTreeMap<Stage, bool>,
    #[serde(default)]
    columns: BTreeMap<Column, bool>,
}

impl CollapseState {
    /// Creates a state with everything expanded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stages: BTreeMap::new(),
            columns: BTreeMap::new(),
        }
    }

    /// Returns `true` when `stage` is collapsed.
    #[must_use]
    pub fn is_stage_collapsed(&self, stage: Stage) -> bool {
        self.stages.get(&stage).copied().unwrap_or(false)
    }

    /// Sets the collapse flag of `stage`.
    pub fn set_stage(&mut self, stage: Stage, collapsed: bool) {
        self.stages.insert(stage, collapsed);
    }

    /// Flips the collapse flag of `stage` and returns the new value.
    pub fn toggle_stage(&mut self, stage: Stage) -> bool {
        let collapsed = !self.is_stage_collapsed(stage);
        self.set_stage(stage, collapsed);
        collapsed
    }

    /// Returns `true` when `column` is collapsed.
    #[must_use]
    pub fn is_column_collapsed(&self, column: Column) -> bool {
        self.columns.get(&column).copied().unwrap_or(false)
    }

    /// Sets the collapse flag of `column`.
    pub fn set_column(&mut self, column: Column, collapsed: bool) {
        self.columns.insert(column, collapsed);
    }

    /// Flips the collapse flag of `column` and returns the new value.
    pub fn toggle_column(&mut self, column: Column) -> bool {
        let collapsed = !self.is_column_collapsed(column);
        self.set_column(column, collapsed);
        collapsed
    }
}
