//! Column rail flags and their reducer.
//!
//! A column shown as a rail is squeezed to a narrow vertical strip. Rail
//! flags change only through [`RailAction`]s applied by [`reduce`];
//! [`RailStore`] owns the current state and saves it after each dispatch.

use super::parse_entries;
use crate::board::domain::Column;
use crate::storage::{
    KeyValueStore,
    json::{load_lenient, save_best_effort},
    keys,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Change to the rail flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RailAction {
    /// Flips one column.
    ToggleRail(Column),
    /// Sets one column.
    SetRail(Column, bool),
    /// Sets every column that has a flag to the given value, or flips them
    /// together: all become rails unless all already are.
    ToggleAll(Option<bool>),
    /// Sets the listed columns.
    SetMany(Vec<Column>, bool),
    /// Sets the listed columns to the given value, or flips them together.
    ToggleByIds(Vec<Column>, Option<bool>),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnUi {
    is_rail: bool,
}

/// Rail flag per column; absent columns are not rails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<Column, Value>")]
pub struct RailState {
    rails: BTreeMap<Column, bool>,
}

impl RailState {
    /// Creates a state with no flags.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rails: BTreeMap::new(),
        }
    }

    /// Returns `true` when `column` is shown as a rail.
    #[must_use]
    pub fn is_rail(&self, column: Column) -> bool {
        self.rails.get(&column).copied().unwrap_or(false)
    }

    /// Returns the columns that carry a flag.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.rails.keys().copied()
    }
}

impl From<BTreeMap<String, Value>> for RailState {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let rails = parse_entries(raw, "column rails", |key, value| {
            let column = Column::try_from(key).ok()?;
            let ui: ColumnUi = serde_json::from_value(value).ok()?;
            Some((column, ui.is_rail))
        });
        Self { rails }
    }
}

impl From<RailState> for BTreeMap<Column, Value> {
    fn from(value: RailState) -> Self {
        value
            .rails
            .into_iter()
            .map(|(column, is_rail)| (column, json!({ "isRail": is_rail })))
            .collect()
    }
}

/// Applies `action` to `state`.
#[must_use]
pub fn reduce(state: &RailState, action: &RailAction) -> RailState {
    let mut next = state.clone();
    match action {
        RailAction::ToggleRail(column) => {
            next.rails.insert(*column, !state.is_rail(*column));
        }
        RailAction::SetRail(column, is_rail) => {
            next.rails.insert(*column, *is_rail);
        }
        RailAction::ToggleAll(value) => {
            let all_rails = !state.rails.is_empty() && state.rails.values().all(|rail| *rail);
            let target = value.unwrap_or(!all_rails);
            next.rails.values_mut().for_each(|rail| *rail = target);
        }
        RailAction::SetMany(columns, value) => {
            for column in columns {
                next.rails.insert(*column, *value);
            }
        }
        RailAction::ToggleByIds(columns, value) => {
            let all_rails =
                !columns.is_empty() && columns.iter().all(|column| state.is_rail(*column));
            let target = value.unwrap_or(!all_rails);
            for column in columns {
                next.rails.insert(*column, target);
            }
        }
    }
    next
}

/// Rail state saved to local storage after every change.
#[derive(Debug)]
pub struct RailStore<S: KeyValueStore> {
    store: Arc<S>,
    state: RailState,
}

impl<S: KeyValueStore> RailStore<S> {
    /// Loads the saved state, or starts empty.
    #[must_use]
    pub fn load(store: Arc<S>) -> Self {
        let state = load_lenient(store.as_ref(), keys::UI_RAILS).unwrap_or_default();
        Self { store, state }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &RailState {
        &self.state
    }

    /// Applies `action`, saves the result and returns it.
    pub fn dispatch(&mut self, action: &RailAction) -> &RailState {
        self.state = reduce(&self.state, action);
        save_best_effort(self.store.as_ref(), keys::UI_RAILS, &self.state);
        &self.state
    }
}
