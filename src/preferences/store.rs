//! Local persistence of layout preferences.

use super::{CollapseState, StageWidths, WipLimits};
use crate::storage::{
    KeyValueStore,
    json::{load_lenient, save_best_effort},
    keys,
};
use std::sync::Arc;

/// Loads and saves layout preferences in local storage.
///
/// Loads fall back to defaults and saves log failures, so none of these
/// operations can fail.
#[derive(Debug, Clone)]
pub struct PreferenceStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Creates a preference store over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads WIP limits.
    #[must_use]
    pub fn wip_limits(&self) -> WipLimits {
        load_lenient(self.store.as_ref(), keys::WIP_LIMITS).unwrap_or_default()
    }

    /// Saves WIP limits.
    pub fn save_wip_limits(&self, limits: &WipLimits) {
        save_best_effort(self.store.as_ref(), keys::WIP_LIMITS, limits);
    }

    /// Loads stage widths.
    #[must_use]
    pub fn stage_widths(&self) -> StageWidths {
        load_lenient(self.store.as_ref(), keys::STAGE_WIDTHS).unwrap_or_default()
    }

    /// Saves stage widths.
    pub fn save_stage_widths(&self, widths: &StageWidths) {
        save_best_effort(self.store.as_ref(), keys::STAGE_WIDTHS, widths);
    }

    /// Loads collapse flags.
    #[must_use]
    pub fn collapse(&self) -> CollapseState {
        load_lenient(self.store.as_ref(), keys::COLLAPSE).unwrap_or_default()
    }

    /// Saves collapse flags.
    pub fn save_collapse(&self, collapse: &CollapseState) {
        save_best_effort(self.store.as_ref(), keys::COLLAPSE, collapse);
    }
}
