//! Per-browser board layout preferences.
//!
//! WIP limits, stage widths, collapse flags and column rails are kept in
//! local storage only. Every record loads leniently: a missing or corrupt
//! record yields defaults and unknown entries are skipped.
//!
//! - Value types in [`wip`], [`widths`], [`collapse`] and [`rails`]
//! - Local persistence in [`store`]

pub mod collapse;
pub mod rails;
pub mod store;
pub mod widths;
pub mod wip;

pub use collapse::CollapseState;
pub use rails::{RailAction, RailState, RailStore, reduce};
pub use store::PreferenceStore;
pub use widths::{
    MAX_STAGE_WIDTH, MIN_STAGE_WIDTH, STAGE_WIDTH_STEP, StageWidths, default_width, normalize_width,
};
pub use wip::{WipLimits, WipStatus, wip_status};

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Parses the keys of a stored map, skipping entries `parse` rejects.
fn parse_entries<K, V>(
    raw: BTreeMap<String, Value>,
    record: &'static str,
    parse: impl Fn(&str, Value) -> Option<(K, V)>,
) -> BTreeMap<K, V>
where
    K: Ord,
{
    raw.into_iter()
        .filter_map(|(key, value)| {
            let parsed = parse(&key, value);
            if parsed.is_none() {
                warn!(record, key, "skipping unreadable preference entry");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests;
