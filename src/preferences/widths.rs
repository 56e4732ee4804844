//! Desktop column widths per stage.

use super::parse_entries;
use crate::board::domain::Stage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Narrowest allowed column width in pixels.
pub const MIN_STAGE_WIDTH: u32 = 320;
/// Widest allowed column width in pixels.
pub const MAX_STAGE_WIDTH: u32 = 520;
/// Width granularity in pixels.
pub const STAGE_WIDTH_STEP: u32 = 8;

/// Returns the width used for `stage` when none is stored.
#[must_use]
pub const fn default_width(stage: Stage) -> u32 {
    match stage {
        Stage::Production => 384,
        Stage::PreProduction => 352,
        Stage::Done => 360,
        Stage::Calendar => 320,
    }
}

/// Clamps a width into range and rounds it down to the step.
#[must_use]
pub const fn normalize_width(pixels: u32) -> u32 {
    let clamped = if pixels < MIN_STAGE_WIDTH {
        MIN_STAGE_WIDTH
    } else if pixels > MAX_STAGE_WIDTH {
        MAX_STAGE_WIDTH
    } else {
        pixels
    };
    clamped & !(STAGE_WIDTH_STEP - 1)
}

/// Column widths chosen per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<Stage, u32>")]
pub struct StageWidths {
    widths: BTreeMap<Stage, u32>,
}

impl StageWidths {
    /// Creates widths with every stage at its default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            widths: BTreeMap::new(),
        }
    }

    /// Returns the width of `stage`.
    #[must_use]
    pub fn width(&self, stage: Stage) -> u32 {
        self.widths
            .get(&stage)
            .copied()
            .unwrap_or_else(|| default_width(stage))
    }

    /// Stores a width for `stage` and returns the normalized value.
    pub fn set(&mut self, stage: Stage, pixels: u32) -> u32 {
        let width = normalize_width(pixels);
        self.widths.insert(stage, width);
        width
    }

    /// Forgets the width of `stage`, restoring its default.
    pub fn reset(&mut self, stage: Stage) {
        self.widths.remove(&stage);
    }
}

impl From<BTreeMap<String, Value>> for StageWidths {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let widths = parse_entries(raw, "stage widths", |key, value| {
            let stage = Stage::try_from(key).ok()?;
            let pixels = value.as_u64().map(|whole| u32::try_from(whole).unwrap_or(u32::MAX))?;
            Some((stage, normalize_width(pixels)))
        });
        Self { widths }
    }
}

impl From<StageWidths> for BTreeMap<Stage, u32> {
    fn from(value: StageWidths) -> Self {
        value.widths
    }
}
