//! Record keys used in local storage.
//!
//! Each key carries a version suffix so that a future incompatible layout can
//! move to a new record without clobbering the old one.

/// Full work-item collection for local mode.
pub const CARDS: &str = "kanban-cards-v1";

/// Per-column WIP limits.
pub const WIP_LIMITS: &str = "kanban-wip-v1";

/// Per-stage and per-column collapse flags.
pub const COLLAPSE: &str = "kanban-collapse-v1";

/// Per-stage desktop widths.
pub const STAGE_WIDTHS: &str = "kanban-stage-widths-v1";

/// Column rail state managed by the preference store.
pub const UI_RAILS: &str = "kanban-ui-v1";

/// Session token remembered by this installation.
pub const SESSION_TOKEN: &str = "kanban_sessionId";
