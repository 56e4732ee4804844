//! Step definitions for board placement scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
