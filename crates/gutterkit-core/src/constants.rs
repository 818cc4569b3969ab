//! Shared constants
//!
//! Values that are part of the document contract rather than user tuning.
//! Tunable thresholds live in `gutterkit-settings`.

/// Z-index sentinel for the blueprint layer; new elements always start above it
pub const BLUEPRINT_Z_INDEX: i32 = -1;

/// Standard length assumed for a measurable part whose id carries no length
pub const DEFAULT_STANDARD_LENGTH_MM: u32 = 3000;

/// Default drop rotation for gutter runs (isometric look)
pub const GUTTER_DEFAULT_ROTATION_DEG: f64 = 30.0;

/// Default drop rotation for downpipes, joiners and droppers (standing up)
pub const UPRIGHT_DEFAULT_ROTATION_DEG: f64 = 90.0;

/// Screw product added alongside brackets
pub const STAINLESS_SCREW_ID: &str = "SCR-SS";
