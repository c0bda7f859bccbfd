//! Scene issues
//!
//! Nothing in the animation core is fatal. Placement and resource problems are
//! absorbed where they happen (skip, clamp, or accept a fallback) and recorded
//! here so the host can surface them. Only config parsing hands an issue back
//! as an `Err`.

use thiserror::Error;

/// Axis of a placement band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SceneIssue {
    /// Resource handle could not be resolved; the entity was not created
    #[error("resource `{key}` is missing, entity skipped")]
    MissingResource { key: String },

    /// Band had no positive extent and was widened to one unit
    #[error("{axis} band [{lower}, {upper}] is degenerate, clamped to one unit")]
    DegenerateBand { axis: Axis, lower: f32, upper: f32 },

    /// No candidate met the minimum distance; the last one was accepted anyway
    #[error("placement {index} exhausted {attempts} attempts, minimum distance waived")]
    PlacementExhausted { index: usize, attempts: u32 },

    #[error("invalid tuning document: {0}")]
    InvalidTuning(#[source] serde_json::Error),

    #[error("invalid resource manifest: {0}")]
    InvalidManifest(#[source] serde_json::Error),
}
