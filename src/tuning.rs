//! Data-driven scene tuning
//!
//! Every constant the animators read lives here so a host can override any
//! subset from JSON. Missing fields fall back to the defaults below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SceneIssue;
use crate::sim::state::{EntityDef, Role};

/// Water surface and submerged-entity bob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterTuning {
    /// Peak vertical offset of the water overlay
    pub bob_amplitude: f32,
    /// Angular speed of the bob (radians per ms)
    pub bob_speed: f32,
    /// Share of `bob_amplitude` applied to submerged entities
    pub underwater_amplitude_factor: f32,
    /// Peak alpha swing for submerged entities
    pub alpha_variance: f32,
    /// Phase step per catalog index
    pub phase_offset: f32,
    /// Base alpha given to submerged entities
    pub underwater_alpha: f32,
}

impl Default for WaterTuning {
    fn default() -> Self {
        Self {
            bob_amplitude: 8.0,
            bob_speed: 0.002,
            underwater_amplitude_factor: 0.35,
            alpha_variance: 0.06,
            phase_offset: 0.6,
            underwater_alpha: 0.88,
        }
    }
}

/// Scatter placement band and spacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    pub min_distance: f32,
    pub retry_budget: u32,
    /// Horizontal padding is `min(padding_cap, width * padding_ratio)`
    pub padding_cap: f32,
    pub padding_ratio: f32,
    /// Band top = waterline + `band_top_offset`
    pub band_top_offset: f32,
    /// Band bottom is never shallower than waterline + `band_min_depth`
    pub band_min_depth: f32,
    /// Band bottom = height - `band_bottom_margin`
    pub band_bottom_margin: f32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            min_distance: 160.0,
            retry_budget: 24,
            padding_cap: 160.0,
            padding_ratio: 0.12,
            band_top_offset: 70.0,
            band_min_depth: 100.0,
            band_bottom_margin: 140.0,
        }
    }
}

/// A single cloud cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudDef {
    pub pos: Vec2,
    pub scale: f32,
    /// Units per ms
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudTuning {
    /// Off-screen distance a cloud travels before and after the viewport
    pub overhang: f32,
    /// Wrap boundary = viewport width + `wrap_margin`
    pub wrap_margin: f32,
    pub definitions: Vec<CloudDef>,
}

impl Default for CloudTuning {
    fn default() -> Self {
        Self {
            overhang: 150.0,
            wrap_margin: 200.0,
            definitions: vec![
                CloudDef {
                    pos: Vec2::new(140.0, 80.0),
                    scale: 0.95,
                    speed: 0.02,
                },
                CloudDef {
                    pos: Vec2::new(420.0, 60.0),
                    scale: 1.1,
                    speed: 0.015,
                },
                CloudDef {
                    pos: Vec2::new(780.0, 90.0),
                    scale: 1.25,
                    speed: 0.018,
                },
            ],
        }
    }
}

/// Ranges sampled once per swimmer at placement time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimTuning {
    /// Units per ms
    pub speed_min: f32,
    pub speed_max: f32,
    pub amplitude_min: f32,
    pub amplitude_max: f32,
    /// Radians per ms
    pub angular_speed_min: f32,
    pub angular_speed_max: f32,
    /// Distance past a viewport edge before wrapping
    pub wrap_margin: f32,
}

impl Default for SwimTuning {
    fn default() -> Self {
        Self {
            speed_min: 0.03,
            speed_max: 0.07,
            amplitude_min: 4.0,
            amplitude_max: 12.0,
            angular_speed_min: 0.0015,
            angular_speed_max: 0.003,
            wrap_margin: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeTuning {
    /// Unscaled control points relative to the anchor; first must be (0, 0)
    pub base_points: Vec<Vec2>,
    /// Relaxation rate toward `min_factor` while held (per nominal frame)
    pub reel_speed: f32,
    /// Relaxation rate back toward 1.0 once released
    pub release_speed: f32,
    pub min_factor: f32,
    /// Anchor offset as a share of boat size: x to the left, y downward
    pub attach_ratio: Vec2,
    pub hook_underwater_alpha: f32,
}

impl Default for RopeTuning {
    fn default() -> Self {
        Self {
            base_points: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(-2.0, 48.0),
                Vec2::new(-3.0, 108.0),
                Vec2::new(-3.0, 168.0),
                Vec2::new(-2.0, 228.0),
                Vec2::new(-1.0, 288.0),
                Vec2::new(0.0, 336.0),
            ],
            reel_speed: 0.12,
            release_speed: 0.04,
            min_factor: 0.35,
            attach_ratio: Vec2::new(0.305, 0.02),
            hook_underwater_alpha: 0.9,
        }
    }
}

/// Complete scene tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical coordinate separating sky from sea
    pub waterline_y: f32,
    /// Scale used by entity definitions that leave it unset
    pub default_scale: f32,
    pub water: WaterTuning,
    pub placement: PlacementTuning,
    pub clouds: CloudTuning,
    pub swim: SwimTuning,
    pub rope: RopeTuning,
    /// Entity catalog in draw/phase order
    pub entities: Vec<EntityDef>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            waterline_y: 210.0,
            default_scale: 0.1,
            water: WaterTuning::default(),
            placement: PlacementTuning::default(),
            clouds: CloudTuning::default(),
            swim: SwimTuning::default(),
            rope: RopeTuning::default(),
            entities: vec![
                EntityDef::new("boot", Role::Ambient).with_scale(0.085),
                EntityDef::new("fish", Role::Swimmer).with_scale(0.075),
                EntityDef::new("hook", Role::LineFollower).with_scale(0.055),
                EntityDef::new("manFishing", Role::Boat)
                    .with_scale(0.28)
                    .with_anchor(Vec2::new(660.0, 150.0)),
                EntityDef::new("seaweed", Role::Ambient).with_scale(0.075),
                EntityDef::new("tuna", Role::Swimmer).with_scale(0.075),
            ],
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document over the defaults
    pub fn from_json(json: &str) -> Result<Self, SceneIssue> {
        serde_json::from_str(json).map_err(SceneIssue::InvalidTuning)
    }

    /// Parse, falling back to defaults on a malformed document
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(issue) => {
                log::warn!("{issue}; using default tuning");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "waterline_y": 250.0, "rope": { "min_factor": 0.5 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.waterline_y, 250.0);
        assert_eq!(tuning.rope.min_factor, 0.5);
        assert_eq!(tuning.rope.base_points.len(), 7);
        assert_eq!(tuning.placement.retry_budget, 24);
        assert_eq!(tuning.entities.len(), 6);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(SceneIssue::InvalidTuning(_))
        ));
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning.waterline_y, 210.0);
    }

    #[test]
    fn test_default_rope_starts_at_anchor() {
        let rope = RopeTuning::default();
        assert_eq!(rope.base_points[0], Vec2::ZERO);
    }

    #[test]
    fn test_entity_catalog_roles() {
        let tuning = Tuning::default();
        let boats = tuning.entities.iter().filter(|e| e.role == Role::Boat).count();
        let swimmers = tuning
            .entities
            .iter()
            .filter(|e| e.role == Role::Swimmer)
            .count();
        assert_eq!(boats, 1);
        assert_eq!(swimmers, 2);
    }
}
