//! Vertical bob and alpha shimmer
//!
//! Pure functions of accumulated scene time. The water overlay uses phase 0 at
//! full amplitude; submerged entities use their own phase and a reduced share
//! of the amplitude.

use serde::{Deserialize, Serialize};

use crate::tuning::WaterTuning;

/// `sin(elapsed * speed + phase) * amplitude`
#[inline]
pub fn bob_offset(elapsed_ms: f64, phase: f32, speed: f32, amplitude: f32) -> f32 {
    ((elapsed_ms * speed as f64 + phase as f64).sin() as f32) * amplitude
}

/// `clamp(base + sin(angle) * variance, 0, 1)`
#[inline]
pub fn shimmer_alpha(base_alpha: f32, angle: f32, variance: f32) -> f32 {
    (base_alpha + angle.sin() * variance).clamp(0.0, 1.0)
}

/// Top edge of the water overlay at a point in time
pub fn water_surface_y(elapsed_ms: f64, waterline_y: f32, water: &WaterTuning) -> f32 {
    waterline_y + bob_offset(elapsed_ms, 0.0, water.bob_speed, water.bob_amplitude)
}

/// Per-entity bob record, captured at placement time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bobber {
    pub base_y: f32,
    pub phase: f32,
    /// Only entities that recorded a base alpha shimmer
    pub base_alpha: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobSample {
    pub y: f32,
    pub alpha: Option<f32>,
}

impl Bobber {
    pub fn sample(&self, elapsed_ms: f64, water: &WaterTuning) -> BobSample {
        let angle = (self.phase as f64 + elapsed_ms * water.bob_speed as f64) as f32;
        let amplitude = water.bob_amplitude * water.underwater_amplitude_factor;
        BobSample {
            y: self.base_y + angle.sin() * amplitude,
            alpha: self
                .base_alpha
                .map(|base| shimmer_alpha(base, angle, water.alpha_variance)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_bob_zero_at_origin() {
        assert_eq!(bob_offset(0.0, 0.0, 0.002, 8.0), 0.0);
        assert_eq!(water_surface_y(0.0, 210.0, &WaterTuning::default()), 210.0);
    }

    #[test]
    fn test_bob_peak() {
        let water = WaterTuning::default();
        let quarter = FRAC_PI_2 / water.bob_speed as f64;
        let y = water_surface_y(quarter, 210.0, &water);
        assert!((y - 218.0).abs() < 1e-3);
    }

    #[test]
    fn test_bobber_uses_reduced_amplitude() {
        let water = WaterTuning::default();
        let bobber = Bobber {
            base_y: 300.0,
            phase: std::f32::consts::FRAC_PI_2,
            base_alpha: Some(0.88),
        };
        let sample = bobber.sample(0.0, &water);
        assert!((sample.y - (300.0 + 8.0 * 0.35)).abs() < 1e-4);
        assert!((sample.alpha.expect("alpha") - 0.94).abs() < 1e-4);
    }

    #[test]
    fn test_bobber_without_base_alpha() {
        let bobber = Bobber {
            base_y: 0.0,
            phase: 0.0,
            base_alpha: None,
        };
        assert_eq!(bobber.sample(1234.0, &WaterTuning::default()).alpha, None);
    }

    #[test]
    fn test_shimmer_clamped() {
        assert_eq!(shimmer_alpha(0.99, std::f32::consts::FRAC_PI_2, 0.06), 1.0);
        assert_eq!(shimmer_alpha(0.01, -std::f32::consts::FRAC_PI_2, 0.06), 0.0);
    }

    proptest! {
        #[test]
        fn prop_bob_within_amplitude(
            elapsed in 0.0f64..1.0e7,
            phase in -10.0f32..10.0,
            amplitude in 0.0f32..50.0,
        ) {
            let offset = bob_offset(elapsed, phase, 0.002, amplitude);
            prop_assert!(offset.abs() <= amplitude + 1e-4);
        }
    }
}
