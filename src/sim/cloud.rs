//! Linear cloud drift with horizontal wrap

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{CloudDef, CloudTuning};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub scale: f32,
    /// Units per ms
    pub speed: f32,
    /// Recomputed on resize only
    pub wrap_x: f32,
    /// Off-screen margin on both sides
    pub overhang: f32,
}

impl Cloud {
    pub fn new(def: &CloudDef, viewport_width: f32, tuning: &CloudTuning) -> Self {
        Self {
            pos: def.pos,
            scale: def.scale,
            speed: def.speed,
            wrap_x: wrap_boundary(viewport_width, tuning),
            overhang: tuning.overhang,
        }
    }

    /// Advance by `dt_ms`; returns true when the cloud wrapped this tick
    pub fn drift(&mut self, dt_ms: f32) -> bool {
        self.pos.x += self.speed * dt_ms;
        if self.pos.x - self.overhang > self.wrap_x {
            self.pos.x = -self.overhang;
            return true;
        }
        false
    }

    pub fn resize(&mut self, viewport_width: f32, tuning: &CloudTuning) {
        self.wrap_x = wrap_boundary(viewport_width, tuning);
    }
}

#[inline]
pub fn wrap_boundary(viewport_width: f32, tuning: &CloudTuning) -> f32 {
    viewport_width + tuning.wrap_margin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_at(x: f32, speed: f32) -> Cloud {
        let tuning = CloudTuning::default();
        let def = CloudDef {
            pos: Vec2::new(x, 80.0),
            scale: 1.0,
            speed,
        };
        Cloud::new(&def, 1000.0, &tuning)
    }

    #[test]
    fn test_drift_is_linear() {
        let mut cloud = cloud_at(100.0, 0.02);
        assert!(!cloud.drift(16.0));
        assert!(!cloud.drift(16.0));
        assert!((cloud.pos.x - 100.64).abs() < 1e-4);
        assert_eq!(cloud.pos.y, 80.0);
    }

    #[test]
    fn test_wrap_exactly_past_boundary() {
        // wrap_x = 1200, overhang = 150: wraps once x - 150 > 1200
        let mut cloud = cloud_at(1350.0, 0.0);
        assert!(!cloud.drift(16.0));
        assert_eq!(cloud.pos.x, 1350.0);

        let mut cloud = cloud_at(1349.0, 0.1);
        assert!(cloud.drift(16.0));
        assert_eq!(cloud.pos.x, -150.0);
    }

    #[test]
    fn test_resize_moves_boundary() {
        let mut cloud = cloud_at(0.0, 0.02);
        assert_eq!(cloud.wrap_x, 1200.0);
        cloud.resize(400.0, &CloudTuning::default());
        assert_eq!(cloud.wrap_x, 600.0);
        cloud.pos.x = 751.0;
        assert!(cloud.drift(0.0));
        assert_eq!(cloud.pos.x, -150.0);
    }
}
