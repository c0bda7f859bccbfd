//! Fishing line reel
//!
//! The line is a polyline of control points hanging from an anchor on the
//! boat. Holding the reel input pulls the reel factor down toward
//! `min_factor`; releasing lets it relax back to 1.0. Vertical offsets scale
//! with the factor, horizontal offsets never do.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{NO_TINT, NOMINAL_FRAME_MS, UNDERWATER_TINT};
use crate::tuning::RopeTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelPhase {
    /// Relaxing toward full length
    Idle,
    /// Hold input active, shortening toward `min_factor`
    Reeling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rope {
    /// Anchor in scene coordinates
    pub anchor: Vec2,
    /// Unscaled offsets; the first is always the anchor itself
    base_points: Vec<Vec2>,
    /// Current offsets after applying `factor`
    points: Vec<Vec2>,
    pub factor: f32,
    pub phase: ReelPhase,
    pub min_factor: f32,
    pub reel_speed: f32,
    pub release_speed: f32,
}

impl Rope {
    pub fn new(tuning: &RopeTuning, anchor: Vec2) -> Self {
        let mut base_points = tuning.base_points.clone();
        match base_points.first_mut() {
            Some(first) if *first != Vec2::ZERO => {
                log::warn!("rope base starts at {first}, pinning it to the anchor");
                *first = Vec2::ZERO;
            }
            Some(_) => {}
            None => base_points.push(Vec2::ZERO),
        }
        let min_factor = tuning.min_factor.clamp(0.0, 1.0);

        Self {
            anchor,
            points: base_points.clone(),
            base_points,
            factor: 1.0,
            phase: ReelPhase::Idle,
            min_factor,
            // Negative speeds would push the factor away from its target
            reel_speed: tuning.reel_speed.max(0.0),
            release_speed: tuning.release_speed.max(0.0),
        }
    }

    /// Apply the hold input; true when the phase changed
    pub fn set_held(&mut self, held: bool) -> bool {
        let next = if held {
            ReelPhase::Reeling
        } else {
            ReelPhase::Idle
        };
        if next == self.phase {
            return false;
        }
        log::debug!("reel {:?} -> {:?} at factor {:.3}", self.phase, next, self.factor);
        self.phase = next;
        true
    }

    pub fn target(&self) -> f32 {
        match self.phase {
            ReelPhase::Idle => 1.0,
            ReelPhase::Reeling => self.min_factor,
        }
    }

    fn speed(&self) -> f32 {
        match self.phase {
            ReelPhase::Idle => self.release_speed,
            ReelPhase::Reeling => self.reel_speed,
        }
    }

    /// Relax the factor toward the phase target, frame-rate independent
    pub fn update(&mut self, dt_ms: f32) {
        let delta_ratio = dt_ms.max(0.0) / NOMINAL_FRAME_MS;
        let step = self.speed() * delta_ratio;
        if step >= 1.0 {
            // A full step lands on the target; the lerp would round past it
            self.factor = self.target();
        } else {
            self.factor += (self.target() - self.factor) * step;
        }
        self.factor = self.factor.clamp(self.min_factor, 1.0);
        self.apply_factor();
    }

    fn apply_factor(&mut self) {
        let factor = self.factor;
        for (point, base) in self.points.iter_mut().zip(&self.base_points) {
            point.x = base.x;
            point.y = base.y * factor;
        }
    }

    /// Offsets relative to the anchor
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Control points in scene coordinates
    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| self.anchor + *p)
    }

    /// Terminal control point in scene coordinates
    pub fn tip(&self) -> Vec2 {
        self.anchor + self.points.last().copied().unwrap_or(Vec2::ZERO)
    }
}

/// Rope anchor for a boat of the given on-screen size
pub fn anchor_for_boat(boat_pos: Vec2, boat_size: Vec2, attach_ratio: Vec2) -> Vec2 {
    Vec2::new(
        boat_pos.x - boat_size.x * attach_ratio.x,
        boat_pos.y + boat_size.y * attach_ratio.y,
    )
}

/// Tint and alpha for the hook marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookStyle {
    pub tint: u32,
    pub alpha: f32,
}

/// Underwater styling applies at or below the waterline
pub fn hook_style(hook_y: f32, waterline_y: f32, underwater_alpha: f32) -> HookStyle {
    if hook_y >= waterline_y {
        HookStyle {
            tint: UNDERWATER_TINT,
            alpha: underwater_alpha,
        }
    } else {
        HookStyle {
            tint: NO_TINT,
            alpha: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rope() -> Rope {
        Rope::new(&RopeTuning::default(), Vec2::new(100.0, 50.0))
    }

    #[test]
    fn test_starts_full_length() {
        let rope = rope();
        assert_eq!(rope.factor, 1.0);
        assert_eq!(rope.phase, ReelPhase::Idle);
        assert_eq!(rope.tip(), Vec2::new(100.0, 386.0));
    }

    #[test]
    fn test_reel_scales_vertical_only() {
        let mut rope = rope();
        rope.set_held(true);
        for _ in 0..600 {
            rope.update(NOMINAL_FRAME_MS);
        }
        assert!((rope.factor - 0.35).abs() < 1e-3);
        let base = RopeTuning::default().base_points;
        for (p, b) in rope.points().iter().zip(&base) {
            assert_eq!(p.x, b.x);
            assert!((p.y - b.y * rope.factor).abs() < 1e-4);
        }
        assert_eq!(rope.points()[0], Vec2::ZERO);
    }

    #[test]
    fn test_release_relaxes_back() {
        let mut rope = rope();
        rope.set_held(true);
        for _ in 0..60 {
            rope.update(NOMINAL_FRAME_MS);
        }
        let reeled = rope.factor;
        assert!(rope.set_held(false));
        rope.update(NOMINAL_FRAME_MS);
        assert!(rope.factor > reeled);
    }

    #[test]
    fn test_frame_rate_independent_step() {
        // One 60 fps tick moves by speed * (target - factor)
        let mut rope = rope();
        rope.set_held(true);
        rope.update(NOMINAL_FRAME_MS);
        let expected = 1.0 + (0.35 - 1.0) * 0.12;
        assert!((rope.factor - expected).abs() < 1e-5);
    }

    #[test]
    fn test_huge_delta_does_not_overshoot() {
        let mut rope = rope();
        rope.set_held(true);
        rope.update(10_000.0);
        assert_eq!(rope.factor, 0.35);
    }

    #[test]
    fn test_negative_speeds_are_clamped() {
        let tuning = RopeTuning {
            reel_speed: -0.5,
            release_speed: -0.5,
            ..RopeTuning::default()
        };
        let mut rope = Rope::new(&tuning, Vec2::ZERO);
        assert_eq!(rope.reel_speed, 0.0);
        assert_eq!(rope.release_speed, 0.0);

        rope.set_held(true);
        rope.update(NOMINAL_FRAME_MS);
        assert_eq!(rope.factor, 1.0);

        rope.factor = 0.5;
        rope.set_held(false);
        rope.update(NOMINAL_FRAME_MS);
        assert_eq!(rope.factor, 0.5);
    }

    #[test]
    fn test_set_held_reports_transitions() {
        let mut rope = rope();
        assert!(!rope.set_held(false));
        assert!(rope.set_held(true));
        assert!(!rope.set_held(true));
    }

    #[test]
    fn test_base_is_pinned_to_anchor() {
        let mut tuning = RopeTuning::default();
        tuning.base_points[0] = Vec2::new(5.0, 5.0);
        let rope = Rope::new(&tuning, Vec2::ZERO);
        assert_eq!(rope.points()[0], Vec2::ZERO);

        tuning.base_points.clear();
        let rope = Rope::new(&tuning, Vec2::new(3.0, 4.0));
        assert_eq!(rope.tip(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_anchor_for_boat() {
        let anchor = anchor_for_boat(Vec2::new(660.0, 150.0), Vec2::new(336.0, 252.0), Vec2::new(0.305, 0.02));
        assert!((anchor.x - (660.0 - 102.48)).abs() < 1e-3);
        assert!((anchor.y - 155.04).abs() < 1e-3);
    }

    #[test]
    fn test_hook_style_at_waterline() {
        assert_eq!(hook_style(210.0, 210.0, 0.9).tint, UNDERWATER_TINT);
        assert_eq!(hook_style(209.9, 210.0, 0.9), HookStyle { tint: NO_TINT, alpha: 1.0 });
    }

    proptest! {
        #[test]
        fn prop_factor_monotonic_and_bounded(
            held_ticks in proptest::collection::vec((any::<bool>(), 0.0f32..200.0), 1..200)
        ) {
            let mut rope = rope();
            for (held, dt) in held_ticks {
                rope.set_held(held);
                let before = rope.factor;
                rope.update(dt);
                prop_assert!(rope.factor >= rope.min_factor && rope.factor <= 1.0);
                if held {
                    prop_assert!(rope.factor <= before);
                } else {
                    prop_assert!(rope.factor >= before);
                }
            }
        }
    }
}
