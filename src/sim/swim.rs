//! Swimmers: horizontal traversal, vertical bob, edge wrap
//!
//! Artwork faces left by default, so a swimmer heading right carries the
//! negated base scale on X.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::scatter::Band;
use crate::random_between;
use crate::tuning::SwimTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swimmer {
    pub pos: Vec2,
    pub base_y: f32,
    /// -1.0 (left) or +1.0 (right)
    pub direction: f32,
    /// Units per ms
    pub speed: f32,
    pub amplitude: f32,
    /// Radians per ms
    pub angular_speed: f32,
    /// Phase accumulator in ms
    pub time_ms: f32,
    /// Unsigned horizontal scale of the artwork
    pub base_scale_x: f32,
    /// Current signed horizontal scale
    pub scale_x: f32,
    pub wrap_margin: f32,
}

/// What happened to a swimmer this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwimEvent {
    Swam,
    Wrapped,
}

impl Swimmer {
    /// Create a swimmer at a placed position with randomized motion
    pub fn spawn<R: Rng + ?Sized>(pos: Vec2, base_scale_x: f32, tuning: &SwimTuning, rng: &mut R) -> Self {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let angular_speed = random_between(rng, tuning.angular_speed_min, tuning.angular_speed_max);
        let mut swimmer = Self {
            pos,
            base_y: pos.y,
            direction,
            speed: random_between(rng, tuning.speed_min, tuning.speed_max),
            amplitude: random_between(rng, tuning.amplitude_min, tuning.amplitude_max),
            angular_speed,
            time_ms: 0.0,
            base_scale_x: base_scale_x.abs(),
            scale_x: base_scale_x.abs(),
            wrap_margin: tuning.wrap_margin,
        };
        swimmer.time_ms = swimmer.random_time(rng);
        swimmer.face();
        swimmer
    }

    /// Length of one vertical cycle in ms
    pub fn period_ms(&self) -> f32 {
        if self.angular_speed > 0.0 {
            TAU / self.angular_speed
        } else {
            0.0
        }
    }

    fn random_time<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        random_between(rng, 0.0, self.period_ms())
    }

    /// Scale sign that faces the direction of travel
    pub fn desired_scale_x(&self) -> f32 {
        if self.direction > 0.0 {
            -self.base_scale_x
        } else {
            self.base_scale_x
        }
    }

    /// Point the artwork along the direction of travel; true if it changed
    pub fn face(&mut self) -> bool {
        let desired = self.desired_scale_x();
        if self.scale_x != desired {
            self.scale_x = desired;
            return true;
        }
        false
    }

    /// Advance one frame. On wrapping, the swimmer re-enters from the opposite
    /// edge at a fresh depth with a fresh phase.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        viewport_width: f32,
        band: &Band,
        rng: &mut R,
    ) -> SwimEvent {
        self.pos.x += self.speed * self.direction * dt_ms;
        self.time_ms += dt_ms;
        let period = self.period_ms();
        if period > 0.0 {
            self.time_ms %= period;
        }

        let mut event = SwimEvent::Swam;
        if self.direction > 0.0 && self.pos.x > viewport_width + self.wrap_margin {
            self.pos.x = -self.wrap_margin;
            event = SwimEvent::Wrapped;
        } else if self.direction < 0.0 && self.pos.x < -self.wrap_margin {
            self.pos.x = viewport_width + self.wrap_margin;
            event = SwimEvent::Wrapped;
        }

        if event == SwimEvent::Wrapped {
            self.base_y = band.sample_y(rng);
            self.time_ms = self.random_time(rng);
        }

        self.pos.y = self.base_y + self.amplitude * (self.angular_speed * self.time_ms).sin();
        self.face();
        event
    }
}
