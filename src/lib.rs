//! Fishing Scene - an animated sky-and-sea scene
//!
//! Core modules:
//! - `sim`: Scene animation (scatter placement, bob, drift, swim, rope reel)
//! - `renderer`: WebGPU rendering pipeline
//! - `assets`: Resource manifest and handle resolution
//! - `tuning`: Data-driven scene constants
//! - `settings`: User preferences

pub mod assets;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{ResourceHandle, ResourceManifest, ResourceSet};
pub use error::SceneIssue;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Scene configuration constants
pub mod consts {
    /// Nominal frame duration the reel speeds are tuned against (60 fps)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta accepted from the clock (tab switches, stalls)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Draw order layers
    pub const Z_BACKGROUND: i32 = -10;
    pub const Z_CLOUDS: i32 = -5;
    pub const Z_SPRITES: i32 = 0;
    pub const Z_BOAT: i32 = 40;
    pub const Z_WATER_OVERLAY: i32 = 50;

    /// Palette (0xRRGGBB)
    pub const SKY_COLOR: u32 = 0x86c5ff;
    pub const SEA_COLOR: u32 = 0x022b51;
    pub const WATER_OVERLAY_COLOR: u32 = 0x0a4f94;
    pub const WATER_OVERLAY_ALPHA: f32 = 0.25;
    pub const UNDERWATER_TINT: u32 = 0x6fb8ff;
    pub const NO_TINT: u32 = 0xffffff;
    pub const ROPE_TINT: u32 = 0xf7f7f7;
    pub const ROPE_ALPHA: f32 = 0.8;
    pub const CLOUD_ALPHA: f32 = 0.92;
    pub const CLOUD_FILL_ALPHA: f32 = 0.9;

    /// Cloud cluster puffs: (x, y, radius) in unscaled cloud space
    pub const CLOUD_PUFFS: [(f32, f32, f32); 4] = [
        (-40.0, -6.0, 28.0),
        (-12.0, -20.0, 34.0),
        (26.0, -8.0, 26.0),
        (0.0, 12.0, 24.0),
    ];
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Convert a 0xRRGGBB colour plus alpha to linear-ish RGBA floats
#[inline]
pub fn hex_to_rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, alpha.clamp(0.0, 1.0)]
}
