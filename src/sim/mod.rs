//! Scene animation module
//!
//! Placement and every per-frame animator live here. This module stays free of
//! rendering and platform code:
//! - Seeded RNG only, injected into placement and swim respawn
//! - Variable timestep in milliseconds, clamped per frame
//! - Each entity's motion record is owned by exactly one animator

pub mod bob;
pub mod cloud;
pub mod rope;
pub mod scatter;
pub mod snapshot;
pub mod state;
pub mod swim;
pub mod tick;

pub use bob::{Bobber, bob_offset, shimmer_alpha, water_surface_y};
pub use cloud::Cloud;
pub use rope::{HookStyle, ReelPhase, Rope, anchor_for_boat, hook_style};
pub use scatter::{Band, Placement, PlacementOutcome, PlacementRequest, scatter};
pub use snapshot::{CloudView, DrawItem, FrameSnapshot, RopeView, SpriteView};
pub use state::{Entity, EntityDef, Motion, Role, SceneState, Visual};
pub use swim::{SwimEvent, Swimmer};
pub use tick::{TickInput, move_boat, resize, set_reel_held, tick};
