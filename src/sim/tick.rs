//! Per-frame scene update
//!
//! The host calls `tick` once per rendered frame with the clock delta. Resize,
//! hold input and boat moves land between ticks and take effect on the next
//! one.

use glam::Vec2;

use super::bob::water_surface_y;
use super::scatter::Band;
use super::state::{Motion, Role, SceneState};
use super::swim::SwimEvent;
use crate::consts::MAX_FRAME_MS;

/// Input state sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Reel hold state sampled this frame; `None` keeps the phase last set
    /// through `set_reel_held`
    pub reel_held: Option<bool>,
}

/// Advance the scene by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut SceneState, input: &TickInput, dt_ms: f32) {
    let dt = dt_ms.clamp(0.0, MAX_FRAME_MS);
    state.elapsed_ms += dt as f64;
    state.frame += 1;

    // Fishing line
    if let Some(held) = input.reel_held {
        set_reel_held(state, held);
    }
    if let Some(rope) = state.rope.as_mut() {
        rope.update(dt);
    }
    state.sync_hook();

    // Water surface
    state.water_y = water_surface_y(state.elapsed_ms, state.tuning.waterline_y, &state.tuning.water);

    // Entities: each motion record is only touched by its own animator
    let elapsed = state.elapsed_ms;
    let width = state.viewport.x;
    for entity in state.entities.iter_mut() {
        match &mut entity.motion {
            Motion::Bob(bobber) => {
                let sample = bobber.sample(elapsed, &state.tuning.water);
                entity.visual.pos.y = sample.y;
                if let Some(alpha) = sample.alpha {
                    entity.visual.alpha = alpha;
                }
            }
            Motion::Swim(swimmer) => {
                if swimmer.update(dt, width, &state.band, &mut state.rng) == SwimEvent::Wrapped {
                    log::trace!("{} wrapped to x={:.0}", entity.key, swimmer.pos.x);
                }
                entity.visual.pos = swimmer.pos;
                entity.visual.scale.x = swimmer.scale_x;
            }
            Motion::Still | Motion::FollowLine => {}
        }
    }

    // Clouds
    for cloud in state.clouds.iter_mut() {
        if cloud.drift(dt) {
            log::trace!("cloud wrapped");
        }
    }
}

/// Hold input changed; true when the reel phase flipped. Scenes without a
/// line ignore it.
pub fn set_reel_held(state: &mut SceneState, held: bool) -> bool {
    let changed = state.rope.as_mut().is_some_and(|rope| rope.set_held(held));
    if changed {
        log::info!("Reel {}", if held { "engaged" } else { "released" });
    }
    changed
}

/// Apply a new viewport size: re-derive the placement band, cloud wrap
/// boundaries and the line anchor
pub fn resize(state: &mut SceneState, viewport: Vec2) {
    if viewport == state.viewport {
        return;
    }
    log::info!("Viewport resized to {}x{}", viewport.x, viewport.y);
    state.viewport = viewport;

    let (band, issues) = Band::for_viewport(viewport, state.tuning.waterline_y, &state.tuning.placement);
    state.band = band;
    for issue in issues {
        state.record_issue(issue);
    }

    for cloud in state.clouds.iter_mut() {
        cloud.resize(viewport.x, &state.tuning.clouds);
    }
    state.reanchor_line();
}

/// Move the boat; the line and hook follow immediately
pub fn move_boat(state: &mut SceneState, pos: Vec2) -> bool {
    let Some(boat) = state.entities.iter_mut().find(|e| e.role == Role::Boat) else {
        return false;
    };
    boat.base_pos = pos;
    boat.visual.pos = pos;
    state.reanchor_line();
    true
}
