//! Scene state and entity records
//!
//! The scene owns every per-entity record outright. Animators mutate them once
//! per frame; the renderer only ever sees a `FrameSnapshot`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bob::Bobber;
use super::cloud::Cloud;
use super::rope::{Rope, anchor_for_boat, hook_style};
use super::scatter::{Band, PlacementRequest, scatter};
use super::swim::Swimmer;
use crate::assets::ResourceSet;
use crate::consts::*;
use crate::error::SceneIssue;
use crate::tuning::Tuning;

/// Most recent issues kept on the scene
pub const MAX_ISSUES: usize = 32;

/// What an entity is for, which decides how it is placed and animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Scattered below the waterline, bobs in place
    Ambient,
    /// Fixed above the waterline; carries the fishing line
    Boat,
    /// Hangs from the end of the fishing line
    LineFollower,
    /// Scattered below the waterline, swims and wraps
    Swimmer,
}

impl Role {
    /// Roles that go through scatter placement
    pub fn is_scattered(self) -> bool {
        matches!(self, Role::Ambient | Role::Swimmer)
    }
}

/// Catalog entry describing one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub key: String,
    pub role: Role,
    #[serde(default)]
    pub scale: Option<f32>,
    /// Fixed position (boat)
    #[serde(default)]
    pub anchor: Option<Vec2>,
}

impl EntityDef {
    pub fn new(key: &str, role: Role) -> Self {
        Self {
            key: key.to_string(),
            role,
            scale: None,
            anchor: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Render-facing visual fields of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub pos: Vec2,
    /// Signed scale; negative X mirrors the artwork
    pub scale: Vec2,
    pub alpha: f32,
    pub tint: Option<u32>,
}

/// Per-entity animation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Motion {
    Still,
    Bob(Bobber),
    Swim(Swimmer),
    /// Positioned from the rope tip every frame
    FollowLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub key: String,
    pub role: Role,
    /// Position in the catalog; drives the bob phase
    pub catalog_index: usize,
    /// Natural resource size in pixels
    pub natural_size: Vec2,
    /// Placement result before any animation
    pub base_pos: Vec2,
    pub base_alpha: Option<f32>,
    /// Normalized pivot (0.5, 0.5 = centre)
    pub pivot: Vec2,
    pub z: i32,
    pub visual: Visual,
    pub motion: Motion,
}

impl Entity {
    /// On-screen size (unsigned)
    pub fn size(&self) -> Vec2 {
        self.natural_size * self.visual.scale.abs()
    }
}

/// Complete scene state
#[derive(Debug)]
pub struct SceneState {
    /// Seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Viewport size in scene units
    pub viewport: Vec2,
    /// Sub-waterline placement band for the current viewport
    pub band: Band,
    /// Accumulated clock time
    pub elapsed_ms: f64,
    pub frame: u64,
    /// Current top edge of the water overlay
    pub water_y: f32,
    /// Entities in catalog order
    pub entities: Vec<Entity>,
    pub clouds: Vec<Cloud>,
    /// Present only when the boat resolved
    pub rope: Option<Rope>,
    /// Recent absorbed issues, oldest first
    pub issues: Vec<SceneIssue>,
    next_id: u32,
}

impl SceneState {
    /// Build a scene: resolve resources, scatter the sub-surface entities,
    /// hang the fishing line off the boat
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning, resources: &dyn ResourceSet) -> Self {
        let (band, band_issues) = Band::for_viewport(viewport, tuning.waterline_y, &tuning.placement);
        let clouds = tuning
            .clouds
            .definitions
            .iter()
            .map(|def| Cloud::new(def, viewport.x, &tuning.clouds))
            .collect();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            water_y: tuning.waterline_y,
            tuning,
            viewport,
            band,
            elapsed_ms: 0.0,
            frame: 0,
            entities: Vec::new(),
            clouds,
            rope: None,
            issues: Vec::new(),
            next_id: 1,
        };
        for issue in band_issues {
            state.record_issue(issue);
        }

        state.spawn_entities(resources);
        state.attach_line();

        log::info!(
            "Scene built: seed {}, {} entities, {} clouds, line {}",
            seed,
            state.entities.len(),
            state.clouds.len(),
            if state.rope.is_some() { "attached" } else { "absent" }
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Keep an absorbed issue for the host and log it
    pub fn record_issue(&mut self, issue: SceneIssue) {
        log::warn!("{issue}");
        if self.issues.len() == MAX_ISSUES {
            self.issues.remove(0);
        }
        self.issues.push(issue);
    }

    fn spawn_entities(&mut self, resources: &dyn ResourceSet) {
        let defs = self.tuning.entities.clone();

        let mut resolved = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            match resources.resolve(&def.key) {
                Some(handle) => resolved.push((index, def, handle)),
                None => self.record_issue(SceneIssue::MissingResource {
                    key: def.key.clone(),
                }),
            }
        }

        let scattered = resolved.iter().filter(|(_, def, _)| def.role.is_scattered()).count();
        let request = PlacementRequest::new(scattered, self.band, &self.tuning.placement);
        let mut placements = scatter(&request, &mut self.rng).into_iter();

        for (index, def, handle) in resolved {
            let scale = def.scale.unwrap_or(self.tuning.default_scale);
            let id = self.next_entity_id();
            let mut entity = Entity {
                id,
                key: def.key.clone(),
                role: def.role,
                catalog_index: index,
                natural_size: handle.size,
                base_pos: Vec2::ZERO,
                base_alpha: None,
                pivot: Vec2::splat(0.5),
                z: Z_SPRITES,
                visual: Visual {
                    pos: Vec2::ZERO,
                    scale: Vec2::splat(scale),
                    alpha: 1.0,
                    tint: None,
                },
                motion: Motion::Still,
            };

            match def.role {
                Role::Boat => {
                    entity.base_pos = def.anchor.unwrap_or_else(|| {
                        Vec2::new(self.viewport.x * 0.66, self.tuning.waterline_y * 0.7)
                    });
                    entity.z = Z_BOAT;
                }
                Role::LineFollower => {
                    entity.pivot = Vec2::new(0.5, 0.0);
                    entity.motion = Motion::FollowLine;
                }
                Role::Ambient | Role::Swimmer => {
                    let Some(placement) = placements.next() else {
                        continue;
                    };
                    if placement.is_fallback() {
                        self.record_issue(SceneIssue::PlacementExhausted {
                            index,
                            attempts: self.tuning.placement.retry_budget.max(1),
                        });
                    }
                    entity.base_pos = placement.pos;
                    log::debug!("placed {} at {} ({:?})", def.key, placement.pos, placement.outcome);
                    self.style_submerged(&mut entity);

                    if def.role == Role::Swimmer {
                        let swimmer = Swimmer::spawn(placement.pos, scale, &self.tuning.swim, &mut self.rng);
                        entity.visual.scale.x = swimmer.scale_x;
                        entity.motion = Motion::Swim(swimmer);
                    }
                }
            }

            entity.visual.pos = entity.base_pos;
            self.entities.push(entity);
        }
    }

    /// Tint, alpha and bob phase for entities placed at or below the waterline
    fn style_submerged(&self, entity: &mut Entity) {
        if entity.base_pos.y < self.tuning.waterline_y {
            return;
        }
        let water = &self.tuning.water;
        entity.visual.tint = Some(UNDERWATER_TINT);
        entity.visual.alpha = water.underwater_alpha;
        entity.base_alpha = Some(water.underwater_alpha);
        entity.motion = Motion::Bob(Bobber {
            base_y: entity.base_pos.y,
            phase: entity.catalog_index as f32 * water.phase_offset,
            base_alpha: entity.base_alpha,
        });
    }

    fn attach_line(&mut self) {
        let Some(boat) = self.boat() else {
            // Without a boat there is nothing to hang the hook from
            let before = self.entities.len();
            self.entities.retain(|e| e.role != Role::LineFollower);
            if self.entities.len() != before {
                log::debug!("no boat, hook marker dropped");
            }
            return;
        };
        let anchor = anchor_for_boat(boat.base_pos, boat.size(), self.tuning.rope.attach_ratio);
        let boat_z = boat.z;
        self.rope = Some(Rope::new(&self.tuning.rope, anchor));
        for entity in self.entities.iter_mut().filter(|e| e.role == Role::LineFollower) {
            entity.z = boat_z;
        }
        self.sync_hook();
    }

    pub fn boat(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.role == Role::Boat)
    }

    /// Draw layer of the fishing line, just under the boat
    pub fn rope_z(&self) -> i32 {
        self.boat().map(|b| b.z).unwrap_or(Z_BOAT) - 1
    }

    /// Re-derive the rope anchor from the boat (resize or boat move)
    pub fn reanchor_line(&mut self) {
        let anchor = self
            .boat()
            .map(|b| anchor_for_boat(b.visual.pos, b.size(), self.tuning.rope.attach_ratio));
        if let (Some(rope), Some(anchor)) = (self.rope.as_mut(), anchor) {
            rope.anchor = anchor;
        }
        self.sync_hook();
    }

    /// Put hook markers on the rope tip and restyle them against the waterline
    pub fn sync_hook(&mut self) {
        let Some(tip) = self.rope.as_ref().map(Rope::tip) else {
            return;
        };
        let style = hook_style(tip.y, self.tuning.waterline_y, self.tuning.rope.hook_underwater_alpha);
        for entity in self.entities.iter_mut().filter(|e| e.role == Role::LineFollower) {
            entity.visual.pos = tip;
            entity.visual.tint = Some(style.tint);
            entity.visual.alpha = style.alpha;
        }
    }

    pub fn hook(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.role == Role::LineFollower)
    }
}
