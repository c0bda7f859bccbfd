//! Read-only view of a frame for the renderer

use glam::Vec2;

use super::state::{Role, SceneState};
use crate::consts::{CLOUD_ALPHA, NO_TINT, ROPE_ALPHA, ROPE_TINT};

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    pub id: u32,
    pub key: String,
    pub role: Role,
    pub pos: Vec2,
    /// On-screen size; negative X means mirrored
    pub size: Vec2,
    pub pivot: Vec2,
    pub alpha: f32,
    pub tint: u32,
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudView {
    pub pos: Vec2,
    pub scale: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RopeView {
    /// Control points in scene coordinates
    pub points: Vec<Vec2>,
    pub tint: u32,
    pub alpha: f32,
    pub z: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Sprite(SpriteView),
    Rope(RopeView),
}

impl DrawItem {
    pub fn z(&self) -> i32 {
        match self {
            DrawItem::Sprite(s) => s.z,
            DrawItem::Rope(r) => r.z,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub viewport: Vec2,
    pub waterline_y: f32,
    /// Top edge of the water overlay this frame
    pub water_y: f32,
    pub clouds: Vec<CloudView>,
    /// Sprites and the line, sorted by z (stable within a layer)
    pub items: Vec<DrawItem>,
    pub reel_factor: Option<f32>,
}

impl SceneState {
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut items: Vec<DrawItem> = self
            .entities
            .iter()
            .map(|e| {
                DrawItem::Sprite(SpriteView {
                    id: e.id,
                    key: e.key.clone(),
                    role: e.role,
                    pos: e.visual.pos,
                    size: e.natural_size * e.visual.scale,
                    pivot: e.pivot,
                    alpha: e.visual.alpha,
                    tint: e.visual.tint.unwrap_or(NO_TINT),
                    z: e.z,
                })
            })
            .collect();

        if let Some(rope) = &self.rope {
            items.push(DrawItem::Rope(RopeView {
                points: rope.world_points().collect(),
                tint: ROPE_TINT,
                alpha: ROPE_ALPHA,
                z: self.rope_z(),
            }));
        }
        items.sort_by_key(DrawItem::z);

        FrameSnapshot {
            frame: self.frame,
            viewport: self.viewport,
            waterline_y: self.tuning.waterline_y,
            water_y: self.water_y,
            clouds: self
                .clouds
                .iter()
                .map(|c| CloudView {
                    pos: c.pos,
                    scale: c.scale,
                    alpha: CLOUD_ALPHA,
                })
                .collect(),
            items,
            reel_factor: self.rope.as_ref().map(|r| r.factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::assets::ResourceManifest;
    use crate::consts::{Z_BACKGROUND, Z_BOAT, Z_CLOUDS, Z_WATER_OVERLAY};

    #[test]
    fn test_snapshot_order() {
        let state = SceneState::new(
            1,
            Vec2::new(1000.0, 800.0),
            Tuning::default(),
            &ResourceManifest::bundled(),
        );
        let snapshot = state.snapshot();
        assert_eq!(snapshot.items.len(), 7);
        assert!(snapshot.items.windows(2).all(|w| w[0].z() <= w[1].z()));
        // Everything sorted sits between the cloud layer and the water overlay
        assert!(Z_BACKGROUND < Z_CLOUDS);
        assert!(snapshot
            .items
            .iter()
            .all(|item| item.z() > Z_CLOUDS && item.z() < Z_WATER_OVERLAY));

        // Line under the hook, hook under the boat
        let tail: Vec<_> = snapshot.items[4..]
            .iter()
            .map(|item| match item {
                DrawItem::Rope(_) => "rope",
                DrawItem::Sprite(s) => s.key.as_str(),
            })
            .collect();
        assert_eq!(tail, ["rope", "hook", "manFishing"]);
        assert_eq!(snapshot.items[4].z(), Z_BOAT - 1);
        assert_eq!(snapshot.reel_factor, Some(1.0));
        assert_eq!(snapshot.clouds.len(), 3);
    }

    #[test]
    fn test_swimmer_size_carries_mirror() {
        let state = SceneState::new(
            2,
            Vec2::new(1000.0, 800.0),
            Tuning::default(),
            &ResourceManifest::bundled(),
        );
        let snapshot = state.snapshot();
        for item in &snapshot.items {
            if let DrawItem::Sprite(s) = item {
                let entity = state.entities.iter().find(|e| e.id == s.id).expect("entity");
                assert_eq!(s.size.x.is_sign_negative(), entity.visual.scale.x < 0.0);
            }
        }
    }
}
