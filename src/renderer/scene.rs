//! Frame snapshot to vertex list
//!
//! Draw order: sky and sea, clouds, z-sorted sprites and line, water overlay.
//! Sprites are drawn as flat silhouettes sized from their resources.

use glam::Vec2;

use super::shapes::{catmull_rom, circle, ellipse, polyline, rect, tint, triangle};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::hex_to_rgba;
use crate::settings::QualityPreset;
use crate::sim::{CloudView, DrawItem, FrameSnapshot, Role, RopeView, SpriteView};

/// Rope thickness in scene units
const ROPE_WIDTH: f32 = 2.0;

/// Tessellate a whole frame
pub fn frame_vertices(snapshot: &FrameSnapshot, quality: QualityPreset) -> Vec<Vertex> {
    let segments = quality.circle_segments();
    let mut vertices = background(snapshot.viewport, snapshot.waterline_y);

    for cloud in &snapshot.clouds {
        vertices.extend(cloud_cluster(cloud, segments));
    }

    for item in &snapshot.items {
        match item {
            DrawItem::Sprite(sprite) => vertices.extend(sprite_silhouette(sprite, segments)),
            DrawItem::Rope(rope) => vertices.extend(rope_strip(rope, quality.rope_subdivisions())),
        }
    }

    vertices.extend(water_overlay(snapshot.viewport, snapshot.water_y));
    vertices
}

/// Sky above the waterline, sea below; empty regions are skipped
pub fn background(viewport: Vec2, waterline_y: f32) -> Vec<Vertex> {
    let sky_height = waterline_y.max(0.0);
    let sea_height = (viewport.y - waterline_y).max(0.0);
    let mut vertices = Vec::with_capacity(18);

    if sky_height > 0.0 {
        let size = Vec2::new(viewport.x, sky_height);
        vertices.extend(rect(Vec2::ZERO, size, hex_to_rgba(SKY_COLOR, 1.0)));
        vertices.extend(rect(
            Vec2::ZERO,
            size,
            hex_to_rgba(colors::SKY_WASH, colors::SKY_WASH_ALPHA),
        ));
    }
    if sea_height > 0.0 {
        vertices.extend(rect(
            Vec2::new(0.0, waterline_y),
            Vec2::new(viewport.x, sea_height),
            hex_to_rgba(SEA_COLOR, 1.0),
        ));
    }
    vertices
}

/// Translucent sea overlay from the bobbing surface down
pub fn water_overlay(viewport: Vec2, water_y: f32) -> Vec<Vertex> {
    rect(
        Vec2::new(0.0, water_y),
        Vec2::new(viewport.x, (viewport.y - water_y).max(0.0)),
        hex_to_rgba(WATER_OVERLAY_COLOR, WATER_OVERLAY_ALPHA),
    )
}

pub fn cloud_cluster(cloud: &CloudView, segments: u32) -> Vec<Vertex> {
    let color = hex_to_rgba(colors::CLOUD, CLOUD_FILL_ALPHA * cloud.alpha);
    CLOUD_PUFFS
        .iter()
        .flat_map(|&(x, y, r)| {
            let center = cloud.pos + Vec2::new(x, y) * cloud.scale;
            ellipse(center, Vec2::splat(r * cloud.scale), color, segments)
        })
        .collect()
}

pub fn rope_strip(rope: &RopeView, subdivisions: u32) -> Vec<Vertex> {
    let curve = catmull_rom(&rope.points, subdivisions);
    polyline(&curve, ROPE_WIDTH, hex_to_rgba(rope.tint, rope.alpha))
}

/// Stand-in shape for a sprite, honouring pivot, mirror, tint and alpha
pub fn sprite_silhouette(sprite: &SpriteView, segments: u32) -> Vec<Vertex> {
    let size = sprite.size.abs();
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let min = sprite.pos - sprite.pivot * size;
    let center = min + size * 0.5;
    let tint_rgba = hex_to_rgba(sprite.tint, sprite.alpha);

    match sprite.role {
        Role::Swimmer => {
            let color = tint(hex_to_rgba(colors::SWIMMER, 1.0), tint_rgba);
            // Artwork faces left: the tail trails on +x unless mirrored
            let tail_side = if sprite.size.x < 0.0 { -1.0 } else { 1.0 };
            let body = Vec2::new(size.x * 0.38, size.y * 0.32);
            let root = center + Vec2::new(tail_side * body.x * 0.8, 0.0);
            let fin = center + Vec2::new(tail_side * size.x * 0.5, 0.0);
            let mut v = ellipse(center, body, color, segments);
            v.extend(triangle(
                root,
                fin + Vec2::new(0.0, -size.y * 0.3),
                fin + Vec2::new(0.0, size.y * 0.3),
                color,
            ));
            v
        }
        Role::Boat => {
            let hull = tint(hex_to_rgba(colors::BOAT_HULL, 1.0), tint_rgba);
            let figure = tint(hex_to_rgba(colors::BOAT_FIGURE, 1.0), tint_rgba);
            let deck_y = min.y + size.y * 0.6;
            let mut v = rect(
                Vec2::new(min.x, deck_y),
                Vec2::new(size.x, size.y * 0.4),
                hull,
            );
            v.extend(circle(
                Vec2::new(center.x, min.y + size.y * 0.18),
                size.y * 0.12,
                figure,
                segments,
            ));
            v.extend(rect(
                Vec2::new(center.x - size.x * 0.05, min.y + size.y * 0.3),
                Vec2::new(size.x * 0.1, size.y * 0.3),
                figure,
            ));
            v
        }
        Role::LineFollower => {
            let color = tint(hex_to_rgba(colors::HOOK, 1.0), tint_rgba);
            let shank = size.x * 0.18;
            let mut v = rect(
                Vec2::new(center.x - shank * 0.5, min.y),
                Vec2::new(shank, size.y * 0.75),
                color,
            );
            v.extend(ellipse(
                Vec2::new(center.x, min.y + size.y * 0.8),
                Vec2::new(size.x * 0.4, size.y * 0.2),
                color,
                segments,
            ));
            v
        }
        Role::Ambient => {
            let color = tint(hex_to_rgba(colors::AMBIENT, 1.0), tint_rgba);
            ellipse(center, size * 0.5, color, segments)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::assets::ResourceManifest;
    use crate::sim::SceneState;

    fn sprite(role: Role, size: Vec2) -> SpriteView {
        SpriteView {
            id: 1,
            key: "fish".to_string(),
            role,
            pos: Vec2::new(100.0, 100.0),
            size,
            pivot: Vec2::splat(0.5),
            alpha: 0.5,
            tint: NO_TINT,
            z: 0,
        }
    }

    #[test]
    fn test_background_skips_empty_regions() {
        // Sky + wash + sea
        assert_eq!(background(Vec2::new(800.0, 600.0), 210.0).len(), 18);
        // Viewport shorter than the waterline: sky only
        assert_eq!(background(Vec2::new(800.0, 200.0), 210.0).len(), 12);
        // Waterline at the very top: sea only
        assert_eq!(background(Vec2::new(800.0, 600.0), 0.0).len(), 6);
    }

    #[test]
    fn test_water_overlay_follows_surface() {
        let v = water_overlay(Vec2::new(800.0, 600.0), 214.0);
        assert_eq!(v[0].position, [0.0, 214.0]);
        assert!(water_overlay(Vec2::new(800.0, 100.0), 214.0).is_empty());
    }

    #[test]
    fn test_swimmer_tail_follows_mirror() {
        let facing_left = sprite_silhouette(&sprite(Role::Swimmer, Vec2::new(80.0, 40.0)), 8);
        let facing_right = sprite_silhouette(&sprite(Role::Swimmer, Vec2::new(-80.0, 40.0)), 8);
        let tail_x = |v: &[Vertex]| v[v.len() - 2].position[0];
        assert!(tail_x(&facing_left) > 100.0);
        assert!(tail_x(&facing_right) < 100.0);
    }

    #[test]
    fn test_sprite_alpha_carried() {
        let v = sprite_silhouette(&sprite(Role::Ambient, Vec2::new(40.0, 40.0)), 8);
        assert!(v.iter().all(|vx| vx.color[3] == 0.5));
        assert!(sprite_silhouette(&sprite(Role::Ambient, Vec2::ZERO), 8).is_empty());
    }

    #[test]
    fn test_full_frame_tessellates() {
        let state = SceneState::new(
            1,
            Vec2::new(1000.0, 800.0),
            Tuning::default(),
            &ResourceManifest::bundled(),
        );
        let vertices = frame_vertices(&state.snapshot(), QualityPreset::Low);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
        // Overlay is last
        let last = vertices.last().expect("vertex");
        assert_eq!(last.color[3], WATER_OVERLAY_ALPHA);
    }
}
