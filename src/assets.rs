//! Resource manifest and handle resolution
//!
//! Loading and decoding happen outside the scene. By the time a scene is built
//! the host has awaited its loads and exposes the outcome as a `ResourceSet`;
//! the scene only needs each resource's key and natural size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SceneIssue;

/// A loaded resource as seen by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceHandle {
    pub key: String,
    /// Natural (unscaled) size in pixels
    pub size: Vec2,
}

/// Anything that can resolve an asset key to a loaded handle
pub trait ResourceSet {
    fn resolve(&self, key: &str) -> Option<ResourceHandle>;
}

/// One manifest line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: String,
    pub url: String,
    pub width: f32,
    pub height: f32,
}

/// The set of resources a host has finished loading
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub entries: Vec<ManifestEntry>,
}

impl ResourceManifest {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in manifest for the bundled artwork
    pub fn bundled() -> Self {
        let mut manifest = Self::new();
        manifest.insert("boot", "assets/images/boot.png", 880.0, 900.0);
        manifest.insert("fish", "assets/images/fish.png", 1024.0, 640.0);
        manifest.insert("hook", "assets/images/hook.png", 320.0, 620.0);
        manifest.insert("manFishing", "assets/images/manfishing.png", 1200.0, 900.0);
        manifest.insert("seaweed", "assets/images/seaweed.png", 600.0, 1000.0);
        manifest.insert("tuna", "assets/images/tuna.png", 1200.0, 700.0);
        manifest
    }

    pub fn from_json(json: &str) -> Result<Self, SceneIssue> {
        serde_json::from_str(json).map_err(SceneIssue::InvalidManifest)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: &str, url: &str, width: f32, height: f32) {
        self.entries.retain(|e| e.key != key);
        self.entries.push(ManifestEntry {
            key: key.to_string(),
            url: url.to_string(),
            width,
            height,
        });
    }

    /// Drop an entry (a failed load)
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.url.as_str())
    }
}

impl ResourceSet for ResourceManifest {
    fn resolve(&self, key: &str) -> Option<ResourceHandle> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| ResourceHandle {
                key: e.key.clone(),
                size: Vec2::new(e.width, e.height),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bundled() {
        let manifest = ResourceManifest::bundled();
        let boat = manifest.resolve("manFishing").expect("bundled boat");
        assert_eq!(boat.size, Vec2::new(1200.0, 900.0));
        assert!(manifest.resolve("anchor").is_none());
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let mut manifest = ResourceManifest::new();
        manifest.insert("fish", "a.png", 10.0, 10.0);
        manifest.insert("fish", "b.png", 20.0, 10.0);
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.resolve("fish").map(|h| h.size.x), Some(20.0));
        assert!(manifest.remove("fish"));
        assert!(!manifest.remove("fish"));
        assert!(manifest.resolve("fish").is_none());
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest = ResourceManifest::from_json(
            r#"{ "entries": [ { "key": "hook", "url": "hook.png", "width": 32, "height": 64 } ] }"#,
        )
        .expect("valid manifest");
        assert_eq!(manifest.urls().collect::<Vec<_>>(), vec!["hook.png"]);
        assert!(matches!(
            ResourceManifest::from_json("42"),
            Err(SceneIssue::InvalidManifest(_))
        ));
    }
}
