//! Scene settings and preferences
//!
//! Persisted in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, WaterTuning};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Triangle fan segments per circle (clouds, silhouettes)
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }

    /// Subdivisions per rope span
    pub fn rope_subdivisions(&self) -> u32 {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 4,
            QualityPreset::High => 8,
        }
    }
}

/// Scene settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tessellation quality
    pub quality: QualityPreset,

    // === Motion ===
    /// Water surface and submerged bob
    pub water_bob: bool,
    /// Alpha shimmer on submerged entities
    pub shimmer: bool,
    /// Reduced motion (no bob, no shimmer)
    pub reduced_motion: bool,

    // === Input ===
    /// Keys (`KeyboardEvent.key`) that reel the line while held
    pub reel_keys: Vec<String>,

    // === HUD ===
    /// Log FPS once a second
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            water_bob: true,
            shimmer: true,
            reduced_motion: false,
            reel_keys: vec![" ".to_string(), "r".to_string()],
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective water bob (respects reduced_motion)
    pub fn effective_water_bob(&self) -> bool {
        self.water_bob && !self.reduced_motion
    }

    /// Effective shimmer (respects reduced_motion)
    pub fn effective_shimmer(&self) -> bool {
        self.shimmer && !self.reduced_motion
    }

    /// Whether a key reels the line
    pub fn is_reel_key(&self, key: &str) -> bool {
        self.reel_keys
            .iter()
            .any(|k| k == key || (k.len() == 1 && k.eq_ignore_ascii_case(key)))
    }

    /// Fold motion preferences into the scene tuning
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.water = self.motion_water(&tuning.water);
    }

    /// Water tuning for these preferences, derived from an unmodified base.
    /// Toggling a preference back on restores the base values.
    pub fn motion_water(&self, base: &WaterTuning) -> WaterTuning {
        let mut water = base.clone();
        if !self.effective_water_bob() {
            water.bob_amplitude = 0.0;
        }
        if !self.effective_shimmer() {
            water.alpha_variance = 0.0;
        }
        water
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fishing_scene_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_from_str() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_reduced_motion_zeroes_bob() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut tuning = Tuning::default();
        settings.apply_to(&mut tuning);
        assert_eq!(tuning.water.bob_amplitude, 0.0);
        assert_eq!(tuning.water.alpha_variance, 0.0);
        // Drift and swim are untouched
        assert_eq!(tuning.clouds.definitions[0].speed, 0.02);
    }

    #[test]
    fn test_default_keeps_motion() {
        let mut tuning = Tuning::default();
        Settings::default().apply_to(&mut tuning);
        assert_eq!(tuning.water.bob_amplitude, 8.0);
    }

    #[test]
    fn test_motion_toggle_restores_custom_water() {
        let base = WaterTuning {
            bob_amplitude: 12.0,
            alpha_variance: 0.1,
            ..WaterTuning::default()
        };
        let mut settings = Settings::default();

        settings.reduced_motion = true;
        let still = settings.motion_water(&base);
        assert_eq!(still.bob_amplitude, 0.0);
        assert_eq!(still.alpha_variance, 0.0);

        settings.reduced_motion = false;
        let restored = settings.motion_water(&base);
        assert_eq!(restored.bob_amplitude, 12.0);
        assert_eq!(restored.alpha_variance, 0.1);
        assert_eq!(restored.bob_speed, base.bob_speed);
    }

    #[test]
    fn test_reel_keys() {
        let settings = Settings::default();
        assert!(settings.is_reel_key(" "));
        assert!(settings.is_reel_key("R"));
        assert!(!settings.is_reel_key("Escape"));
    }

    #[test]
    fn test_settings_json_partial() {
        let settings: Settings = serde_json::from_str(r#"{ "quality": "High" }"#).expect("settings");
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.water_bob);
        assert_eq!(settings.quality.circle_segments(), 48);
    }
}
