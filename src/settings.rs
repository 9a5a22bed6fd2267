//! Engine settings
//!
//! Loaded from JSON when the host provides a file; every field falls back
//! to its default when absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub target_fps: u32,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Distance from the bottom edge to the ground line
    pub ground_margin: f32,
    /// Downward acceleration per tick
    pub gravity: f32,

    // === Effects ===
    pub quality: QualityPreset,
    /// Cosmetic particles (explosions, sparks)
    pub particles: bool,

    /// Fixed RNG seed (None = host picks one per run)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ground_margin: GROUND_MARGIN,
            gravity: GRAVITY,
            quality: QualityPreset::Medium,
            particles: true,
            seed: None,
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

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError {
                path: path.display().to_string(),
                details: e.to_string(),
            })
            .and_then(|json| Self::from_json(&json));

        match result {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e} - using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "target_fps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "arena",
                reason: format!("{}x{} is not a usable area", self.arena_width, self.arena_height),
            });
        }
        if self.ground_margin < 0.0 || self.ground_margin >= self.arena_height {
            return Err(ConfigError::Invalid {
                field: "ground_margin",
                reason: format!("{} must lie inside the arena height", self.ground_margin),
            });
        }
        Ok(())
    }

    /// Duration of one simulation frame in milliseconds
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "target_fps": 60, "quality": "High" }"#).unwrap();
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.arena_width, ARENA_WIDTH);
        assert_eq!(settings.gravity, GRAVITY);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "target_fps": 0 }"#),
            Err(ConfigError::Invalid { field: "target_fps", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "ground_margin": 900.0 }"#),
            Err(ConfigError::Invalid { field: "ground_margin", .. })
        ));
        assert!(matches!(Settings::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_particle_cap() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 100);
        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
        assert!((Settings::default().frame_ms() - 1000.0 / 120.0).abs() < 1e-9);
    }
}
