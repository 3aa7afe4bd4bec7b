//! Galaxy configuration files
//!
//! A galaxy file holds one `[experience]` table and any number of
//! `[[layers]]` tables. Every `[experience]` key is optional.

use galaxy_core::{GalaxyError, Result, Rgb};
use galaxy_particles::LayerDescriptor;
use galaxy_runtime::DEFAULT_TIME_STEP;
use serde::Deserialize;
use std::path::Path;

/// The galaxy shipped with the player
pub const DEFAULT_CONFIG: &str = include_str!("../galaxy.toml");

/// Scene-wide settings from the `[experience]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExperienceSettings {
    pub title: String,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Orbit damping factor, see `Camera::set_damping`
    pub damping: f32,
    /// Seconds of shader time per frame
    pub time_step: f64,
    /// Sprite texture; the built-in glow when absent
    pub texture: Option<String>,
    /// Height of the horizontal plane the pointer is projected onto
    pub pointer_plane_height: f32,
    /// Fixed seed for reproducible layouts
    pub seed: Option<u64>,
    pub clear_color: Rgb,
    /// Initial window size (native only)
    pub width: u32,
    pub height: u32,
}

impl Default for ExperienceSettings {
    fn default() -> Self {
        Self {
            title: "Galaxy".to_string(),
            fov: 75.0,
            camera_position: [0.0, 2.0, 2.0],
            camera_target: [0.0, 0.0, 0.0],
            damping: galaxy_render::DEFAULT_DAMPING,
            time_step: DEFAULT_TIME_STEP,
            texture: None,
            pointer_plane_height: 0.0,
            seed: None,
            clear_color: Rgb::new(0.0, 0.0, 0.0),
            width: 1280,
            height: 720,
        }
    }
}

impl ExperienceSettings {
    fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(GalaxyError::Config(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(GalaxyError::Config(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        Ok(())
    }
}

/// A parsed galaxy file
#[derive(Debug, Clone, Default)]
pub struct GalaxyConfig {
    pub experience: ExperienceSettings,
    pub layers: Vec<LayerDescriptor>,
}

impl GalaxyConfig {
    /// The built-in galaxy
    pub fn builtin() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Read and parse a galaxy file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            GalaxyError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let config = Self::parse(&source)?;
        log::info!(
            "Loaded galaxy config '{}' ({} layers)",
            path.display(),
            config.layers.len()
        );
        Ok(config)
    }

    /// Parse a galaxy file.
    ///
    /// Malformed TOML or `[experience]` values fail the whole file. A
    /// malformed layer table is logged and dropped.
    pub fn parse(source: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(source)?;

        let experience = match table.remove("experience") {
            Some(value) => value.try_into::<ExperienceSettings>()?,
            None => ExperienceSettings::default(),
        };
        experience.validate()?;

        let mut layers = Vec::new();
        if let Some(value) = table.get("layers") {
            let entries = value
                .as_array()
                .ok_or_else(|| GalaxyError::Config("'layers' must be an array of tables".into()))?;
            for (index, entry) in entries.iter().enumerate() {
                let Some(layer_table) = entry.as_table() else {
                    log::warn!("Skipping layer {}: not a table", index);
                    continue;
                };
                match LayerDescriptor::from_toml(layer_table) {
                    Ok(layer) => layers.push(layer),
                    Err(e) => log::warn!("Skipping layer {}: {}", index, e),
                }
            }
        }

        Ok(Self { experience, layers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_particles::{DistributionShape, SpiralParams};

    #[test]
    fn builtin_config_parses() {
        let config = GalaxyConfig::builtin().unwrap();
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.experience.fov, 75.0);
        assert_eq!(config.experience.camera_position, [0.0, 2.0, 2.0]);

        let core = &config.layers[0];
        assert_eq!(core.name, "core");
        assert_eq!(core.count, 10_000);
        assert_eq!(core.min_radius, 0.3);
        assert_eq!(core.max_radius, 1.5);
        assert_eq!(
            core.shape,
            DistributionShape::Spiral(SpiralParams {
                spin: 3.0,
                branches: 3,
                randomness: 0.2,
                randomness_power: 3.0,
            })
        );

        assert!(matches!(config.layers[2].shape, DistributionShape::Disc { .. }));
        assert!(!config.layers[2].interactive);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = GalaxyConfig::parse("").unwrap();
        assert!(config.layers.is_empty());
        assert_eq!(config.experience, ExperienceSettings::default());
    }

    #[test]
    fn partial_experience_table() {
        let config = GalaxyConfig::parse(
            r#"
            [experience]
            seed = 42
            texture = "textures/star.png"
            clear_color = [0.1, 0.0, 0.2]
            "#,
        )
        .unwrap();
        assert_eq!(config.experience.seed, Some(42));
        assert_eq!(config.experience.texture.as_deref(), Some("textures/star.png"));
        assert_eq!(config.experience.clear_color, Rgb::new(0.1, 0.0, 0.2));
        assert_eq!(config.experience.time_step, DEFAULT_TIME_STEP);
    }

    #[test]
    fn bad_layer_is_dropped() {
        let config = GalaxyConfig::parse(
            r#"
            [[layers]]
            name = "bad"
            count = -5

            [[layers]]
            name = "good"
            count = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.layers.len(), 1);
        assert_eq!(config.layers[0].name, "good");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = GalaxyConfig::parse("[experience\nfov = ").unwrap_err();
        assert!(matches!(err, GalaxyError::Config(_)));
    }

    #[test]
    fn zero_time_step_rejected() {
        let err = GalaxyConfig::parse("[experience]\ntime_step = 0.0").unwrap_err();
        assert!(matches!(err, GalaxyError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = GalaxyConfig::load("no/such/galaxy.toml").unwrap_err();
        assert!(matches!(err, GalaxyError::Config(_)));
    }
}
