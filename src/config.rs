use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// How chunks are filled when they are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Natural,
    /// Identical low stack in every chunk (creative/testing preset)
    Flat,
}

/// World settings, supplied once at world creation and never changed afterwards
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub generation: GenerationMode,
    /// Radius in chunks around the observer's chunk
    pub render_distance: i32,
    /// World units per block
    pub block_size: f32,
    /// Chunk footprint in blocks
    pub chunk_width: i32,
    pub chunk_depth: i32,
    /// Mesh rebuilds allowed per frame
    pub mesh_budget: usize,
    /// Maximum edit ray length in world units
    pub reach: f32,
    pub terrain: TerrainConfig,
    pub physics: PhysicsConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            generation: GenerationMode::Natural,
            render_distance: 4,
            block_size: 1.0,
            chunk_width: 16,
            chunk_depth: 16,
            mesh_budget: 2,
            reach: 8.0,
            terrain: TerrainConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height the noise oscillates around, in blocks
    pub base_height: i32,
    /// Peak noise displacement in blocks
    pub amplitude: f64,
    pub min_height: i32,
    pub max_height: i32,
    /// Columns whose surface lies below this are sand under water
    pub sea_level: i32,
    /// Chance that an interior column grows a tree
    pub tree_chance: f64,
    /// Height of the flat preset's grass surface
    pub flat_height: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_height: 20,
            amplitude: 10.0,
            min_height: 4,
            max_height: 40,
            sea_level: 14,
            tree_chance: 0.01,
            flat_height: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_speed: f32,
    pub ground_acceleration: f32,
    pub air_acceleration: f32,
    /// Exponential horizontal damping rates (per second)
    pub ground_drag: f32,
    pub air_drag: f32,
    pub terminal_velocity: f32,
    pub observer_width: f32,
    pub observer_height: f32,
    /// Eye position above the feet
    pub eye_height: f32,
    /// Feet below this height trigger a respawn
    pub void_threshold: f32,
    pub look_sensitivity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            jump_speed: 8.0,
            ground_acceleration: 60.0,
            air_acceleration: 15.0,
            ground_drag: 10.0,
            air_drag: 1.0,
            terminal_velocity: 50.0,
            observer_width: 0.6,
            observer_height: 1.8,
            eye_height: 1.6,
            void_threshold: -32.0,
            look_sensitivity: 0.003,
        }
    }
}

impl WorldConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width <= 0 || self.chunk_depth <= 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk footprint must be positive, got {}x{}",
                self.chunk_width, self.chunk_depth
            )));
        }
        if !(self.block_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        if self.render_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if self.mesh_budget == 0 {
            return Err(ConfigError::Invalid("mesh_budget must be at least 1".into()));
        }
        if self.terrain.min_height < 1 || self.terrain.min_height > self.terrain.max_height {
            return Err(ConfigError::Invalid(format!(
                "terrain height range {}..={} is empty or below the floor",
                self.terrain.min_height, self.terrain.max_height
            )));
        }
        let physics = &self.physics;
        if physics.observer_width <= 0.0 || physics.observer_height <= 0.0 {
            return Err(ConfigError::Invalid("observer box must have positive size".into()));
        }
        if physics.eye_height < 0.0 || physics.eye_height > physics.observer_height {
            return Err(ConfigError::Invalid(format!(
                "eye_height {} must lie within the observer's height {}",
                physics.eye_height, physics.observer_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WorldConfig::from_toml(
            r#"
            seed = 7
            generation = "flat"
            render_distance = 2

            [physics]
            gravity = 9.5
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.generation, GenerationMode::Flat);
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.chunk_width, 16);
        assert_eq!(config.physics.gravity, 9.5);
        assert_eq!(config.physics.jump_speed, 8.0);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let err = WorldConfig::from_toml("chunk_width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_toml("block_size = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_toml("mesh_budget = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_generation_mode() {
        let err = WorldConfig::from_toml(r#"generation = "caves""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = WorldConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
