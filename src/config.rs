//! Environment configuration
//!
//! Fixed at construction time and never mutated afterwards. Loadable from JSON
//! so training runs can pin their sensor layout alongside their checkpoints.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::WORLD_WIDTH;
use crate::error::EnvError;

/// Obstacles past either edge are removed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullBounds {
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for CullBounds {
    fn default() -> Self {
        Self {
            max_x: 900.0,
            max_y: 700.0,
        }
    }
}

impl CullBounds {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x <= self.max_x && y <= self.max_y
    }
}

/// Environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    // === Sensors ===
    /// Rays in the fan (at least 2)
    pub num_sensors: usize,
    /// Radial samples per ray
    pub sensor_depth_resolution: usize,
    /// Ray length in world units
    pub sensor_range: f32,

    // === Population ===
    /// Maximum simultaneously live obstacles
    pub max_obstacles: usize,
    /// Frames between obstacle spawns
    pub spawn_interval_frames: u64,

    // === World ===
    pub cull_bounds: CullBounds,
    /// Particles below this line are destroyed
    pub particle_floor_y: f32,
    /// Arena width: position of the right wall and normalizer for the player's x
    pub world_width: f32,

    /// Seed for obstacle and particle randomization
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            num_sensors: 8,
            sensor_depth_resolution: 10,
            sensor_range: 300.0,

            max_obstacles: 10,
            spawn_interval_frames: 30,

            cull_bounds: CullBounds::default(),
            particle_floor_y: 700.0,
            world_width: WORLD_WIDTH,

            seed: 0,
        }
    }
}

impl EnvConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json_str(json: &str) -> Result<Self, EnvError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded environment config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    /// Reject configurations the sensor model or scheduler cannot run with
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.num_sensors < 2 {
            return Err(EnvError::InvalidConfig(format!(
                "num_sensors must be at least 2, got {}",
                self.num_sensors
            )));
        }
        if self.sensor_depth_resolution < 1 {
            return Err(EnvError::InvalidConfig(
                "sensor_depth_resolution must be at least 1".to_string(),
            ));
        }
        if !(self.sensor_range.is_finite() && self.sensor_range > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "sensor_range must be positive, got {}",
                self.sensor_range
            )));
        }
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(EnvError::InvalidConfig(format!(
                "world_width must be positive, got {}",
                self.world_width
            )));
        }
        if self.spawn_interval_frames == 0 {
            return Err(EnvError::InvalidConfig(
                "spawn_interval_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of the observation vector: player x plus one value per ray
    pub fn observation_size(&self) -> usize {
        1 + self.num_sensors
    }
}
