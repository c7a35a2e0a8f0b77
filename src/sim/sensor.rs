//! Fan-raycast sensor model
//!
//! Rays sweep a half-disk above the player, from pointing left (180°) to
//! pointing right (0°). Each ray is sampled at `resolution` radial steps out to
//! `range`; the first step whose segment touches an obstacle scores
//! `(resolution - k + 1) / resolution`, so nearer hits score higher. No hit
//! scores 0.
//!
//! Stateless: the observation depends only on current body positions.

use std::f32::consts::PI;

use glam::Vec2;

use super::registry::EntityRegistry;
use crate::config::EnvConfig;
use crate::error::EnvError;
use crate::fan_direction;
use crate::physics::{PhysicsWorld, RigidBodyHandle};

/// Ray fan geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFan {
    pub num_sensors: usize,
    pub resolution: usize,
    pub range: f32,
}

impl SensorFan {
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            num_sensors: config.num_sensors,
            resolution: config.sensor_depth_resolution,
            range: config.sensor_range,
        }
    }

    /// Angle of ray `index` (radians, 0 = +x, PI/2 = up)
    pub fn ray_angle(&self, index: usize) -> f32 {
        PI - PI / (self.num_sensors - 1) as f32 * index as f32
    }

    /// Proximity score of one ray against `targets`
    pub fn ray_score(
        &self,
        physics: &PhysicsWorld,
        targets: &[RigidBodyHandle],
        origin: Vec2,
        theta: f32,
    ) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let dir = fan_direction(theta);
        let step = self.range / self.resolution as f32;
        let res = self.resolution as f32;

        (1..=self.resolution)
            .find(|&k| physics.ray_hits(targets, origin, origin + dir * (k as f32 * step)) > 0)
            .map_or(0.0, |k| (res - k as f32 + 1.0) / res)
    }

    /// One score per ray, in fan order
    pub fn scan(&self, physics: &PhysicsWorld, targets: &[RigidBodyHandle], origin: Vec2) -> Vec<f32> {
        (0..self.num_sensors)
            .map(|i| self.ray_score(physics, targets, origin, self.ray_angle(i)))
            .collect()
    }
}

/// Player x normalized by world width, followed by one score per ray
pub fn compute_observation(
    physics: &PhysicsWorld,
    registry: &EntityRegistry,
    config: &EnvConfig,
) -> Result<Vec<f32>, EnvError> {
    let origin = registry.player_position(physics)?;
    let targets = registry.obstacle_bodies();

    let mut observation = Vec::with_capacity(config.observation_size());
    observation.push(origin.x / config.world_width);
    observation.extend(SensorFan::from_config(config).scan(physics, &targets, origin));
    Ok(observation)
}
