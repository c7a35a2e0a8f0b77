//! Roll Dodge - a 2D obstacle-dodging environment
//!
//! Core modules:
//! - `physics`: Rigid-body world (rapier2d) and collision categories
//! - `sim`: Entity registry, sensors, spawning, terminal detection, step loop
//! - `config`: Construction-time environment configuration
//! - `error`: Error taxonomy shared by all fallible operations

pub mod config;
pub mod error;
pub mod physics;
pub mod sim;

pub use config::{CullBounds, EnvConfig};
pub use error::EnvError;
pub use sim::{Action, EpisodePhase, Environment, StepResult};

use glam::Vec2;
use rapier2d::prelude::nalgebra;

/// Game configuration constants
pub mod consts {
    /// Simulation frames per second
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed physics timestep
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Downward gravity (pixels/s², +y is down)
    pub const GRAVITY: f32 = 1000.0;

    /// Arena dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    /// Ground slab runs from here to the right wall, well past the spawn zone
    pub const GROUND_LEFT_EDGE: f32 = -1800.0;
    pub const GROUND_Y: f32 = 600.0;
    pub const GROUND_THICKNESS: f32 = 20.0;
    pub const WALL_SIZE: (f32, f32) = (20.0, 1500.0);

    /// Player defaults
    pub const PLAYER_START: (f32, f32) = (400.0, 400.0);
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Horizontal drift speed while an arrow action is held (10 px/frame)
    pub const PLAYER_SPEED: f32 = 10.0 * FRAME_RATE;

    /// Obstacle spawn ranges (x/y in pixels, speed in pixels/s)
    pub const OBSTACLE_SPAWN_X: (f32, f32) = (-400.0, -30.0);
    pub const OBSTACLE_SPAWN_Y: (f32, f32) = (0.0, 200.0);
    pub const OBSTACLE_RADIUS: (f32, f32) = (20.0, 60.0);
    pub const OBSTACLE_SPEED: (f32, f32) = (3.0 * FRAME_RATE, 10.0 * FRAME_RATE);

    /// Death burst
    pub const BURST_COUNT: usize = 100;
    pub const BURST_SIZE: (f32, f32) = (10.0, 20.0);
    pub const BURST_SPREAD: f32 = 10.0;
    pub const BURST_SPEED: (f32, f32) = (5.0 * FRAME_RATE, 10.0 * FRAME_RATE);
}

/// Unit vector for a fan angle, with +y pointing up on screen
#[inline]
pub fn fan_direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), -theta.sin())
}

/// Convert a glam vector to a rapier vector
#[inline]
pub(crate) fn to_na(v: Vec2) -> rapier2d::prelude::Vector<f32> {
    rapier2d::prelude::vector![v.x, v.y]
}

/// Convert a rapier vector to a glam vector
#[inline]
pub(crate) fn from_na(v: &rapier2d::prelude::Vector<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}
