//! Episode state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::EnvError;
use crate::physics::RigidBodyHandle;

/// Current phase of the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Player alive, obstacles spawning
    Playing,
    /// Player touched an obstacle; only `reset()` leaves this phase
    GameOver,
}

/// Discrete player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    Left = 0,
    #[default]
    Hold = 1,
    Right = 2,
}

impl Action {
    pub const COUNT: usize = 3;

    /// Horizontal direction (-1, 0, +1)
    pub fn direction(self) -> f32 {
        match self {
            Action::Left => -1.0,
            Action::Hold => 0.0,
            Action::Right => 1.0,
        }
    }

    /// Map held movement keys to an action; both or neither held means hold
    pub fn from_held_keys(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Action::Left,
            (false, true) => Action::Right,
            _ => Action::Hold,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i64> for Action {
    type Error = EnvError;

    /// Out-of-range indices are rejected, never clamped
    fn try_from(index: i64) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Action::Left),
            1 => Ok(Action::Hold),
            2 => Ok(Action::Right),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

/// A rolling obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub body: RigidBodyHandle,
    /// Constant horizontal speed (pixels/s), reapplied every step
    pub drift: f32,
}

/// A decorative death-burst fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub body: RigidBodyHandle,
}

/// Result of one `step()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Vec<f32>,
    /// +1 while playing, -1 once the episode is over
    pub reward: f32,
    pub done: bool,
}

/// RNG state wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
