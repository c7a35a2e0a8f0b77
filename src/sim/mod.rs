//! Deterministic simulation module
//!
//! All environment logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Entity bodies created and destroyed only through the registry
//! - No rendering or input dependencies

pub mod collision;
pub mod env;
pub mod registry;
pub mod sensor;
pub mod spawn;
pub mod state;

pub use collision::first_lethal_contact;
pub use env::{Arena, Environment};
pub use registry::EntityRegistry;
pub use sensor::{SensorFan, compute_observation};
pub use spawn::SpawnScheduler;
pub use state::{Action, EpisodePhase, Obstacle, Particle, RngState, StepResult};
