//! Environment core
//!
//! Composes the registry, sensors, scheduler and terminal detection into the
//! `reset()` / `step(action)` control loop. One step is one fixed physics
//! timestep; nothing runs between calls.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::first_lethal_contact;
use super::registry::EntityRegistry;
use super::sensor::compute_observation;
use super::spawn::SpawnScheduler;
use super::state::{Action, EpisodePhase, RngState, StepResult};
use crate::config::EnvConfig;
use crate::consts::*;
use crate::error::EnvError;
use crate::physics::{BodyProps, CollisionCategory, CollisionFilter, ContactStart, PhysicsWorld, RigidBodyHandle};

/// Static geometry, built once and kept across resets
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub ground: RigidBodyHandle,
    pub left_wall: RigidBodyHandle,
    pub right_wall: RigidBodyHandle,
}

impl Arena {
    /// Ground spans `GROUND_LEFT_EDGE..world_width`; walls stand at x = 0 and x = `world_width`
    fn build(physics: &mut PhysicsWorld, world_width: f32) -> Self {
        let wall_size = Vec2::new(WALL_SIZE.0, WALL_SIZE.1);
        Self {
            ground: physics.create_static_rect(
                Vec2::new((GROUND_LEFT_EDGE + world_width) / 2.0, GROUND_Y),
                Vec2::new(world_width - GROUND_LEFT_EDGE, GROUND_THICKNESS),
                BodyProps::new(CollisionFilter::GROUND),
            ),
            left_wall: physics.create_static_rect(Vec2::ZERO, wall_size, BodyProps::new(CollisionFilter::WALL)),
            right_wall: physics.create_static_rect(
                Vec2::new(world_width, 0.0),
                wall_size,
                BodyProps::new(CollisionFilter::WALL),
            ),
        }
    }
}

/// Dodge environment: owns the physics world and every entity in it
pub struct Environment {
    config: EnvConfig,
    physics: PhysicsWorld,
    registry: EntityRegistry,
    scheduler: SpawnScheduler,
    arena: Arena,
    rng_state: RngState,
    rng: Pcg32,
    phase: EpisodePhase,
    frame: u64,
}

impl Environment {
    /// Validate `config`, build the arena and start the first episode
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        config.validate()?;
        CollisionCategory::validate()?;

        let mut physics = PhysicsWorld::new();
        let arena = Arena::build(&mut physics, config.world_width);
        let rng_state = RngState::new(config.seed);

        let mut env = Self {
            scheduler: SpawnScheduler::new(config.spawn_interval_frames),
            rng: rng_state.to_rng(),
            rng_state,
            config,
            physics,
            registry: EntityRegistry::new(),
            arena,
            phase: EpisodePhase::Playing,
            frame: 0,
        };
        env.reset()?;
        Ok(env)
    }

    /// Restart the RNG stream; takes effect for all later spawns
    pub fn reseed(&mut self, seed: u64) {
        self.rng_state = RngState::new(seed);
        self.rng = self.rng_state.to_rng();
    }

    /// Clear all entities, recreate the player and return the first observation
    pub fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        self.registry.clear_all(&mut self.physics);
        self.registry.reset_player(&mut self.physics);
        self.frame = 0;
        self.phase = EpisodePhase::Playing;
        log::info!("Episode reset (seed {})", self.rng_state.seed);
        self.observe()
    }

    /// Step with a raw action index; anything but 0, 1 or 2 is rejected
    pub fn step_index(&mut self, action: i64) -> Result<StepResult, EnvError> {
        self.step(Action::try_from(action)?)
    }

    /// Advance one frame
    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        self.registry
            .drive_player(&mut self.physics, action.direction() * PLAYER_SPEED)?;

        self.registry.cull_obstacles(
            &mut self.physics,
            &self.config.cull_bounds,
            self.config.max_obstacles,
        )?;
        self.registry.apply_obstacle_drift(&mut self.physics)?;
        self.registry
            .expire_particles(&mut self.physics, self.config.particle_floor_y);

        let contacts = self.physics.step(SIM_DT);
        self.handle_contacts(&contacts)?;

        let observation = self.observe()?;

        // No new obstacles once the episode is over
        if self.phase == EpisodePhase::Playing {
            self.scheduler
                .maybe_spawn(self.frame, &mut self.registry, &mut self.physics, &mut self.rng);
        }
        self.frame += 1;

        let done = self.phase == EpisodePhase::GameOver;
        Ok(StepResult {
            observation,
            reward: if done { -1.0 } else { 1.0 },
            done,
        })
    }

    /// React to this step's contact starts; at most one death per episode
    fn handle_contacts(&mut self, contacts: &[ContactStart]) -> Result<(), EnvError> {
        if self.phase == EpisodePhase::GameOver {
            return Ok(());
        }
        if first_lethal_contact(contacts, &self.registry).is_some() {
            let origin = self.registry.player_position(&self.physics)?;
            self.registry
                .spawn_death_burst(&mut self.physics, origin, &mut self.rng)?;
            self.phase = EpisodePhase::GameOver;
            log::info!(
                "Player hit an obstacle at frame {} ({:.0}, {:.0})",
                self.frame,
                origin.x,
                origin.y
            );
        }
        Ok(())
    }

    /// Current observation without advancing
    pub fn observe(&self) -> Result<Vec<f32>, EnvError> {
        compute_observation(&self.physics, &self.registry, &self.config)
    }

    /// Insert an obstacle directly, bypassing the scheduler
    pub fn place_obstacle(&mut self, center: Vec2, radius: f32, drift: f32) -> RigidBodyHandle {
        self.registry
            .insert_obstacle(&mut self.physics, center, radius, drift)
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == EpisodePhase::GameOver
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn obstacle_count(&self) -> usize {
        self.registry.obstacles().len()
    }

    pub fn particle_count(&self) -> usize {
        self.registry.particles().len()
    }

    pub fn player_position(&self) -> Result<Vec2, EnvError> {
        self.registry.player_position(&self.physics)
    }

    pub fn observation_size(&self) -> usize {
        self.config.observation_size()
    }

    pub fn num_actions(&self) -> usize {
        Action::COUNT
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}
