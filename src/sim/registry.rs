//! Entity registry
//!
//! Owns every non-static body: one player, the obstacle queue (spawn order)
//! and death-burst particles. Bodies are only ever created and destroyed here,
//! so the collections and the physics world stay in lockstep.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, Particle};
use crate::config::CullBounds;
use crate::consts::*;
use crate::error::EnvError;
use crate::physics::{BodyProps, CollisionFilter, PhysicsWorld, RigidBodyHandle};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    player: Option<RigidBodyHandle>,
    /// Oldest first
    obstacles: Vec<Obstacle>,
    particles: Vec<Particle>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Result<RigidBodyHandle, EnvError> {
        self.player.ok_or(EnvError::MissingBody("player"))
    }

    pub fn player_position(&self, physics: &PhysicsWorld) -> Result<Vec2, EnvError> {
        physics
            .position(self.player()?)
            .ok_or(EnvError::MissingBody("player"))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn obstacle_bodies(&self) -> Vec<RigidBodyHandle> {
        self.obstacles.iter().map(|o| o.body).collect()
    }

    /// Membership test used for lethality (walls are not lethal)
    pub fn is_obstacle(&self, body: RigidBodyHandle) -> bool {
        self.obstacles.iter().any(|o| o.body == body)
    }

    /// Spawn one obstacle off-screen left with randomized size, height and speed
    pub fn spawn_obstacle(&mut self, physics: &mut PhysicsWorld, rng: &mut impl Rng) -> RigidBodyHandle {
        let center = Vec2::new(
            rng.random_range(OBSTACLE_SPAWN_X.0..OBSTACLE_SPAWN_X.1),
            rng.random_range(OBSTACLE_SPAWN_Y.0..OBSTACLE_SPAWN_Y.1),
        );
        let radius = rng.random_range(OBSTACLE_RADIUS.0..OBSTACLE_RADIUS.1);
        let drift = rng.random_range(OBSTACLE_SPEED.0..OBSTACLE_SPEED.1);
        let body = self.insert_obstacle(physics, center, radius, drift);
        log::debug!(
            "Spawned obstacle at ({:.0}, {:.0}) r={:.1} drift={:.0}",
            center.x,
            center.y,
            radius,
            drift
        );
        body
    }

    /// Add an obstacle with explicit parameters at the back of the queue
    pub fn insert_obstacle(
        &mut self,
        physics: &mut PhysicsWorld,
        center: Vec2,
        radius: f32,
        drift: f32,
    ) -> RigidBodyHandle {
        let props = BodyProps::new(CollisionFilter::OBSTACLE)
            .restitution(1.0)
            .friction(0.0);
        let body = physics.create_circle(center, radius, props);
        self.obstacles.push(Obstacle { body, drift });
        body
    }

    /// Remove out-of-bounds obstacles, then the oldest surplus above `cap`
    ///
    /// Returns how many obstacles were removed.
    pub fn cull_obstacles(
        &mut self,
        physics: &mut PhysicsWorld,
        bounds: &CullBounds,
        cap: usize,
    ) -> Result<usize, EnvError> {
        let before = self.obstacles.len();

        let mut kept = Vec::with_capacity(before);
        for obstacle in self.obstacles.drain(..) {
            let pos = physics
                .position(obstacle.body)
                .ok_or(EnvError::MissingBody("obstacle"))?;
            if bounds.contains(pos.x, pos.y) {
                kept.push(obstacle);
            } else {
                physics.remove(obstacle.body);
            }
        }
        self.obstacles = kept;

        let surplus = self.obstacles.len().saturating_sub(cap);
        for obstacle in self.obstacles.drain(..surplus) {
            physics.remove(obstacle.body);
        }

        let removed = before - self.obstacles.len();
        if removed > 0 {
            log::debug!("Culled {} obstacles ({} live)", removed, self.obstacles.len());
        }
        Ok(removed)
    }

    /// Reapply each obstacle's drift, keeping the vertical velocity from physics
    pub fn apply_obstacle_drift(&self, physics: &mut PhysicsWorld) -> Result<(), EnvError> {
        for obstacle in &self.obstacles {
            let vel = physics
                .velocity(obstacle.body)
                .ok_or(EnvError::MissingBody("obstacle"))?;
            physics.set_velocity(obstacle.body, Vec2::new(obstacle.drift, vel.y))?;
        }
        Ok(())
    }

    /// Set the player's horizontal velocity, keeping its vertical velocity
    pub fn drive_player(&self, physics: &mut PhysicsWorld, vel_x: f32) -> Result<(), EnvError> {
        let player = self.player()?;
        let vel = physics
            .velocity(player)
            .ok_or(EnvError::MissingBody("player"))?;
        physics.set_velocity(player, Vec2::new(vel_x, vel.y))
    }

    /// Destroy particles that fell below `floor_y`; returns how many
    pub fn expire_particles(&mut self, physics: &mut PhysicsWorld, floor_y: f32) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| match physics.position(p.body) {
            Some(pos) if pos.y <= floor_y => true,
            _ => {
                physics.remove(p.body);
                false
            }
        });
        let expired = before - self.particles.len();
        if expired > 0 {
            log::debug!("Expired {} particles ({} left)", expired, self.particles.len());
        }
        expired
    }

    /// Replace the player with a fresh body at the canonical pose
    pub fn reset_player(&mut self, physics: &mut PhysicsWorld) -> RigidBodyHandle {
        if let Some(old) = self.player.take() {
            physics.remove(old);
        }
        let props = BodyProps::new(CollisionFilter::PLAYER)
            .friction(0.0)
            .report_contacts();
        let player = physics.create_rect(
            Vec2::new(PLAYER_START.0, PLAYER_START.1),
            Vec2::splat(PLAYER_SIZE),
            props,
        );
        self.player = Some(player);
        player
    }

    /// Destroy every obstacle and particle; the player is left alone
    pub fn clear_all(&mut self, physics: &mut PhysicsWorld) {
        for obstacle in self.obstacles.drain(..) {
            physics.remove(obstacle.body);
        }
        for particle in self.particles.drain(..) {
            physics.remove(particle.body);
        }
    }

    /// Scatter `BURST_COUNT` non-colliding squares outward from `origin`
    pub fn spawn_death_burst(
        &mut self,
        physics: &mut PhysicsWorld,
        origin: Vec2,
        rng: &mut impl Rng,
    ) -> Result<(), EnvError> {
        let props = BodyProps::new(CollisionFilter::PARTICLE);
        self.particles.reserve(BURST_COUNT);
        for _ in 0..BURST_COUNT {
            let size = rng.random_range(BURST_SIZE.0..BURST_SIZE.1);
            let offset = Vec2::new(
                rng.random_range(-BURST_SPREAD..BURST_SPREAD),
                rng.random_range(-BURST_SPREAD..BURST_SPREAD),
            );
            let body = physics.create_rect(origin + offset, Vec2::splat(size), props);

            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random_range(BURST_SPEED.0..BURST_SPEED.1);
            physics.set_velocity(body, Vec2::from_angle(angle) * speed)?;
            self.particles.push(Particle { body });
        }
        Ok(())
    }
}
