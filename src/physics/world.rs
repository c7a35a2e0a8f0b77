//! Rigid-body world
//!
//! Thin command/query surface over a rapier2d pipeline. Coordinates are in
//! pixels with +y pointing down, so gravity is positive y.

use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use super::category::CollisionFilter;
use crate::consts::GRAVITY;
use crate::error::EnvError;
use crate::{from_na, to_na};

/// Material and filtering for a new body
#[derive(Debug, Clone, Copy)]
pub struct BodyProps {
    pub filter: CollisionFilter,
    pub restitution: f32,
    pub friction: f32,
    /// Report collision-start events for this body
    pub report_contacts: bool,
}

impl BodyProps {
    pub fn new(filter: CollisionFilter) -> Self {
        Self {
            filter,
            restitution: 0.0,
            friction: 0.1,
            report_contacts: false,
        }
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn report_contacts(mut self) -> Self {
        self.report_contacts = true;
        self
    }
}

/// Two bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStart {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
}

impl ContactStart {
    /// The other side of the pair, if `body` is one side
    pub fn other(&self, body: RigidBodyHandle) -> Option<RigidBodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Collects collision-start pairs while the pipeline steps
#[derive(Default)]
struct ContactStartCollector {
    started: Mutex<Vec<ContactStart>>,
}

impl ContactStartCollector {
    fn drain(&self) -> Vec<ContactStart> {
        match self.started.lock() {
            Ok(mut started) => std::mem::take(&mut *started),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for ContactStartCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() {
            return;
        }
        let parent = |handle: ColliderHandle| colliders.get(handle).and_then(|c| c.parent());
        if let (Some(body_a), Some(body_b)) = (parent(event.collider1()), parent(event.collider2())) {
            if let Ok(mut started) = self.started.lock() {
                started.push(ContactStart { body_a, body_b });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Owned physics world
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: ContactStartCollector,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Pixel units: scale solver tolerances accordingly
        integration_parameters.length_unit = 100.0;
        Self {
            gravity: vector![0.0, GRAVITY],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: ContactStartCollector::default(),
        }
    }

    /// Create a dynamic circle and add it to the world
    pub fn create_circle(&mut self, center: Vec2, radius: f32, props: BodyProps) -> RigidBodyHandle {
        self.insert(
            RigidBodyBuilder::dynamic(),
            center,
            ColliderBuilder::ball(radius),
            props,
        )
    }

    /// Create a dynamic axis-aligned rectangle and add it to the world
    pub fn create_rect(&mut self, center: Vec2, size: Vec2, props: BodyProps) -> RigidBodyHandle {
        self.insert(
            RigidBodyBuilder::dynamic(),
            center,
            ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0),
            props,
        )
    }

    /// Create an immovable rectangle and add it to the world
    pub fn create_static_rect(&mut self, center: Vec2, size: Vec2, props: BodyProps) -> RigidBodyHandle {
        self.insert(
            RigidBodyBuilder::fixed(),
            center,
            ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0),
            props,
        )
    }

    fn insert(
        &mut self,
        body: RigidBodyBuilder,
        center: Vec2,
        collider: ColliderBuilder,
        props: BodyProps,
    ) -> RigidBodyHandle {
        // Gameplay bodies never spin
        let body = body.translation(to_na(center)).lock_rotations().build();
        let handle = self.bodies.insert(body);

        let mut collider = collider
            .restitution(props.restitution)
            .friction(props.friction)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .collision_groups(props.filter.to_interaction_groups());
        if props.report_contacts {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        handle
    }

    /// Remove a body and its colliders; returns false if it was already gone
    pub fn remove(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| from_na(b.translation()))
    }

    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| from_na(b.linvel()))
    }

    /// Overwrite a body's linear velocity (pixels/s)
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) -> Result<(), EnvError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(EnvError::MissingBody("velocity target"))?;
        body.set_linvel(to_na(velocity), true);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) -> Result<(), EnvError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(EnvError::MissingBody("position target"))?;
        body.set_translation(to_na(position), true);
        Ok(())
    }

    /// Count the bodies in `set` that the segment `from -> to` touches
    ///
    /// Tests against current collider poses directly, so it is valid right
    /// after bodies are created, before any step.
    pub fn ray_hits(&self, set: &[RigidBodyHandle], from: Vec2, to: Vec2) -> usize {
        let ray = Ray::new(point![from.x, from.y], to_na(to - from));
        set.iter()
            .filter(|&&handle| {
                self.bodies.get(handle).is_some_and(|body| {
                    body.colliders().iter().any(|&ch| {
                        self.colliders.get(ch).is_some_and(|collider| {
                            // Direction is the full segment, so toi 1.0 is the endpoint
                            collider
                                .shape()
                                .intersects_ray(collider.position(), &ray, 1.0)
                        })
                    })
                })
            })
            .count()
    }

    /// Advance the world by `dt` seconds and return the contacts that began
    pub fn step(&mut self, dt: f32) -> Vec<ContactStart> {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.events,
        );
        self.events.drain()
    }
}
