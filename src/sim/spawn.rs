//! Fixed-cadence obstacle spawning

use rand::Rng;

use super::registry::EntityRegistry;
use crate::physics::{PhysicsWorld, RigidBodyHandle};

/// Spawns one obstacle every `interval` frames, counted from reset (frame 0 spawns)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnScheduler {
    interval: u64,
}

impl SpawnScheduler {
    /// `interval` must be non-zero; `EnvConfig::validate` guarantees it
    pub fn new(interval: u64) -> Self {
        Self { interval }
    }

    pub fn is_due(&self, frame: u64) -> bool {
        frame.is_multiple_of(self.interval)
    }

    pub fn maybe_spawn(
        &self,
        frame: u64,
        registry: &mut EntityRegistry,
        physics: &mut PhysicsWorld,
        rng: &mut impl Rng,
    ) -> Option<RigidBodyHandle> {
        self.is_due(frame)
            .then(|| registry.spawn_obstacle(physics, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RngState;

    #[test]
    fn test_cadence() {
        let scheduler = SpawnScheduler::new(30);
        let due: Vec<u64> = (0..100).filter(|&f| scheduler.is_due(f)).collect();
        assert_eq!(due, vec![0, 30, 60, 90]);
    }

    #[test]
    fn test_interval_of_one_spawns_every_frame() {
        let scheduler = SpawnScheduler::new(1);
        assert!((0..10).all(|f| scheduler.is_due(f)));
    }

    #[test]
    fn test_maybe_spawn_adds_obstacle_only_when_due() {
        let mut physics = PhysicsWorld::new();
        let mut registry = EntityRegistry::new();
        let mut rng = RngState::new(9).to_rng();
        let scheduler = SpawnScheduler::new(30);

        assert!(scheduler.maybe_spawn(0, &mut registry, &mut physics, &mut rng).is_some());
        assert!(scheduler.maybe_spawn(1, &mut registry, &mut physics, &mut rng).is_none());
        assert!(scheduler.maybe_spawn(29, &mut registry, &mut physics, &mut rng).is_none());
        assert!(scheduler.maybe_spawn(30, &mut registry, &mut physics, &mut rng).is_some());
        assert_eq!(registry.obstacles().len(), 2);
    }
}
