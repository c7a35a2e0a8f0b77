//! Collision categories
//!
//! Each body carries one category bit (its membership) and a mask of the
//! categories it may touch. Two bodies interact only if each one's mask
//! contains the other's category.

use rapier2d::prelude::{Group, InteractionGroups};

use crate::error::EnvError;

/// Collision category tags (one bit each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CollisionCategory {
    Default = 0x0001,
    Obstacle = 0x0002,
    Wall = 0x0004,
    Particle = 0x0008,
    /// Mask-only tag: nothing is a member, so a body masked to it touches nothing
    NoCollision = 0x0010,
}

impl CollisionCategory {
    /// Categories real bodies can belong to
    pub const MEMBERS: [CollisionCategory; 4] = [
        CollisionCategory::Default,
        CollisionCategory::Obstacle,
        CollisionCategory::Wall,
        CollisionCategory::Particle,
    ];

    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Check that every tag is a single bit and no two tags share a bit
    pub fn validate() -> Result<(), EnvError> {
        if tags_are_disjoint() {
            Ok(())
        } else {
            Err(EnvError::InvalidConfig(
                "collision categories overlap".to_string(),
            ))
        }
    }
}

const fn tags_are_disjoint() -> bool {
    let tags = [
        CollisionCategory::Default.bits(),
        CollisionCategory::Obstacle.bits(),
        CollisionCategory::Wall.bits(),
        CollisionCategory::Particle.bits(),
        CollisionCategory::NoCollision.bits(),
    ];
    let mut seen = 0u32;
    let mut i = 0;
    while i < tags.len() {
        if !tags[i].is_power_of_two() || seen & tags[i] != 0 {
            return false;
        }
        seen |= tags[i];
        i += 1;
    }
    true
}

const _: () = assert!(tags_are_disjoint(), "collision category bits must be disjoint");

/// Membership plus mask for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: CollisionCategory,
    pub mask: u32,
}

impl CollisionFilter {
    /// Member of `category`, collides with everything
    pub const fn solid(category: CollisionCategory) -> Self {
        Self {
            category,
            mask: u32::MAX,
        }
    }

    /// Member of `category`, collides only with the listed categories
    pub const fn only(category: CollisionCategory, mask: CollisionCategory) -> Self {
        Self {
            category,
            mask: mask.bits(),
        }
    }

    pub const PLAYER: Self = Self::solid(CollisionCategory::Default);
    pub const GROUND: Self = Self::solid(CollisionCategory::Default);
    pub const WALL: Self = Self::solid(CollisionCategory::Wall);
    pub const OBSTACLE: Self = Self::only(CollisionCategory::Obstacle, CollisionCategory::Default);
    pub const PARTICLE: Self = Self::only(CollisionCategory::Particle, CollisionCategory::NoCollision);

    /// Whether two filtered bodies would generate contacts
    pub fn interacts_with(&self, other: &CollisionFilter) -> bool {
        self.mask & other.category.bits() != 0 && other.mask & self.category.bits() != 0
    }

    pub fn to_interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category.bits()),
            Group::from_bits_truncate(self.mask),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_validate() {
        assert!(CollisionCategory::validate().is_ok());
    }

    #[test]
    fn test_no_collision_is_not_a_member_bit() {
        for category in CollisionCategory::MEMBERS {
            assert_eq!(category.bits() & CollisionCategory::NoCollision.bits(), 0);
        }
    }

    #[test]
    fn test_obstacles_touch_player_and_ground_only() {
        let obstacle = CollisionFilter::OBSTACLE;
        assert!(obstacle.interacts_with(&CollisionFilter::PLAYER));
        assert!(obstacle.interacts_with(&CollisionFilter::GROUND));
        assert!(!obstacle.interacts_with(&CollisionFilter::WALL));
        assert!(!obstacle.interacts_with(&CollisionFilter::OBSTACLE));
    }

    #[test]
    fn test_particles_touch_nothing() {
        let particle = CollisionFilter::PARTICLE;
        for other in [
            CollisionFilter::PLAYER,
            CollisionFilter::GROUND,
            CollisionFilter::WALL,
            CollisionFilter::OBSTACLE,
            CollisionFilter::PARTICLE,
        ] {
            assert!(!particle.interacts_with(&other));
        }
    }

    #[test]
    fn test_walls_block_player() {
        assert!(CollisionFilter::WALL.interacts_with(&CollisionFilter::PLAYER));
    }
}
