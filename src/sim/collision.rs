//! Terminal-state detection
//!
//! Lethality is decided by obstacle-collection membership, not by collision
//! category: walls carry their own category but never end an episode.

use super::registry::EntityRegistry;
use crate::physics::ContactStart;

/// First contact pair between the player and a live obstacle, if any
///
/// Later lethal pairs in the same step are ignored, so one death produces one
/// burst no matter how many obstacles the player touched at once.
pub fn first_lethal_contact(contacts: &[ContactStart], registry: &EntityRegistry) -> Option<ContactStart> {
    let player = registry.player().ok()?;
    contacts.iter().copied().find(|contact| {
        contact
            .other(player)
            .is_some_and(|other| registry.is_obstacle(other))
    })
}
