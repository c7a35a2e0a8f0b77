//! Physics collaborator
//!
//! Everything rigid-body related lives behind this module: body creation,
//! velocity commands, ray queries, fixed-step integration and contact-start
//! notification. The simulation never touches rapier types beyond handles.

pub mod category;
mod world;

pub use category::{CollisionCategory, CollisionFilter};
pub use world::{BodyProps, ContactStart, PhysicsWorld};

pub use rapier2d::prelude::RigidBodyHandle;
