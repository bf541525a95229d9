// Physics system using rapier2d
//
// Actors live on a top-down ground plane. Hitboxes are sensor colliders that
// stay disabled until an attack window opens them.

pub mod body;
mod collision;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups};
pub use world::{ColliderTag, PhysicsWorld};

pub use rapier2d::prelude::{Real, Vector};
