// Physics system using rapier3d

pub mod body;
mod collision;
mod interface;
mod probe;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder3D, RigidBodyHandle};
pub use collision::{ray_groups, CollisionGroups};
pub use interface::{
    BodyFeedback, CompoundBodyDesc, PhysicsEngine, RayFilter, RayHit, SphereShape,
};
pub use probe::{RayProbe, RAY_DECAY};
pub use world::PhysicsWorld;
