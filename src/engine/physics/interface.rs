// Boundary between the controller and the dynamics engine that simulates it

use super::collision::CollisionGroups;
use glam::{Quat, Vec3};
use std::fmt::Debug;

/// One sphere of a compound body, relative to the body origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    pub offset: Vec3,
    pub radius: f32,
}

/// Everything needed to create a compound body
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundBodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub spheres: Vec<SphereShape>,
    /// Total mass, shared evenly between the spheres
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
    /// Keep the body upright; orientation is written by the controller
    pub lock_rotation: bool,
    pub group: CollisionGroups,
}

/// Pose feedback read back from the engine after it steps
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyFeedback {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Which collision groups a ray query may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayFilter {
    pub collision_mask: u32,
}

impl RayFilter {
    pub fn new(collision_mask: u32) -> Self {
        Self { collision_mask }
    }

    /// Hit anything except the given group
    pub fn excluding(group: CollisionGroups) -> Self {
        Self::new(group.excluded_mask())
    }
}

/// Result of a closest-hit ray query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayHit {
    pub has_hit: bool,
    /// Distance from the ray origin; zero when nothing was hit
    pub distance: f32,
}

impl RayHit {
    pub const MISS: Self = Self {
        has_hit: false,
        distance: 0.0,
    };

    pub fn at(distance: f32) -> Self {
        Self {
            has_hit: true,
            distance,
        }
    }
}

/// Dynamics engine collaborator.
///
/// The controller never steps the engine itself; the host steps it, and the
/// controller reads feedback and writes velocity/orientation once per tick.
pub trait PhysicsEngine {
    type BodyId: Copy + Debug;

    fn create_compound_body(&mut self, desc: &CompoundBodyDesc) -> Self::BodyId;

    fn remove_body(&mut self, body: Self::BodyId);

    fn set_velocity(&mut self, body: Self::BodyId, velocity: Vec3);

    fn copy_orientation(&mut self, body: Self::BodyId, rotation: Quat);

    /// Latest position/velocity, or None if the body no longer exists
    fn feedback(&self, body: Self::BodyId) -> Option<BodyFeedback>;

    /// Closest hit along the segment `from` → `to`
    fn cast_closest(&self, from: Vec3, to: Vec3, filter: RayFilter) -> RayHit;
}
