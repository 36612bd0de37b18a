use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::body::{from_vector, presets, to_rotation, to_vector};
use super::collision::ray_groups;
use super::interface::{BodyFeedback, CompoundBodyDesc, PhysicsEngine, RayFilter, RayHit};

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier3d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier3d::prelude::ColliderHandle;

/// Rays shorter than this report no hit
const MIN_RAY_LENGTH: Real = 1e-4;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts, refreshed on every step
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Add a static box of level geometry
    pub fn add_environment_box(&mut self, center: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let (body, collider) = presets::environment_box(center, half_extents);
        let handle = self.add_rigid_body(body);
        self.add_collider(collider, handle);
        handle
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Cast a ray and return the first hit along the segment
    pub fn raycast(&self, from: Vec3, to: Vec3, filter: QueryFilter) -> Option<Real> {
        let direction = to - from;
        let max_toi = direction.length();
        if max_toi < MIN_RAY_LENGTH {
            return None;
        }

        let ray = Ray::new(
            point![from.x, from.y, from.z],
            to_vector(direction / max_toi),
        );
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_toi,
                true,
                filter,
            )
            .map(|(_, toi)| toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for PhysicsWorld {
    type BodyId = RigidBodyHandle;

    fn create_compound_body(&mut self, desc: &CompoundBodyDesc) -> RigidBodyHandle {
        let (body, colliders) = presets::compound_body(desc);
        let handle = self.add_rigid_body(body);
        for collider in colliders {
            self.add_collider(collider, handle);
        }
        log::debug!(
            "Created compound body {:?} with {} spheres",
            handle,
            desc.spheres.len()
        );
        handle
    }

    fn remove_body(&mut self, body: RigidBodyHandle) {
        self.remove_rigid_body(body);
    }

    fn set_velocity(&mut self, body: RigidBodyHandle, velocity: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    fn copy_orientation(&mut self, body: RigidBodyHandle, rotation: Quat) {
        if let Some(rb) = self.rigid_body_set.get_mut(body) {
            rb.set_rotation(to_rotation(rotation), true);
        }
    }

    fn feedback(&self, body: RigidBodyHandle) -> Option<BodyFeedback> {
        self.rigid_body_set.get(body).map(|rb| BodyFeedback {
            position: from_vector(rb.translation()),
            velocity: from_vector(rb.linvel()),
        })
    }

    fn cast_closest(&self, from: Vec3, to: Vec3, filter: RayFilter) -> RayHit {
        let query = QueryFilter::new().groups(ray_groups(filter.collision_mask));
        self.raycast(from, to, query)
            .map_or(RayHit::MISS, RayHit::at)
    }
}
