use super::collision::CollisionGroups;
use super::interface::{CompoundBodyDesc, SphereShape};
use glam::{Quat, Vec3};
use rapier3d::prelude::nalgebra::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;
use std::f32::consts::PI;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Sphere centres of the character capsule, as multiples of its radius
pub const CAPSULE_SPHERE_FACTORS: [f32; 3] = [1.0, 4.2, 2.7];

pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rotation(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Vec3,
    rotation: Quat,
    linvel: Vec3,
    linear_damping: Real,
    angular_damping: Real,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            gravity_scale: 0.0,
            can_sleep: false,
            ..Self::new_dynamic()
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the initial orientation
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, linvel: Vec3) -> Self {
        self.linvel = linvel;
        self
    }

    pub fn damping(mut self, linear: Real, angular: Real) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation on every axis (upright characters)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let isometry = Isometry::from_parts(
            to_vector(self.position).into(),
            to_rotation(self.rotation),
        );

        RigidBodyBuilder::new(self.body_type)
            .position(isometry)
            .linvel(to_vector(self.linvel))
            .linear_damping(self.linear_damping)
            .angular_damping(self.angular_damping)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder3D {
    shape: SharedShape,
    offset: Vec3,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    mass: Option<Real>,
}

impl ColliderBuilder3D {
    /// Create a box-shaped collider from half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::from_shape(SharedShape::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
        ))
    }

    /// Create a sphere-shaped collider
    pub fn ball(radius: Real) -> Self {
        Self::from_shape(SharedShape::ball(radius))
    }

    fn from_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            offset: Vec3::ZERO,
            collision_groups: CollisionGroups::Environment,
            friction: 0.5,
            restitution: 0.0,
            mass: None,
        }
    }

    /// Offset from the parent body's origin
    pub fn offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set mass directly instead of deriving it from density
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut builder = ColliderBuilder::new(self.shape)
            .translation(to_vector(self.offset))
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(self.restitution);

        if let Some(mass) = self.mass {
            builder = builder.mass(mass);
        }

        builder.build()
    }
}

/// Common body configurations
pub mod presets {
    use super::*;

    /// Compound capsule for a character of the given radius: three stacked
    /// undamped frictionless spheres, kept upright and turned half a circle
    pub fn character_capsule(radius: f32) -> CompoundBodyDesc {
        CompoundBodyDesc {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(PI),
            spheres: CAPSULE_SPHERE_FACTORS
                .iter()
                .map(|factor| SphereShape {
                    offset: Vec3::new(0.0, radius * factor, 0.0),
                    radius,
                })
                .collect(),
            mass: 0.2,
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 0.0,
            lock_rotation: true,
            group: CollisionGroups::Character,
        }
    }

    /// Rigid body and colliders for a compound body description
    pub fn compound_body(desc: &CompoundBodyDesc) -> (RigidBody, Vec<Collider>) {
        let mut body = BodyBuilder::new_dynamic()
            .position(desc.position)
            .rotation(desc.rotation)
            .damping(desc.linear_damping, desc.angular_damping)
            .can_sleep(false);
        if desc.lock_rotation {
            body = body.lock_rotation();
        }

        let sphere_mass = desc.mass / desc.spheres.len().max(1) as f32;
        let colliders = desc
            .spheres
            .iter()
            .map(|sphere| {
                ColliderBuilder3D::ball(sphere.radius)
                    .offset(sphere.offset)
                    .collision_groups(desc.group)
                    .friction(desc.friction)
                    .mass(sphere_mass)
                    .build()
            })
            .collect();

        (body.build(), colliders)
    }

    /// Static box of level geometry centred at `center`
    pub fn environment_box(center: Vec3, half_extents: Vec3) -> (RigidBody, Collider) {
        let body = BodyBuilder::new_fixed().position(center).build();
        let collider = ColliderBuilder3D::cuboid(half_extents)
            .collision_groups(CollisionGroups::Environment)
            .friction(0.3)
            .build();
        (body, collider)
    }
}
