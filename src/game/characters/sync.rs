// Keeps the character's physics body and scene transform in agreement

use super::state::AnimationName;
use super::stats::CharacterProps;
use crate::engine::physics::{presets, BodyFeedback, CollisionGroups, PhysicsEngine, RayFilter};
use crate::engine::scene::Transform;
use glam::{Quat, Vec3};

/// Upward speed given to a jump that starts on the ground
pub const JUMP_IMPULSE: f32 = 8.0;

/// Vertical speed below which the body counts as resting
pub const GROUNDED_VELOCITY_EPSILON: f32 = 0.01;

/// Length of the downward ground probe
pub const GROUND_PROBE_LENGTH: f32 = 0.2;

/// Velocity to write to the body this tick.
///
/// Horizontal travel is `movement` (model space) rotated by the model
/// orientation and scaled to `speed`; vertical speed is left to the
/// engine unless a jump starts from rest.
pub fn resolve_velocity(
    movement: Vec3,
    model_rotation: Quat,
    speed: f32,
    feedback_velocity: Vec3,
    animation: AnimationName,
) -> Vec3 {
    let horizontal = model_rotation * movement * speed;
    let mut vertical = feedback_velocity.y;
    if animation == AnimationName::Jump && vertical.abs() < GROUNDED_VELOCITY_EPSILON {
        vertical = JUMP_IMPULSE;
    }
    Vec3::new(horizontal.x, vertical, horizontal.z)
}

/// Owns the character's compound body in a [`PhysicsEngine`]
#[derive(Debug)]
pub struct PhysicsSyncBridge<B> {
    body: B,
    feedback: BodyFeedback,
}

impl<B: Copy + std::fmt::Debug> PhysicsSyncBridge<B> {
    /// Create the character capsule at the spawn transform
    pub fn attach<P>(physics: &mut P, props: &CharacterProps, spawn: Transform) -> Self
    where
        P: PhysicsEngine<BodyId = B>,
    {
        let mut desc = presets::character_capsule(props.radius);
        desc.position = spawn.position;
        desc.rotation = spawn.rotation;
        let body = physics.create_compound_body(&desc);
        log::debug!("Created character body {:?} (radius {})", body, props.radius);

        Self {
            body,
            feedback: BodyFeedback {
                position: spawn.position,
                velocity: Vec3::ZERO,
            },
        }
    }

    pub fn body(&self) -> B {
        self.body
    }

    /// Last feedback read from the engine
    pub fn feedback(&self) -> BodyFeedback {
        self.feedback
    }

    /// Read the body's pose; the previous value is kept if the body is gone
    pub fn pull<P>(&mut self, physics: &P) -> BodyFeedback
    where
        P: PhysicsEngine<BodyId = B>,
    {
        match physics.feedback(self.body) {
            Some(feedback) => self.feedback = feedback,
            None => log::warn!("Character body {:?} is missing", self.body),
        }
        self.feedback
    }

    /// Short downward ray under the body, ignoring the character itself
    pub fn probe_ground<P>(&self, physics: &P) -> bool
    where
        P: PhysicsEngine<BodyId = B>,
    {
        let from = self.feedback.position;
        let to = from - Vec3::Y * GROUND_PROBE_LENGTH;
        physics
            .cast_closest(from, to, RayFilter::excluding(CollisionGroups::Character))
            .has_hit
    }

    /// Write velocity and orientation to the body
    pub fn push<P>(&self, physics: &mut P, velocity: Vec3, rotation: Quat)
    where
        P: PhysicsEngine<BodyId = B>,
    {
        physics.set_velocity(self.body, velocity);
        physics.copy_orientation(self.body, rotation);
    }

    pub fn detach<P>(self, physics: &mut P)
    where
        P: PhysicsEngine<BodyId = B>,
    {
        log::debug!("Removing character body {:?}", self.body);
        physics.remove_body(self.body);
    }
}
