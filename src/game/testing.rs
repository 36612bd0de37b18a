// Scripted physics engine for game-layer tests

use crate::engine::physics::{BodyFeedback, CompoundBodyDesc, PhysicsEngine, RayFilter, RayHit};
use glam::{Quat, Vec3};
use std::cell::RefCell;

#[derive(Debug)]
struct FakeBody {
    desc: CompoundBodyDesc,
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
}

/// Moves bodies by their velocity and answers rays from fixed settings
#[derive(Debug, Default)]
pub struct FakePhysics {
    bodies: Vec<Option<FakeBody>>,
    /// Answer for downward probes shorter than half a unit
    pub ground_hit: bool,
    /// Answer for every other ray
    pub camera_hit: Option<f32>,
    rays: RefCell<Vec<(Vec3, Vec3, RayFilter)>>,
}

impl FakePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().flatten() {
            body.position += body.velocity * dt;
        }
    }

    pub fn desc(&self, id: usize) -> Option<&CompoundBodyDesc> {
        self.body(id).map(|b| &b.desc)
    }

    pub fn velocity(&self, id: usize) -> Option<Vec3> {
        self.body(id).map(|b| b.velocity)
    }

    pub fn orientation(&self, id: usize) -> Option<Quat> {
        self.body(id).map(|b| b.rotation)
    }

    pub fn set_feedback_velocity(&mut self, id: usize, velocity: Vec3) {
        if let Some(Some(body)) = self.bodies.get_mut(id) {
            body.velocity = velocity;
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    pub fn last_ray(&self) -> Option<(Vec3, Vec3, RayFilter)> {
        self.rays.borrow().last().copied()
    }

    fn body(&self, id: usize) -> Option<&FakeBody> {
        self.bodies.get(id).and_then(Option::as_ref)
    }
}

impl PhysicsEngine for FakePhysics {
    type BodyId = usize;

    fn create_compound_body(&mut self, desc: &CompoundBodyDesc) -> usize {
        self.bodies.push(Some(FakeBody {
            desc: desc.clone(),
            position: desc.position,
            velocity: Vec3::ZERO,
            rotation: desc.rotation,
        }));
        self.bodies.len() - 1
    }

    fn remove_body(&mut self, body: usize) {
        if let Some(slot) = self.bodies.get_mut(body) {
            *slot = None;
        }
    }

    fn set_velocity(&mut self, body: usize, velocity: Vec3) {
        self.set_feedback_velocity(body, velocity);
    }

    fn copy_orientation(&mut self, body: usize, rotation: Quat) {
        if let Some(Some(b)) = self.bodies.get_mut(body) {
            b.rotation = rotation;
        }
    }

    fn feedback(&self, body: usize) -> Option<BodyFeedback> {
        self.body(body).map(|b| BodyFeedback {
            position: b.position,
            velocity: b.velocity,
        })
    }

    fn cast_closest(&self, from: Vec3, to: Vec3, filter: RayFilter) -> RayHit {
        self.rays.borrow_mut().push((from, to, filter));

        let delta = to - from;
        let is_ground_probe = delta.y < 0.0 && delta.length() < 0.5;
        if is_ground_probe {
            return if self.ground_hit {
                RayHit::at(delta.length())
            } else {
                RayHit::MISS
            };
        }

        match self.camera_hit {
            Some(distance) => RayHit::at(distance),
            None => RayHit::MISS,
        }
    }
}
