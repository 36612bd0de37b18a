// Minimal scene-node transform shared with the host renderer

use glam::{Quat, Vec3};

/// Position and orientation of a scene node in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transform facing a yaw angle (radians about +Y)
    pub fn from_yaw(position: Vec3, yaw: f32) -> Self {
        Self::new(position, Quat::from_rotation_y(yaw))
    }

    /// Rotate in place about the node's local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Map a point from node-local space to world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Map a direction from node-local space to world space
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_y_accumulates() {
        let mut t = Transform::default();
        t.rotate_y(FRAC_PI_2);
        t.rotate_y(FRAC_PI_2);

        let forward = t.transform_vector(Vec3::Z);
        assert_relative_eq!(forward.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point() {
        let t = Transform::from_yaw(Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        let p = t.transform_point(Vec3::Z);
        // +Z turned a quarter about +Y lands on +X
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
    }
}
