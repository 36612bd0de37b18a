// Camera rig configuration

use crate::core::math::Spherical;
use crate::engine::physics::CollisionGroups;
use std::f32::consts::PI;

/// Orbit camera configuration.
///
/// Bounds are not validated: a reversed range is repaired when the rig is
/// built and a warning is logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    /// Height of the orbit anchor above the character origin
    pub y_offset: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits, measured from straight up
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Collision mask for the camera's obstruction ray
    pub collision_layer: u32,
    /// Pull the camera in front of obstructing geometry
    pub collision_enabled: bool,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    /// Starting orbit: distance, polar angle, azimuth
    pub initial: Spherical,
}

impl CameraOptions {
    pub const DEFAULT: Self = Self {
        y_offset: 1.6,
        min_distance: 0.6,
        max_distance: 7.0,
        min_polar_angle: 0.0,
        max_polar_angle: PI,
        collision_layer: CollisionGroups::Environment.bits(),
        collision_enabled: true,
        enable_zoom: true,
        zoom_speed: 1.75,
        enable_rotate: true,
        rotate_speed: 1.0,
        initial: Spherical::new(3.5, PI / 3.0, PI),
    };

    pub fn with_distance(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_y_offset(mut self, y_offset: f32) -> Self {
        self.y_offset = y_offset;
        self
    }

    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.collision_enabled = enabled;
        self
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
