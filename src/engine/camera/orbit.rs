// Orbit camera rig: spherical coordinates around a moving anchor

use super::options::CameraOptions;
use super::PlatformRequest;
use crate::core::math::{clamp_to_bounds, ordered_bounds, Spherical};
use crate::engine::input::{PointerEvent, PointerKind};
use crate::engine::physics::RayHit;
use crate::engine::scene::Transform;
use crate::engine::timer::Timers;
use glam::{Mat4, Quat, Vec2, Vec3};
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::time::Instant;

/// Per-notch wheel zoom factor, raised to the zoom speed
pub const ZOOM_BASE: f32 = 0.95;

/// Gap kept between the camera and obstructing geometry.
/// Also the closest a collision may pull the camera toward its anchor.
pub const COLLISION_MARGIN: f32 = 0.1;

/// Azimuth the orbit is re-centred to while mouse-looking
const MOUSE_LOOK_AZIMUTH: f32 = PI;

/// Current pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOperation {
    None,
    Rotate,
    TouchRotate,
    TouchZoomRotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CameraTimer {
    PointerLockRecheck,
}

/// Resolved camera placement for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn forward(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or_zero()
    }
}

/// Third-person orbit camera.
///
/// Pointer and wheel handlers only mutate this struct; the per-tick
/// `update` applies limits and produces the pose. Side effects on the host
/// window are queued as `PlatformRequest`s.
#[derive(Debug)]
pub struct OrbitCamera {
    pub(super) options: CameraOptions,
    pub(super) enabled: bool,
    pub(super) spherical: Spherical,
    distance_bounds: (f32, f32),
    polar_bounds: (f32, f32),

    pub(super) operation: CameraOperation,
    /// Pointers currently down, in press order
    pub(super) pointers: Vec<PointerEvent>,
    /// Last known positions of touch pointers
    pub(super) pointer_positions: HashMap<(PointerKind, u64), Vec2>,
    pub(super) rotate_start: Vec2,
    pub(super) rotate_end: Vec2,
    pub(super) zoom_start: f32,

    pub(super) is_mouse_looking: bool,
    pub(super) is_pointer_locked: bool,
    pub(super) lock_requested: bool,
    pub(super) pointer_lock_denied: bool,

    viewport: Vec2,
    pub(super) timers: Timers<CameraTimer>,
    requests: Vec<PlatformRequest>,
    pose: CameraPose,
}

impl OrbitCamera {
    /// Create a rig for a surface of `viewport` pixels
    pub fn new(options: CameraOptions, viewport: Vec2) -> Self {
        if options.min_distance > options.max_distance {
            log::warn!(
                "Camera min distance {} exceeds max distance {}, swapping",
                options.min_distance,
                options.max_distance
            );
        }
        if options.min_polar_angle > options.max_polar_angle {
            log::warn!("Camera polar angle limits are reversed, swapping");
        }

        Self {
            distance_bounds: ordered_bounds(options.min_distance, options.max_distance),
            polar_bounds: ordered_bounds(options.min_polar_angle, options.max_polar_angle),
            spherical: options.initial,
            options,
            enabled: true,
            operation: CameraOperation::None,
            pointers: Vec::new(),
            pointer_positions: HashMap::new(),
            rotate_start: Vec2::ZERO,
            rotate_end: Vec2::ZERO,
            zoom_start: 0.0,
            is_mouse_looking: false,
            is_pointer_locked: false,
            lock_requested: false,
            pointer_lock_denied: false,
            viewport,
            timers: Timers::new(),
            requests: Vec::new(),
            pose: CameraPose {
                position: Vec3::ZERO,
                look_at: Vec3::ZERO,
            },
        }
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn set_spherical(&mut self, spherical: Spherical) {
        self.spherical = spherical;
    }

    pub fn radius(&self) -> f32 {
        self.spherical.radius
    }

    pub fn operation(&self) -> CameraOperation {
        self.operation
    }

    /// True while a mouse-look drag or touch gesture steers the anchor
    pub fn is_mouse_looking(&self) -> bool {
        self.is_mouse_looking
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.is_pointer_locked
    }

    /// True once the platform refused pointer lock
    pub fn is_pointer_lock_denied(&self) -> bool {
        self.pointer_lock_denied
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Pose produced by the last update
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Orbit centre: the target origin raised by the y-offset
    pub fn anchor(&self, target: &Transform) -> Vec3 {
        target.transform_point(self.offset())
    }

    /// Where the camera would sit with nothing in the way
    pub fn desired_position(&self, target: &Transform) -> Vec3 {
        self.anchor(target) + target.transform_vector(self.spherical.to_vec3())
    }

    fn offset(&self) -> Vec3 {
        Vec3::new(0.0, self.options.y_offset, 0.0)
    }

    /// Apply limits, fire due timers and resolve the pose.
    ///
    /// While mouse-looking, the azimuth is baked into the target's yaw and
    /// the orbit is re-centred behind it.
    pub fn update(&mut self, target: &mut Transform, ray: RayHit, now: Instant) -> CameraPose {
        for timer in self.timers.poll(now) {
            match timer {
                CameraTimer::PointerLockRecheck => self.recheck_pointer_lock(),
            }
        }

        if self.is_mouse_looking {
            let turn = Quat::from_rotation_y(self.spherical.theta - MOUSE_LOOK_AZIMUTH);
            target.rotation = (target.rotation * turn).normalize();
            self.spherical.theta = MOUSE_LOOK_AZIMUTH;
        }

        let (min_phi, max_phi) = self.polar_bounds;
        self.spherical.phi = clamp_to_bounds(self.spherical.phi, min_phi, max_phi);
        self.spherical.make_safe();

        let (min_distance, max_distance) = self.distance_bounds;
        self.spherical.radius = clamp_to_bounds(self.spherical.radius, min_distance, max_distance);

        let anchor = self.anchor(target);
        let radius = if ray.has_hit && self.options.collision_enabled {
            (ray.distance - COLLISION_MARGIN)
                .min(self.spherical.radius)
                .max(COLLISION_MARGIN)
        } else {
            self.spherical.radius
        };

        self.pose = CameraPose {
            position: anchor + target.transform_vector(self.spherical.with_radius(radius)),
            look_at: target.position + self.offset(),
        };
        self.pose
    }

    fn recheck_pointer_lock(&mut self) {
        if !self.is_pointer_locked {
            log::debug!("Pointer lock lost, leaving mouse-look");
            self.is_mouse_looking = false;
            self.operation = CameraOperation::None;
        }
    }

    pub fn zoom_scale(&self) -> f32 {
        ZOOM_BASE.powf(self.options.zoom_speed)
    }

    pub fn zoom_in(&mut self, scale: f32) {
        self.spherical.radius *= scale;
    }

    pub fn zoom_out(&mut self, scale: f32) {
        if scale > 0.0 {
            self.spherical.radius /= scale;
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical.phi -= angle;
    }

    /// Turn the accumulated drag into orbit angles.
    /// Both axes are normalized by the viewport height.
    pub(super) fn apply_rotate(&mut self, speed_multiplier: f32) {
        let delta =
            (self.rotate_end - self.rotate_start) * self.options.rotate_speed * speed_multiplier;
        let height = self.viewport.y;

        if height > 0.0 {
            self.rotate_left(TAU * delta.x / height);
            self.rotate_up(TAU * delta.y / height);
        }

        self.rotate_start = self.rotate_end;
    }

    pub(super) fn push_request(&mut self, request: PlatformRequest) {
        self.requests.push(request);
    }

    /// Requests queued since the last drain, oldest first
    pub fn pending_requests(&self) -> &[PlatformRequest] {
        &self.requests
    }

    pub fn drain_requests(&mut self) -> Vec<PlatformRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Drop every gesture and give the cursor back
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.pointer_positions.clear();
        self.operation = CameraOperation::None;
        self.is_mouse_looking = false;
        self.lock_requested = false;
        self.push_request(PlatformRequest::RestoreCursor);
        self.push_request(PlatformRequest::ExitPointerLock);
    }

    /// Cancel pending timers and gestures; nothing fires afterwards
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraOptions::default(), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_default_pose_behind_and_above() {
        let mut cam = camera();
        let mut target = Transform::default();
        let pose = cam.update(&mut target, RayHit::MISS, Instant::now());

        // theta = π puts the camera on -Z, phi = π/3 above the anchor
        assert!(pose.position.z < 0.0);
        assert!(pose.position.y > 1.6);
        assert_relative_eq!(pose.look_at, Vec3::new(0.0, 1.6, 0.0));
        assert_relative_eq!((pose.position - pose.look_at).length(), 3.5, epsilon = 1e-4);
    }

    #[test]
    fn test_radius_clamped_to_bounds() {
        let mut cam = OrbitCamera::new(
            CameraOptions::default().with_distance(2.0, 10.0),
            Vec2::new(800.0, 600.0),
        );
        cam.set_spherical(Spherical::new(50.0, 1.0, PI));
        cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        assert_relative_eq!(cam.radius(), 10.0);

        cam.set_spherical(Spherical::new(0.1, 1.0, PI));
        cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        assert_relative_eq!(cam.radius(), 2.0);
    }

    #[test]
    fn test_reversed_bounds_repaired() {
        let mut cam = OrbitCamera::new(
            CameraOptions::default().with_distance(10.0, 2.0),
            Vec2::new(800.0, 600.0),
        );
        cam.set_spherical(Spherical::new(50.0, 1.0, PI));
        cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        assert_relative_eq!(cam.radius(), 10.0);
    }

    #[test]
    fn test_polar_angle_clamped_and_safe() {
        let mut options = CameraOptions::default();
        options.min_polar_angle = 0.2;
        options.max_polar_angle = 1.2;
        let mut cam = OrbitCamera::new(options, Vec2::new(800.0, 600.0));

        cam.set_spherical(Spherical::new(3.0, 3.0, PI));
        cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        assert_relative_eq!(cam.spherical().phi, 1.2);

        let mut cam = camera();
        cam.set_spherical(Spherical::new(3.0, 0.0, PI));
        cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        assert!(cam.spherical().phi > 0.0);
    }

    #[test]
    fn test_collision_pulls_camera_in() {
        let mut cam = camera();
        let mut target = Transform::default();
        let pose = cam.update(&mut target, RayHit::at(1.1), Instant::now());

        let distance = (pose.position - cam.anchor(&target)).length();
        assert_relative_eq!(distance, 1.0, epsilon = 1e-4);
        // The orbit itself is untouched
        assert_relative_eq!(cam.radius(), 3.5);
    }

    #[test]
    fn test_close_hit_keeps_camera_off_anchor() {
        let mut cam = camera();
        let mut target = Transform::default();
        let pose = cam.update(&mut target, RayHit::at(0.05), Instant::now());

        let gap = (pose.position - cam.anchor(&target)).length();
        assert_relative_eq!(gap, COLLISION_MARGIN, epsilon = 1e-5);
        assert!(!pose.view_matrix().is_nan());
    }

    #[test]
    fn test_collision_disabled_ignores_hits() {
        let mut cam = OrbitCamera::new(
            CameraOptions::default().with_collision(false),
            Vec2::new(800.0, 600.0),
        );
        let mut target = Transform::default();
        let pose = cam.update(&mut target, RayHit::at(1.1), Instant::now());
        assert_relative_eq!((pose.position - cam.anchor(&target)).length(), 3.5, epsilon = 1e-4);
    }

    #[test]
    fn test_mouse_look_bakes_azimuth_into_target() {
        let mut cam = camera();
        cam.is_mouse_looking = true;
        cam.rotate_left(0.5);

        let mut target = Transform::default();
        cam.update(&mut target, RayHit::MISS, Instant::now());

        assert_relative_eq!(cam.spherical().theta, PI);
        let forward = target.transform_vector(Vec3::Z);
        let expected = Quat::from_rotation_y(-0.5) * Vec3::Z;
        assert_relative_eq!(forward, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_apply_rotate_uses_viewport_height() {
        let mut cam = camera();
        cam.rotate_start = Vec2::ZERO;
        cam.rotate_end = Vec2::new(600.0, 0.0);
        cam.apply_rotate(1.0);

        assert_relative_eq!(cam.spherical().theta, PI - TAU, epsilon = 1e-5);
        assert_eq!(cam.rotate_start, cam.rotate_end);
    }

    #[test]
    fn test_view_matrix_looks_at_anchor() {
        let mut cam = camera();
        let pose = cam.update(&mut Transform::default(), RayHit::MISS, Instant::now());
        let view = pose.view_matrix();
        let anchor_in_view = view.transform_point3(pose.look_at);

        assert!(anchor_in_view.z < 0.0);
        assert_relative_eq!(anchor_in_view.x, 0.0, epsilon = 1e-4);
    }
}
