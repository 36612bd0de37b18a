// Pointer, wheel and pointer-lock handling for the orbit camera

use super::orbit::{CameraOperation, CameraTimer, OrbitCamera};
use super::PlatformRequest;
use crate::engine::input::{
    EventClock, EventKind, EventRegistry, InputEvent, PointerButton, PointerEvent,
};
use glam::Vec2;
use std::time::{Duration, Instant};

/// Subscription key used by the camera rig
pub const CAMERA_KEY: &str = "camera";

/// Delay before an unlock report is trusted
pub const POINTER_LOCK_RECHECK: Duration = Duration::from_millis(100);

/// Scale applied to raw motion while the pointer is locked
const LOCKED_MOTION_SCALE: Vec2 = Vec2::new(0.25, 0.25 * 0.8);

/// Rotation speed multiplier for touch drags
const TOUCH_ROTATE_MULTIPLIER: f32 = 1.3;

const EVENT_KINDS: [EventKind; 8] = [
    EventKind::Wheel,
    EventKind::PointerLockChange,
    EventKind::PointerDown,
    EventKind::PointerUp,
    EventKind::PointerMove,
    EventKind::PointerCancel,
    EventKind::PointerLockError,
    EventKind::ContextMenu,
];

impl OrbitCamera {
    /// Subscribe the camera's handlers on `registry`
    pub fn register<S>(registry: &mut EventRegistry<S>)
    where
        S: AsMut<OrbitCamera> + EventClock + 'static,
    {
        for kind in EVENT_KINDS {
            registry.subscribe(kind, CAMERA_KEY, |target: &mut S, event| {
                let now = target.now();
                target.as_mut().handle_event(event, now);
            });
        }
    }

    pub fn unregister<S>(registry: &mut EventRegistry<S>) {
        for kind in EVENT_KINDS {
            registry.unsubscribe(kind, CAMERA_KEY);
        }
    }

    /// Apply a device event received at `now`
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) {
        match event {
            InputEvent::PointerDown(pointer) => self.on_pointer_down(pointer),
            InputEvent::PointerMove(pointer) => self.on_pointer_move(pointer),
            InputEvent::PointerUp(pointer) => self.on_pointer_up(pointer),
            InputEvent::PointerCancel(pointer) => self.remove_pointer(pointer),
            InputEvent::Wheel { delta_y } => self.on_wheel(*delta_y),
            InputEvent::PointerLockChange { locked } => self.on_pointer_lock_change(*locked, now),
            InputEvent::PointerLockError => self.on_pointer_lock_error(),
            InputEvent::ContextMenu => {
                if self.enabled {
                    self.push_request(PlatformRequest::SuppressContextMenu);
                }
            }
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => {}
        }
    }

    fn on_pointer_down(&mut self, pointer: &PointerEvent) {
        if !self.enabled {
            return;
        }

        if self.pointers.is_empty() {
            self.push_request(PlatformRequest::CapturePointer(pointer.pointer_id));
        }
        self.add_pointer(pointer);

        if pointer.is_touch() {
            self.on_touch_start(pointer);
        } else {
            self.on_mouse_down(pointer);
        }
    }

    fn on_pointer_move(&mut self, pointer: &PointerEvent) {
        if !self.enabled {
            return;
        }
        if !self.is_tracked(pointer) {
            return;
        }

        if pointer.is_touch() {
            self.on_touch_move(pointer);
        } else {
            self.on_mouse_move(pointer);
        }
    }

    fn on_pointer_up(&mut self, pointer: &PointerEvent) {
        if pointer.is_touch() {
            self.operation = CameraOperation::None;
        } else {
            self.on_mouse_up();
        }

        self.remove_pointer(pointer);

        if self.pointers.is_empty() && pointer.is_touch() {
            self.is_mouse_looking = false;
            self.push_request(PlatformRequest::ReleasePointer(pointer.pointer_id));
        }
    }

    fn on_wheel(&mut self, delta_y: f32) {
        if !self.enabled || !self.options.enable_zoom {
            return;
        }

        if delta_y < 0.0 {
            self.zoom_in(self.zoom_scale());
        } else if delta_y > 0.0 {
            self.zoom_out(self.zoom_scale());
        }
    }

    // Mouse

    fn on_mouse_down(&mut self, pointer: &PointerEvent) {
        match pointer.button {
            Some(PointerButton::Primary) => {
                if !self.options.enable_rotate {
                    return;
                }
                self.begin_rotate(pointer.position);
                self.operation = CameraOperation::Rotate;
            }
            Some(PointerButton::Secondary) => {
                if !self.options.enable_rotate {
                    return;
                }
                self.is_mouse_looking = true;
                self.request_pointer_lock();
                self.begin_rotate(pointer.position);
                self.operation = CameraOperation::Rotate;
            }
            _ => self.operation = CameraOperation::None,
        }
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) {
        if self.operation != CameraOperation::Rotate || !self.options.enable_rotate {
            return;
        }

        if self.is_pointer_locked {
            self.rotate_end += pointer.movement * LOCKED_MOTION_SCALE;
        } else {
            self.request_pointer_lock();
            self.rotate_end = pointer.position;
        }
        self.apply_rotate(1.0);
    }

    fn on_mouse_up(&mut self) {
        self.push_request(PlatformRequest::RestoreCursor);
        self.push_request(PlatformRequest::ExitPointerLock);
        self.lock_requested = false;
        self.is_mouse_looking = false;
        self.operation = CameraOperation::None;
    }

    fn begin_rotate(&mut self, position: Vec2) {
        self.rotate_start = position;
        self.rotate_end = position;
    }

    fn request_pointer_lock(&mut self) {
        if self.pointer_lock_denied || self.lock_requested || self.is_pointer_locked {
            return;
        }
        self.lock_requested = true;
        self.push_request(PlatformRequest::RequestPointerLock);
        self.push_request(PlatformRequest::HideCursor);
    }

    fn on_pointer_lock_change(&mut self, locked: bool, now: Instant) {
        self.is_pointer_locked = locked;
        self.lock_requested = false;

        if locked {
            self.timers.cancel(CameraTimer::PointerLockRecheck);
        } else {
            // Unlock reports can be spurious right after a lock request
            self.timers
                .schedule(CameraTimer::PointerLockRecheck, now, POINTER_LOCK_RECHECK);
        }
    }

    fn on_pointer_lock_error(&mut self) {
        log::warn!("Pointer lock denied, falling back to absolute pointer deltas");
        self.pointer_lock_denied = true;
        self.lock_requested = false;
        self.is_pointer_locked = false;
        self.push_request(PlatformRequest::RestoreCursor);
    }

    // Touch

    fn on_touch_start(&mut self, pointer: &PointerEvent) {
        self.track_pointer(pointer);

        match self.pointers.len() {
            1 => {
                if !self.options.enable_rotate {
                    return;
                }
                self.rotate_start = self.gesture_centre();
                self.is_mouse_looking = true;
                self.operation = CameraOperation::TouchRotate;
            }
            2 => {
                if !self.options.enable_zoom && !self.options.enable_rotate {
                    return;
                }
                if self.options.enable_zoom {
                    self.zoom_start = self.pointer_separation();
                }
                if self.options.enable_rotate {
                    self.rotate_start = self.gesture_centre();
                }
                self.is_mouse_looking = true;
                self.operation = CameraOperation::TouchZoomRotate;
            }
            _ => self.operation = CameraOperation::None,
        }
    }

    fn on_touch_move(&mut self, pointer: &PointerEvent) {
        self.track_pointer(pointer);

        match self.operation {
            CameraOperation::TouchRotate => {
                if self.options.enable_rotate {
                    self.touch_move_rotate(pointer);
                }
            }
            CameraOperation::TouchZoomRotate => {
                if self.options.enable_zoom {
                    self.touch_move_zoom(pointer);
                }
                if self.options.enable_rotate {
                    self.touch_move_rotate(pointer);
                }
            }
            _ => self.operation = CameraOperation::None,
        }
    }

    fn touch_move_rotate(&mut self, pointer: &PointerEvent) {
        self.rotate_end = match self.second_pointer_position(pointer) {
            Some(second) if self.pointers.len() > 1 => (pointer.position + second) * 0.5,
            _ => pointer.position,
        };
        self.apply_rotate(TOUCH_ROTATE_MULTIPLIER);
    }

    fn touch_move_zoom(&mut self, pointer: &PointerEvent) {
        let Some(second) = self.second_pointer_position(pointer) else {
            return;
        };

        let distance = pointer.position.distance(second);
        if self.zoom_start > 0.0 && distance > 0.0 {
            let ratio = distance / self.zoom_start;
            self.zoom_out(ratio.powf(self.options.zoom_speed));
        }
        self.zoom_start = distance;
    }

    // Pointer bookkeeping

    fn add_pointer(&mut self, pointer: &PointerEvent) {
        if let Some(existing) = self
            .pointers
            .iter_mut()
            .find(|p| p.key() == pointer.key())
        {
            *existing = *pointer;
        } else {
            self.pointers.push(*pointer);
        }
    }

    fn remove_pointer(&mut self, pointer: &PointerEvent) {
        let key = pointer.key();
        self.pointer_positions.remove(&key);
        self.pointers.retain(|p| p.key() != key);
    }

    fn is_tracked(&self, pointer: &PointerEvent) -> bool {
        self.pointers.iter().any(|p| p.key() == pointer.key())
    }

    fn track_pointer(&mut self, pointer: &PointerEvent) {
        self.pointer_positions.insert(pointer.key(), pointer.position);
    }

    fn position_of(&self, pointer: &PointerEvent) -> Vec2 {
        self.pointer_positions
            .get(&pointer.key())
            .copied()
            .unwrap_or(pointer.position)
    }

    /// Position of the other pointer of a two-finger gesture
    fn second_pointer_position(&self, pointer: &PointerEvent) -> Option<Vec2> {
        self.pointers
            .iter()
            .find(|p| p.key() != pointer.key())
            .map(|p| self.position_of(p))
    }

    /// Single pointer position, or the midpoint of the first two
    fn gesture_centre(&self) -> Vec2 {
        match self.pointers.as_slice() {
            [] => Vec2::ZERO,
            [only] => self.position_of(only),
            [first, second, ..] => (self.position_of(first) + self.position_of(second)) * 0.5,
        }
    }

    fn pointer_separation(&self) -> f32 {
        match self.pointers.as_slice() {
            [first, second, ..] => self.position_of(first).distance(self.position_of(second)),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Spherical;
    use crate::engine::camera::CameraOptions;
    use crate::engine::physics::RayHit;
    use crate::engine::scene::Transform;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    /// Radians per pixel of horizontal drag on a 600 px tall surface
    const TAU_OVER_HEIGHT: f32 = std::f32::consts::TAU / 600.0;

    fn camera(options: CameraOptions) -> OrbitCamera {
        OrbitCamera::new(options, Vec2::new(800.0, 600.0))
    }

    fn touch(id: u64, x: f32, y: f32) -> PointerEvent {
        PointerEvent::touch(id, Vec2::new(x, y))
    }

    #[test]
    fn test_wheel_zoom_in_scenario() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default().with_distance(2.0, 10.0));
        cam.set_spherical(Spherical::new(5.0, 1.0, PI));

        cam.handle_event(&InputEvent::Wheel { delta_y: -1.0 }, now);
        cam.update(&mut Transform::default(), RayHit::MISS, now);

        assert_relative_eq!(cam.radius(), 5.0 * 0.95f32.powf(1.75), epsilon = 1e-5);
    }

    #[test]
    fn test_wheel_zoom_out_stays_in_bounds() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default().with_distance(2.0, 10.0));
        cam.set_spherical(Spherical::new(9.9, 1.0, PI));

        for _ in 0..20 {
            cam.handle_event(&InputEvent::Wheel { delta_y: 1.0 }, now);
        }
        cam.update(&mut Transform::default(), RayHit::MISS, now);
        assert_relative_eq!(cam.radius(), 10.0);
    }

    #[test]
    fn test_wheel_ignored_when_zoom_disabled() {
        let mut options = CameraOptions::default();
        options.enable_zoom = false;
        let mut cam = camera(options);

        cam.handle_event(&InputEvent::Wheel { delta_y: -1.0 }, Instant::now());
        assert_relative_eq!(cam.radius(), 3.5);
    }

    #[test]
    fn test_pinch_scenario() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default().with_distance(0.0, 100.0));
        cam.set_spherical(Spherical::new(20.0, 1.0, PI));

        cam.handle_event(&InputEvent::PointerDown(touch(1, 0.0, 0.0)), now);
        cam.handle_event(&InputEvent::PointerDown(touch(2, 10.0, 0.0)), now);
        assert_eq!(cam.operation(), CameraOperation::TouchZoomRotate);

        cam.handle_event(&InputEvent::PointerMove(touch(1, 0.0, 0.0)), now);
        cam.handle_event(&InputEvent::PointerMove(touch(2, 20.0, 0.0)), now);

        assert_relative_eq!(cam.radius(), 20.0 / 2.0f32.powf(1.75), epsilon = 1e-4);
    }

    #[test]
    fn test_two_finger_drag_rotates_by_midpoint() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default().with_distance(0.0, 100.0));

        cam.handle_event(&InputEvent::PointerDown(touch(1, 0.0, 0.0)), now);
        cam.handle_event(&InputEvent::PointerDown(touch(2, 10.0, 0.0)), now);
        cam.handle_event(&InputEvent::PointerMove(touch(2, 20.0, 0.0)), now);

        // Midpoint moved from (5, 0) to (10, 0)
        let expected = PI - TAU_OVER_HEIGHT * 5.0 * 1.3;
        assert_relative_eq!(cam.spherical().theta, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_touch_sharing_mouse_id_tracked_separately() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Primary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);
        cam.handle_event(
            &InputEvent::PointerDown(touch(down.pointer_id, 50.0, 50.0)),
            now,
        );
        assert_eq!(cam.pointer_count(), 2);

        cam.handle_event(&InputEvent::PointerCancel(touch(down.pointer_id, 50.0, 50.0)), now);
        assert_eq!(cam.pointer_count(), 1);
    }

    #[test]
    fn test_single_touch_rotates_and_mouse_looks() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());

        cam.handle_event(&InputEvent::PointerDown(touch(5, 100.0, 100.0)), now);
        assert_eq!(cam.operation(), CameraOperation::TouchRotate);
        assert!(cam.is_mouse_looking());

        cam.handle_event(&InputEvent::PointerMove(touch(5, 160.0, 100.0)), now);
        let expected = PI - TAU_OVER_HEIGHT * 60.0 * 1.3;
        assert_relative_eq!(cam.spherical().theta, expected, epsilon = 1e-5);

        cam.handle_event(&InputEvent::PointerUp(touch(5, 160.0, 100.0)), now);
        assert_eq!(cam.operation(), CameraOperation::None);
        assert!(!cam.is_mouse_looking());
        assert_eq!(
            cam.pending_requests().last(),
            Some(&PlatformRequest::ReleasePointer(5))
        );
    }

    #[test]
    fn test_secondary_button_starts_mouse_look() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Secondary, Vec2::new(10.0, 10.0));

        cam.handle_event(&InputEvent::PointerDown(down), now);

        assert!(cam.is_mouse_looking());
        assert_eq!(cam.operation(), CameraOperation::Rotate);
        assert_eq!(
            cam.drain_requests(),
            vec![
                PlatformRequest::CapturePointer(down.pointer_id),
                PlatformRequest::RequestPointerLock,
                PlatformRequest::HideCursor,
            ]
        );

        cam.handle_event(&InputEvent::PointerUp(down), now);
        assert!(!cam.is_mouse_looking());
        assert_eq!(cam.operation(), CameraOperation::None);
        assert!(cam
            .pending_requests()
            .contains(&PlatformRequest::ExitPointerLock));
    }

    #[test]
    fn test_middle_button_does_nothing() {
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Auxiliary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), Instant::now());
        assert_eq!(cam.operation(), CameraOperation::None);
    }

    #[test]
    fn test_locked_motion_is_scaled() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Primary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);
        cam.handle_event(&InputEvent::PointerLockChange { locked: true }, now);

        let motion = PointerEvent::mouse_move(Vec2::ZERO, Vec2::new(40.0, 0.0));
        cam.handle_event(&InputEvent::PointerMove(motion), now);

        // 40 px of raw motion counts as 10
        assert_relative_eq!(
            cam.spherical().theta,
            PI - TAU_OVER_HEIGHT * 10.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_moves_from_untracked_pointers_ignored() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let motion = PointerEvent::mouse_move(Vec2::new(300.0, 0.0), Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerMove(motion), now);
        assert_relative_eq!(cam.spherical().theta, PI);
    }

    #[test]
    fn test_unlock_recheck_exits_mouse_look() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Secondary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);
        cam.handle_event(&InputEvent::PointerLockChange { locked: false }, now);

        let mut target = Transform::default();
        cam.update(&mut target, RayHit::MISS, now + Duration::from_millis(50));
        assert!(cam.is_mouse_looking());

        cam.update(&mut target, RayHit::MISS, now + POINTER_LOCK_RECHECK);
        assert!(!cam.is_mouse_looking());
        assert_eq!(cam.operation(), CameraOperation::None);
    }

    #[test]
    fn test_relock_cancels_recheck() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        let down = PointerEvent::mouse(PointerButton::Secondary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);
        cam.handle_event(&InputEvent::PointerLockChange { locked: false }, now);
        cam.handle_event(
            &InputEvent::PointerLockChange { locked: true },
            now + Duration::from_millis(20),
        );

        cam.update(
            &mut Transform::default(),
            RayHit::MISS,
            now + Duration::from_millis(200),
        );
        assert!(cam.is_mouse_looking());
    }

    #[test]
    fn test_pointer_lock_error_degrades_to_absolute_drag() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        cam.handle_event(&InputEvent::PointerLockError, now);
        assert!(cam.is_pointer_lock_denied());
        cam.drain_requests();

        let down = PointerEvent::mouse(PointerButton::Secondary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);
        let motion = PointerEvent::mouse_move(Vec2::new(60.0, 0.0), Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerMove(motion), now);

        assert!(!cam
            .pending_requests()
            .contains(&PlatformRequest::RequestPointerLock));
        assert_relative_eq!(
            cam.spherical().theta,
            PI - TAU_OVER_HEIGHT * 60.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_context_menu_suppressed() {
        let mut cam = camera(CameraOptions::default());
        cam.handle_event(&InputEvent::ContextMenu, Instant::now());
        assert_eq!(
            cam.drain_requests(),
            vec![PlatformRequest::SuppressContextMenu]
        );
    }

    #[test]
    fn test_pointer_cancel_forgets_pointer() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default());
        cam.handle_event(&InputEvent::PointerDown(touch(1, 0.0, 0.0)), now);
        cam.handle_event(&InputEvent::PointerCancel(touch(1, 0.0, 0.0)), now);
        assert_eq!(cam.pointer_count(), 0);
    }

    #[test]
    fn test_camera_invariants_after_random_gestures() {
        let now = Instant::now();
        let mut cam = camera(CameraOptions::default().with_distance(2.0, 10.0));
        let down = PointerEvent::mouse(PointerButton::Primary, Vec2::ZERO);
        cam.handle_event(&InputEvent::PointerDown(down), now);

        let mut target = Transform::default();
        for i in 0..200 {
            let x = ((i * 37) % 900) as f32 - 450.0;
            let y = ((i * 53) % 700) as f32 - 350.0;
            let motion = PointerEvent::mouse_move(Vec2::new(x, y), Vec2::ZERO);
            cam.handle_event(&InputEvent::PointerMove(motion), now);
            let delta_y = if i % 3 == 0 { -1.0 } else { 1.0 };
            cam.handle_event(&InputEvent::Wheel { delta_y }, now);
            cam.update(&mut target, RayHit::MISS, now);

            let s = cam.spherical();
            assert!((2.0..=10.0).contains(&s.radius));
            assert!((0.0..=PI).contains(&s.phi));
        }
    }
}
