// Movement resolution: held inputs → travel direction and model yaw

use crate::core::math::signed_angle_between;
use crate::engine::input::InputState;
use glam::Vec3;
use std::f32::consts::PI;

/// Model-space forward axis
pub const FORWARD: Vec3 = Vec3::Z;

/// Yaw increment used while a discrete turn is active
pub const TURN_STEP: f32 = PI / 8.0;

/// Derived per tick, never stored
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementResolution {
    /// Unit vector in the model's XZ plane, or zero
    pub movement_direction: Vec3,
    /// Yaw of the inner character mesh relative to the model group
    pub model_yaw: f32,
    /// -1 turning left, 1 turning right, 0 otherwise
    pub rotation_direction: i8,
}

/// Resolve a full movement description from an input snapshot
pub fn resolve(input: &InputState) -> MovementResolution {
    MovementResolution {
        movement_direction: movement_direction(input),
        model_yaw: model_yaw(input),
        rotation_direction: rotation_direction(input),
    }
}

/// Discrete turn direction. Only active without mouse-look; with both
/// left and right held the right key wins.
pub fn rotation_direction(input: &InputState) -> i8 {
    let mut direction = 0;
    if !input.is_mouse_looking {
        if input.left {
            direction = -1;
        }
        if input.right {
            direction = 1;
        }
    }
    direction
}

/// Travel direction in model space. Sideways travel (strafing) only
/// happens while mouse-looking; otherwise left/right turn the model.
pub fn movement_direction(input: &InputState) -> Vec3 {
    let strafe_right = if input.is_mouse_looking && input.right { -1.0 } else { 0.0 };
    let strafe_left = if input.is_mouse_looking && input.left { 1.0 } else { 0.0 };
    let forward = if input.up { 1.0 } else { 0.0 };
    let backward = if input.down { -1.0 } else { 0.0 };

    Vec3::new(strafe_right + strafe_left, 0.0, forward + backward).normalize_or_zero()
}

/// Yaw that turns the character mesh toward a diagonal travel direction
pub fn model_yaw(input: &InputState) -> f32 {
    let forward_xor_back = input.up != input.down;
    let sideways = input.left || input.right;
    if !(forward_xor_back && sideways && input.is_mouse_looking) {
        return 0.0;
    }

    let rotation = rotation_direction(input);
    let direction = movement_direction(input);
    let angle = signed_angle_between(direction, FORWARD, Vec3::Y);
    let discrete = TURN_STEP * f32::from(rotation) * -1.0;

    if input.up {
        if rotation == 0 {
            -angle
        } else {
            discrete
        }
    } else if rotation != 0 {
        discrete
    } else if direction.x != 0.0 {
        PI - angle
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn input(f: impl FnOnce(&mut InputState)) -> InputState {
        let mut state = InputState::default();
        f(&mut state);
        state
    }

    #[test]
    fn test_no_keys_is_zero() {
        let r = resolve(&InputState::default());
        assert_eq!(r.movement_direction, Vec3::ZERO);
        assert_eq!(r.model_yaw, 0.0);
        assert_eq!(r.rotation_direction, 0);
    }

    #[test]
    fn test_direction_is_unit_or_zero() {
        for bits in 0u8..32 {
            let state = InputState {
                up: bits & 1 != 0,
                down: bits & 2 != 0,
                left: bits & 4 != 0,
                right: bits & 8 != 0,
                is_mouse_looking: bits & 16 != 0,
                ..Default::default()
            };
            let length = movement_direction(&state).length();
            assert!(
                length == 0.0 || (length - 1.0).abs() < 1e-6,
                "bits {bits:05b} gave length {length}"
            );
        }
    }

    #[test]
    fn test_turning_without_mouse_look() {
        let left = input(|s| s.left = true);
        assert_eq!(rotation_direction(&left), -1);
        assert_eq!(movement_direction(&left), Vec3::ZERO);

        let right = input(|s| s.right = true);
        assert_eq!(rotation_direction(&right), 1);
    }

    #[test]
    fn test_left_and_right_last_writer_wins() {
        let both = input(|s| {
            s.left = true;
            s.right = true;
        });
        assert_eq!(rotation_direction(&both), 1);
    }

    #[test]
    fn test_mouse_look_disables_turning() {
        let state = input(|s| {
            s.left = true;
            s.is_mouse_looking = true;
        });
        assert_eq!(rotation_direction(&state), 0);
        assert_eq!(movement_direction(&state), Vec3::X);
    }

    #[test]
    fn test_forward_strafe_left_diagonal() {
        let state = input(|s| {
            s.up = true;
            s.left = true;
            s.is_mouse_looking = true;
        });
        let r = resolve(&state);

        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert_relative_eq!(r.movement_direction, expected, epsilon = 1e-6);
        assert_relative_eq!(r.model_yaw, FRAC_PI_4, epsilon = 1e-5);
    }

    #[test]
    fn test_backward_strafe_faces_away() {
        let state = input(|s| {
            s.down = true;
            s.right = true;
            s.is_mouse_looking = true;
        });
        let r = resolve(&state);

        // Travel is (-1, 0, -1); the mesh turns to face it
        let facing = glam::Quat::from_rotation_y(r.model_yaw) * FORWARD;
        assert!(r.model_yaw.abs() > 0.0);
        assert_relative_eq!(facing.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(facing.z.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_no_yaw_without_diagonal() {
        let forward_only = input(|s| {
            s.up = true;
            s.is_mouse_looking = true;
        });
        assert_eq!(model_yaw(&forward_only), 0.0);

        let both_vertical = input(|s| {
            s.up = true;
            s.down = true;
            s.left = true;
            s.is_mouse_looking = true;
        });
        assert_eq!(model_yaw(&both_vertical), 0.0);

        let no_mouse_look = input(|s| {
            s.up = true;
            s.left = true;
        });
        assert_eq!(model_yaw(&no_mouse_look), 0.0);
    }
}
