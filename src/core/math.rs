// Math utilities: angles, spherical coordinates, defensive range handling

use glam::Vec3;
use std::f32::consts::PI;

/// Dot products within this distance of ±1 snap to exactly 0 or π
pub const DOT_DEAD_ZONE: f32 = 0.0005;

/// Smallest polar angle distance kept from the poles by `Spherical::make_safe`
const POLE_EPSILON: f32 = 0.000001;

/// Return `(min, max)` in ascending order.
///
/// Configuration values are never rejected; a reversed range is repaired
/// where it is used.
pub fn ordered_bounds(min: f32, max: f32) -> (f32, f32) {
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Clamp a value into a range that may have been configured backwards
pub fn clamp_to_bounds(value: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = ordered_bounds(min, max);
    value.max(lo).min(hi)
}

/// Unsigned angle between two unit vectors, in `[0, π]`.
///
/// Near-parallel and near-antiparallel inputs collapse to exactly 0 or π,
/// which also keeps `acos` inside its domain.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let dot = a.dot(b);

    if dot > 1.0 - DOT_DEAD_ZONE {
        0.0
    } else if dot < -1.0 + DOT_DEAD_ZONE {
        PI
    } else {
        dot.clamp(-1.0, 1.0).acos()
    }
}

/// Angle between two unit vectors, negative when `a × b` points away from `normal`
pub fn signed_angle_between(a: Vec3, b: Vec3, normal: Vec3) -> f32 {
    let angle = angle_between(a, b);
    if normal.dot(a.cross(b)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Spherical coordinates around an anchor point.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth measured
/// from +Z toward +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Keep `phi` strictly away from the poles so the look direction never
    /// becomes parallel to the up axis
    pub fn make_safe(&mut self) {
        self.phi = self.phi.max(POLE_EPSILON).min(PI - POLE_EPSILON);
    }

    /// Cartesian offset from the anchor
    pub fn to_vec3(&self) -> Vec3 {
        Self::offset(self.radius, self.phi, self.theta)
    }

    /// Cartesian offset for an arbitrary radius at this orientation
    pub fn with_radius(&self, radius: f32) -> Vec3 {
        Self::offset(radius, self.phi, self.theta)
    }

    fn offset(radius: f32, phi: f32, theta: f32) -> Vec3 {
        let sin_phi_radius = phi.sin() * radius;
        Vec3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ordered_bounds() {
        assert_eq!(ordered_bounds(1.0, 2.0), (1.0, 2.0));
        assert_eq!(ordered_bounds(2.0, 1.0), (1.0, 2.0));
    }

    #[test]
    fn test_clamp_to_bounds_reversed_range() {
        assert_eq!(clamp_to_bounds(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_to_bounds(15.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp_to_bounds(-1.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_angle_dead_zone() {
        let a = Vec3::Z;
        let almost = Vec3::new(0.01, 0.0, 1.0).normalize();
        assert_eq!(angle_between(a, a), 0.0);
        assert_eq!(angle_between(a, almost), 0.0);
        assert_eq!(angle_between(a, -a), PI);
    }

    #[test]
    fn test_angle_between_perpendicular() {
        assert_relative_eq!(angle_between(Vec3::X, Vec3::Z), PI / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_signed_angle_sign() {
        // X × Z = -Y, so measured against +Y the angle is negative
        assert_relative_eq!(
            signed_angle_between(Vec3::X, Vec3::Z, Vec3::Y),
            -PI / 2.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            signed_angle_between(Vec3::Z, Vec3::X, Vec3::Y),
            PI / 2.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_spherical_to_vec3() {
        let s = Spherical::new(2.0, PI / 2.0, 0.0);
        let v = s.to_vec3();
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 2.0, epsilon = 1e-6);

        let top = Spherical::new(3.0, 0.0, 1.0).to_vec3();
        assert_relative_eq!(top.y, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_make_safe_leaves_poles() {
        let mut s = Spherical::new(1.0, 0.0, 0.0);
        s.make_safe();
        assert!(s.phi > 0.0);

        s.phi = PI;
        s.make_safe();
        assert!(s.phi < PI);
    }
}
