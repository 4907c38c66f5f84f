//! 2D vector primitives shared by the geometry and force kernels.
//!
//! Built directly on `glam::DVec2`; this module only adds the handful
//! of operations the crowd-dynamics math uses by name (`cross`,
//! `rotate90`, `rotate270`, `unit_vector`, `angle`) so call sites read
//! the same way the original formulas do.

use glam::DVec2;

/// Dot product, `a . b`.
#[inline]
pub fn dot(a: DVec2, b: DVec2) -> f64 {
    a.dot(b)
}

/// Scalar "cross product" in 2D: `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Euclidean length of `v`.
#[inline]
pub fn length(v: DVec2) -> f64 {
    v.length()
}

/// Unit vector in the direction of `v`, or zero if `v` is the zero vector.
#[inline]
pub fn unit(v: DVec2) -> DVec2 {
    v.try_normalize().unwrap_or(DVec2::ZERO)
}

/// Rotate `v` by +90 degrees: `(x, y) -> (-y, x)`.
#[inline]
pub fn rotate90(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

/// Rotate `v` by -90 degrees (270 degrees counter-clockwise): `(x, y) -> (y, -x)`.
#[inline]
pub fn rotate270(v: DVec2) -> DVec2 {
    DVec2::new(v.y, -v.x)
}

/// Unit vector at angle `theta` (radians) from the positive x-axis.
#[inline]
pub fn unit_vector(theta: f64) -> DVec2 {
    DVec2::new(theta.cos(), theta.sin())
}

/// Angle of `v` from the positive x-axis, in `(-pi, pi]`.
#[inline]
pub fn angle(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Wraps an angle into `(-pi, pi]`.
#[inline]
pub fn wrap_angle(theta: f64) -> f64 {
    use std::f64::consts::PI;
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotate90_rotate270_roundtrip() {
        let v = DVec2::new(3.0, -4.0);
        assert_relative_eq!(rotate90(rotate270(v)), v, epsilon = 1e-12);
        assert_relative_eq!(rotate270(rotate90(v)), v, epsilon = 1e-12);
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(unit(DVec2::ZERO), DVec2::ZERO);
    }

    #[test]
    fn unit_vector_matches_angle() {
        let theta = 0.7;
        let v = unit_vector(theta);
        assert_relative_eq!(angle(v), theta, epsilon = 1e-12);
    }

    #[test]
    fn cross_is_signed_area() {
        let a = DVec2::new(1.0, 0.0);
        let b = DVec2::new(0.0, 1.0);
        assert_relative_eq!(cross(a, b), 1.0);
        assert_relative_eq!(cross(b, a), -1.0);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        use std::f64::consts::PI;
        assert_relative_eq!(wrap_angle(3.0 * PI), -PI, epsilon = 1e-9);
        assert_relative_eq!(wrap_angle(PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(0.0), 0.0, epsilon = 1e-12);
    }
}
