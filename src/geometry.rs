//! Skin-to-skin distance and normal/moment-arm geometry between
//! circles, three-circle bodies, and line segments.
//!
//! Every kernel returns a signed distance `h` (negative means the
//! bodies overlap) and a normal pointing away from the first argument,
//! following `distance_circle_circle` in the original
//! `crowddynamics.core.interactions.distance` module.

use glam::DVec2;

use crate::obstacle::Obstacle;
use crate::vector::length;

/// Skin-to-skin distance and normal between two circles centered at
/// `x0`/`x1` with radii `r0`/`r1`. Normal points from `x1` towards `x0`.
/// Returns `n = 0` when the centers coincide.
pub fn distance_circle_circle(x0: DVec2, r0: f64, x1: DVec2, r1: f64) -> (f64, DVec2) {
    let x = x0 - x1;
    let d = length(x);
    let h = d - (r0 + r1);
    let n = if d == 0.0 { DVec2::ZERO } else { x / d };
    (h, n)
}

/// The three disks making up a three-circle body: torso, left shoulder,
/// right shoulder, in that enumeration order (used for tie-breaking).
pub type ThreeCircle = [(DVec2, f64); 3];

/// Result of a three-circle/three-circle (or three-circle/line) distance
/// query: the minimum skin-to-skin distance, the normal at that pair,
/// and the moment arm(s) from each body's torso center to the contact.
pub struct ThreeCircleContact {
    pub h: f64,
    pub normal: DVec2,
    pub moment_a: DVec2,
    pub moment_b: DVec2,
}

/// Minimum skin-to-skin distance between two three-circle bodies, plus
/// the moment arms from each torso center to the chosen contact point.
/// Ties between disk pairs are broken by enumeration order
/// (torso, left shoulder, right shoulder).
pub fn distance_three_circle(a: ThreeCircle, b: ThreeCircle) -> ThreeCircleContact {
    let mut h_min = f64::NAN;
    let mut normal = DVec2::ZERO;
    let mut chosen_a = a[0];
    let mut chosen_b = b[0];

    for &(xa, ra) in &a {
        for &(xb, rb) in &b {
            let (h, n) = distance_circle_circle(xa, ra, xb, rb);
            if h_min.is_nan() || h < h_min {
                h_min = h;
                normal = n;
                chosen_a = (xa, ra);
                chosen_b = (xb, rb);
            }
        }
    }

    let moment_a = chosen_a.0 + chosen_a.1 * normal - a[0].0;
    let moment_b = chosen_b.0 - chosen_b.1 * normal - b[0].0;

    ThreeCircleContact {
        h: h_min,
        normal,
        moment_a,
        moment_b,
    }
}

/// Skin-to-skin distance between a circle and a line segment
/// `(p0, p1)`. Projects `x` onto the segment; when the projection
/// falls past an endpoint, measures to that endpoint instead.
pub fn distance_circle_line(x: DVec2, r: f64, p0: DVec2, p1: DVec2) -> (f64, DVec2) {
    let obstacle = Obstacle::new(p0, p1);
    distance_circle_obstacle(x, r, &obstacle)
}

/// Same as [`distance_circle_line`] but takes a precomputed [`Obstacle`]
/// so the tangent/normal/length do not need to be recomputed per call.
pub fn distance_circle_obstacle(x: DVec2, r: f64, obstacle: &Obstacle) -> (f64, DVec2) {
    let t_w = obstacle.tangent;
    let n_w = obstacle.normal;
    let l_w = obstacle.length;

    let q0 = x - obstacle.p0;
    let q1 = x - obstacle.p1;
    let l_t = -t_w.dot(q1) - t_w.dot(q0);

    // l_t > l_w means the projection onto the segment falls before p0;
    // l_t < -l_w means it falls past p1 (see distance_circle_line tests).
    let (d_iw, n_iw) = if l_t > l_w {
        let d = length(q0);
        (d, if d > 0.0 { q0 / d } else { DVec2::ZERO })
    } else if l_t < -l_w {
        let d = length(q1);
        (d, if d > 0.0 { q1 / d } else { DVec2::ZERO })
    } else {
        let l_n = n_w.dot(q0);
        (l_n.abs(), l_n.signum() * n_w)
    };

    (d_iw - r, n_iw)
}

/// Result of a three-circle/line distance query.
pub struct ThreeCircleLineContact {
    pub h: f64,
    pub normal: DVec2,
    pub moment: DVec2,
}

/// Minimum skin-to-skin distance between a three-circle body and a line
/// segment, plus the moment arm from the torso center to the chosen
/// disk's contact point.
pub fn distance_three_circle_line(body: ThreeCircle, obstacle: &Obstacle) -> ThreeCircleLineContact {
    let mut h_min = f64::NAN;
    let mut normal = DVec2::ZERO;
    let mut chosen = body[0];

    for &(x, r) in &body {
        let (h, n) = distance_circle_obstacle(x, r, obstacle);
        if h_min.is_nan() || h < h_min {
            h_min = h;
            normal = n;
            chosen = (x, r);
        }
    }

    let moment = chosen.0 - chosen.1 * normal - body[0].0;

    ThreeCircleLineContact {
        h: h_min,
        normal,
        moment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn circle_circle_zero_distance_returns_negative_h_zero_normal() {
        let (h, n) = distance_circle_circle(dvec2(1.0, 1.0), 0.5, dvec2(1.0, 1.0), 0.3);
        assert_relative_eq!(h, -0.8);
        assert_eq!(n, DVec2::ZERO);
    }

    #[test]
    fn circle_circle_basic_separation() {
        let (h, n) = distance_circle_circle(dvec2(0.0, 0.0), 1.0, dvec2(5.0, 0.0), 1.0);
        assert_relative_eq!(h, 3.0);
        assert_relative_eq!(n, dvec2(-1.0, 0.0));
    }

    #[test]
    fn circle_line_perpendicular_projection() {
        // Segment from (0,0) to (10,0), circle above the midpoint.
        let (h, n) = distance_circle_line(dvec2(5.0, 2.0), 0.5, dvec2(0.0, 0.0), dvec2(10.0, 0.0));
        assert_relative_eq!(h, 1.5);
        assert_relative_eq!(n, dvec2(0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn circle_line_past_endpoint_uses_endpoint_distance() {
        // Circle beyond p1 along the tangent.
        let (h, n) = distance_circle_line(dvec2(12.0, 0.0), 0.5, dvec2(0.0, 0.0), dvec2(10.0, 0.0));
        assert_relative_eq!(h, 1.5);
        assert_relative_eq!(n, dvec2(1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn three_circle_picks_minimum_pair() {
        let a: ThreeCircle = [
            (dvec2(0.0, 0.0), 0.3),
            (dvec2(-0.2, 0.2), 0.2),
            (dvec2(0.2, 0.2), 0.2),
        ];
        let b: ThreeCircle = [
            (dvec2(10.0, 0.0), 0.3),
            (dvec2(0.6, 0.2), 0.2),
            (dvec2(10.2, 0.2), 0.2),
        ];
        let contact = distance_three_circle(a, b);
        // Closest pair is a's left shoulder to b's left shoulder.
        let expected = distance_circle_circle(dvec2(-0.2, 0.2), 0.2, dvec2(0.6, 0.2), 0.2);
        assert_relative_eq!(contact.h, expected.0);
    }
}
