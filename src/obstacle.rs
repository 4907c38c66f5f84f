//! Linear obstacles: immutable line segments bounding the domain.

use glam::DVec2;

use crate::vector::{length, rotate90};

/// A single linear obstacle with precomputed tangent/normal/length.
/// Immutable after construction, as spec'd in §3.2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub p0: DVec2,
    pub p1: DVec2,
    pub tangent: DVec2,
    pub normal: DVec2,
    pub length: f64,
}

impl Obstacle {
    pub fn new(p0: DVec2, p1: DVec2) -> Self {
        let d = p1 - p0;
        let length = length(d);
        let tangent = if length > 0.0 { d / length } else { DVec2::ZERO };
        let normal = rotate90(tangent);
        Self {
            p0,
            p1,
            tangent,
            normal,
            length,
        }
    }
}

/// An immutable array of linear obstacles.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStore {
    obstacles: Vec<Obstacle>,
}

impl ObstacleStore {
    pub fn new(segments: impl IntoIterator<Item = (DVec2, DVec2)>) -> Self {
        Self {
            obstacles: segments
                .into_iter()
                .map(|(p0, p1)| Obstacle::new(p0, p1))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec2;

    #[test]
    fn precomputes_tangent_normal_length() {
        let o = Obstacle::new(dvec2(0.0, 0.0), dvec2(3.0, 4.0));
        assert_relative_eq!(o.length, 5.0);
        assert_relative_eq!(o.tangent, dvec2(3.0 / 5.0, 4.0 / 5.0));
        // normal = rotate90(tangent)
        assert_relative_eq!(o.normal, dvec2(-4.0 / 5.0, 3.0 / 5.0));
    }

    #[test]
    fn degenerate_segment_has_zero_tangent() {
        let o = Obstacle::new(dvec2(1.0, 1.0), dvec2(1.0, 1.0));
        assert_eq!(o.length, 0.0);
        assert_eq!(o.tangent, DVec2::ZERO);
    }
}
