//! Planes and line intersection.

use glam::Vec3;

/// Below this, a segment is treated as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Plane `{ p : normal · p + d = 0 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal. Not required to be unit length for intersection tests.
    pub normal: Vec3,
    /// Offset term.
    pub d: f32,
}

impl Plane {
    /// Create a plane from normal and offset.
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Signed distance of `point` from the plane, scaled by the normal's length.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    /// Intersection of the segment `start → end` with the plane.
    ///
    /// Returns `None` when the segment is parallel to the plane or both
    /// endpoints lie strictly on the same side.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        let direction = end - start;
        let denom = self.normal.dot(direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = -self.signed_distance(start) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(start + direction * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_crossing_plane() {
        // z = -2
        let plane = Plane::new(Vec3::Z, 2.0);
        let hit = plane
            .intersect_segment(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, -4.0))
            .expect("segment crosses plane");
        assert!(hit.abs_diff_eq(Vec3::new(1.0, 1.0, -2.0), 1e-6));
    }

    #[test]
    fn parallel_and_short_segments_miss() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Z);
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0))
            .is_none());
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 1.0))
            .is_none());
    }

    #[test]
    fn endpoint_on_plane_counts() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Z);
        let hit = plane.intersect_segment(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hit, Some(Vec3::ZERO));
    }
}
