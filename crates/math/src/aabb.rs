//! Axis-aligned boxes.

use glam::{Vec2, Vec3};

/// Axis-aligned bounding box. All containment tests are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Create an AABB from its center and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// True if `point` lies inside or on the boundary of the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Closest point of the box to `point`. Points inside map to themselves.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// True if the XY components of `point` lie within `[-half.x, half.x] × [-half.y, half.y]`.
pub fn within_half_extents_xy(point: Vec3, half: Vec2) -> bool {
    point.x.abs() <= half.x && point.y.abs() <= half.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_inclusive() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::new(1.0, -1.0, 0.0)));
        assert!(!aabb.contains(Vec3::new(1.0001, 0.0, 0.0)));
    }

    #[test]
    fn closest_point_clamps_outside_points() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(aabb.closest_point(Vec3::new(5.0, 1.0, -3.0)), Vec3::new(2.0, 1.0, 0.0));
        let inside = Vec3::new(0.5, 1.5, 1.0);
        assert_eq!(aabb.closest_point(inside), inside);
    }

    #[test]
    fn intersection_of_touching_boxes() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn xy_bounds() {
        let half = Vec2::new(0.5, 0.25);
        assert!(within_half_extents_xy(Vec3::new(0.5, -0.25, 100.0), half));
        assert!(!within_half_extents_xy(Vec3::new(0.0, 0.3, 0.0), half));
    }
}
