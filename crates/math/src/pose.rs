//! Rigid poses (translation + rotation, no scale).

use glam::{Quat, Vec3};

/// Position and orientation of an object.
///
/// Local +Z is the object's forward (front normal) axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space position of the local origin.
    pub position: Vec3,
    /// Rotation from local to world space. Expected to be normalized.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a pose from position and orientation.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with no rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Transform a world-space point into this pose's local space.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    /// Transform a local-space point into world space.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// World-space direction of local +Z.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// True when both poses agree within the given tolerances.
    ///
    /// Orientation is compared component-wise, so `q` and `-q` (the same
    /// rotation) are reported as different.
    pub fn near_eq(&self, other: &Self, linear_epsilon: f32, angular_epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, linear_epsilon)
            && self.orientation.abs_diff_eq(other.orientation, angular_epsilon)
    }
}
