#![warn(missing_docs)]
//! Geometric primitives shared by the interaction crates.
//!
//! Everything here works in one right-handed space. Basis conversions to and
//! from a host engine are the caller's business.

mod aabb;
mod plane;
mod pose;

pub use aabb::{within_half_extents_xy, Aabb};
pub use plane::Plane;
pub use pose::Pose;

pub use glam::{Quat, Vec2, Vec3};
