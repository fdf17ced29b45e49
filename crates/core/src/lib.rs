#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod error;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::ConfigError;

/// Stable identity of a touch pointer across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer#{}", self.0)
    }
}

/// A pointer position observed this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Which pointer.
    pub id: PointerId,
    /// World-space position.
    pub position: Vec3,
}

impl PointerSample {
    /// Create a new sample.
    pub fn new(id: PointerId, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// Monotonic frame counter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any run.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
