//! Scripted pointer motion.

use mrtouch_math::Vec3;
use serde::{Deserialize, Serialize};

/// Pointer position at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// World-space position.
    pub position: [f32; 3],
    /// Seconds since the start of the run.
    pub time: f32,
}

impl Keyframe {
    /// Create a keyframe.
    pub fn new(position: Vec3, time: f32) -> Self {
        Self {
            position: position.to_array(),
            time,
        }
    }
}

/// Half-open time interval `[start, end)` during which the pointer grasps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspWindow {
    /// Seconds when grasping starts.
    pub start: f32,
    /// Seconds when grasping stops.
    pub end: f32,
}

impl GraspWindow {
    /// True if `time` falls inside the window.
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start && time < self.end
    }
}

/// Linearly interpolated trajectory through keyframes.
///
/// Before the first keyframe the pointer sits at the first position, after
/// the last one at the last position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerPath {
    keyframes: Vec<Keyframe>,
    grasps: Vec<GraspWindow>,
}

impl PointerPath {
    /// Build a path. Keyframes are sorted by time.
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keyframes,
            grasps: Vec::new(),
        }
    }

    /// Builder: add grasp windows
    pub fn with_grasps(mut self, grasps: Vec<GraspWindow>) -> Self {
        self.grasps = grasps;
        self
    }

    /// Time of the last keyframe, or zero for an empty path.
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Interpolated position at `time`. An empty path stays at the origin.
    pub fn position_at(&self, time: f32) -> Vec3 {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec3::ZERO,
        };

        if time <= first.time {
            return Vec3::from_array(first.position);
        }
        if time >= last.time {
            return Vec3::from_array(last.position);
        }

        let next = self.keyframes.partition_point(|k| k.time <= time);
        let start = &self.keyframes[next - 1];
        let end = &self.keyframes[next];
        let span = end.time - start.time;
        let alpha = if span > 0.0 {
            (time - start.time) / span
        } else {
            1.0
        };

        Vec3::from_array(start.position).lerp(Vec3::from_array(end.position), alpha)
    }

    /// True if any grasp window covers `time`.
    pub fn grasped_at(&self, time: f32) -> bool {
        self.grasps.iter().any(|window| window.contains(time))
    }
}
