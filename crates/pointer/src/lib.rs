#![warn(missing_docs)]
//! Touch pointers and the targets they hover.
//!
//! Each [`TouchPointer`] hovers at most one [`TouchTarget`] at a time: the
//! closest one among the targets it overlaps. Hover and grasp notifications
//! are raised exactly once per transition.

mod pointer;
mod target;

pub use pointer::{TouchPointer, DEFAULT_TOUCH_RADIUS};
pub use target::{same_target, TargetRef, TouchTarget};
