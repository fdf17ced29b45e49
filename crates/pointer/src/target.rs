//! The touch target capability.

use crate::TouchPointer;
use mrtouch_math::Vec3;
use std::rc::Rc;

/// Anything a touch pointer can hover and grasp.
///
/// Only [`closest_point_on_surface`](TouchTarget::closest_point_on_surface)
/// is required; notifications default to no-ops. Methods take `&self`, so
/// implementers keep mutable state behind `Cell`/`RefCell`.
pub trait TouchTarget {
    /// A pointer started hovering this target. A pointer hovers at most one
    /// target at any time.
    fn hover_started(&self, _pointer: &TouchPointer) {}

    /// A pointer stopped hovering this target.
    fn hover_ended(&self, _pointer: &TouchPointer) {}

    /// A pointer hovering this target started grasping.
    fn grasp_started(&self, _pointer: &TouchPointer) {}

    /// A pointer hovering this target stopped grasping.
    fn grasp_ended(&self, _pointer: &TouchPointer) {}

    /// Point on the target's surface closest to `point`, or `None` if the
    /// target cannot answer right now.
    fn closest_point_on_surface(&self, point: Vec3) -> Option<Vec3>;
}

/// Shared handle to a target. Pointers only keep weak references.
pub type TargetRef = Rc<dyn TouchTarget>;

/// True if both handles refer to the same target object.
pub fn same_target(a: &TargetRef, b: &TargetRef) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
