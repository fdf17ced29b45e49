//! Hover and grasp state machine of a single touch pointer.

use crate::target::{same_target, TargetRef, TouchTarget};
use mrtouch_core::{PointerId, PointerSample};
use mrtouch_math::Vec3;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Touch radius used when none is configured.
pub const DEFAULT_TOUCH_RADIUS: f32 = 0.01;

/// A point-like pointer (e.g. a fingertip) that hovers the closest touch target.
///
/// Targets are held weakly: a target that goes away simply stops being
/// hovered and receives nothing further.
#[derive(Debug)]
pub struct TouchPointer {
    id: PointerId,
    position: Vec3,
    touch_radius: f32,
    hovered: Option<Weak<dyn TouchTarget>>,
    /// Closest point on the hovered target's surface.
    closest_point: Vec3,
    /// While set, `tick` leaves the hovered target alone.
    hover_locked: bool,
    grasped: bool,
    /// Receives hover and grasp when nothing else is hovered.
    default_target: Option<Weak<dyn TouchTarget>>,
}

impl TouchPointer {
    /// Create a pointer at the origin.
    pub fn new(id: PointerId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            touch_radius: DEFAULT_TOUCH_RADIUS,
            hovered: None,
            closest_point: Vec3::ZERO,
            hover_locked: false,
            grasped: false,
            default_target: None,
        }
    }

    /// Builder: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set touch radius
    pub fn with_touch_radius(mut self, radius: f32) -> Self {
        self.set_touch_radius(radius);
        self
    }

    /// Pointer identity.
    pub fn id(&self) -> PointerId {
        self.id
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the pointer. Hover is re-evaluated on the next [`tick`](Self::tick).
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Position and id as a button input sample.
    pub fn sample(&self) -> PointerSample {
        PointerSample::new(self.id, self.position)
    }

    /// Radius of the sphere used for overlap tests.
    pub fn touch_radius(&self) -> f32 {
        self.touch_radius
    }

    /// Set the overlap radius. Negative values are treated as zero.
    pub fn set_touch_radius(&mut self, radius: f32) {
        self.touch_radius = radius.max(0.0);
    }

    /// Re-evaluate the hovered target.
    ///
    /// `overlapping` are the targets currently overlapping the pointer. The
    /// closest one that reports a surface point wins; on ties the earliest in
    /// the slice is kept. Does nothing while hover-locked.
    pub fn tick(&mut self, overlapping: &[TargetRef]) {
        if self.hover_locked {
            return;
        }

        let mut min_distance_sqr = f32::MAX;
        let mut closest: Option<(&TargetRef, Vec3)> = None;

        for target in overlapping {
            if let Some(point) = target.closest_point_on_surface(self.position) {
                let distance_sqr = self.position.distance_squared(point);
                if distance_sqr < min_distance_sqr {
                    min_distance_sqr = distance_sqr;
                    closest = Some((target, point));
                }
            }
        }

        match closest {
            Some((target, point)) => self.change_hovered_target(Some(Rc::clone(target)), point),
            None => self.change_hovered_target(None, self.position),
        }
    }

    /// Currently hovered target and the closest point on its surface.
    pub fn hovered_target(&self) -> Option<(TargetRef, Vec3)> {
        self.hovered
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|target| (target, self.closest_point))
    }

    /// True if `target` is the hovered target.
    pub fn is_hovering(&self, target: &TargetRef) -> bool {
        self.hovered_target()
            .is_some_and(|(hovered, _)| same_target(&hovered, target))
    }

    /// Hover `target` explicitly, bypassing the overlap search.
    ///
    /// `None` clears the hover (falling back to the default target). With
    /// `enable_lock` the hover stays put until [`set_hover_locked`](Self::set_hover_locked)
    /// releases it. Returns false, changing nothing, if already locked.
    pub fn set_hovered_target(&mut self, target: Option<&TargetRef>, enable_lock: bool) -> bool {
        if self.hover_locked {
            return false;
        }

        match target {
            Some(target) => {
                if let Some(point) = target.closest_point_on_surface(self.position) {
                    self.change_hovered_target(Some(Rc::clone(target)), point);
                }
            }
            None => self.change_hovered_target(None, self.position),
        }

        self.set_hover_locked(target.is_some() && enable_lock);
        true
    }

    /// True while the hovered target is pinned.
    pub fn hover_locked(&self) -> bool {
        self.hover_locked
    }

    /// Pin or unpin the hovered target.
    pub fn set_hover_locked(&mut self, locked: bool) {
        if self.hover_locked != locked {
            self.hover_locked = locked;
            debug!(pointer = %self.id, locked, "hover lock changed");
        }
    }

    /// True while grasping.
    pub fn grasped(&self) -> bool {
        self.grasped
    }

    /// Start or stop grasping. The hovered target at the time of the call
    /// receives the notification; grasping does not lock the hover.
    pub fn set_grasped(&mut self, grasped: bool) {
        if self.grasped == grasped {
            return;
        }

        self.grasped = grasped;
        debug!(pointer = %self.id, grasped, "grasp changed");

        if let Some(target) = self.hovered.as_ref().and_then(Weak::upgrade) {
            if grasped {
                target.grasp_started(self);
            } else {
                target.grasp_ended(self);
            }
        }
    }

    /// The fallback target, if it still exists.
    pub fn default_target(&self) -> Option<TargetRef> {
        self.default_target.as_ref().and_then(Weak::upgrade)
    }

    /// Set the target that receives hover and grasp when nothing else is hovered.
    ///
    /// An idle, unlocked pointer starts hovering the new default right away.
    pub fn set_default_target(&mut self, target: Option<&TargetRef>) {
        self.default_target = target.map(Rc::downgrade);

        if !self.hover_locked && self.hovered_target().is_none() {
            self.change_hovered_target(None, self.position);
        }
    }

    /// Stop hovering for good (e.g. the pointer is being destroyed).
    ///
    /// Unlike clearing the hover, this does not fall back to the default target.
    pub fn release(&mut self) {
        if let Some(target) = self.hovered.take().and_then(|weak| weak.upgrade()) {
            debug!(pointer = %self.id, "hover released");
            target.hover_ended(self);
        }
        self.hover_locked = false;
    }

    /// Switch hover to `new_target` (or the default target when `None`),
    /// raising ended/started only if the effective target changes.
    fn change_hovered_target(&mut self, new_target: Option<TargetRef>, point: Vec3) {
        let current = self.hovered.as_ref().and_then(Weak::upgrade);
        let next = match new_target {
            Some(target) => Some((target, point)),
            None => self.default_target().map(|target| {
                let point = target
                    .closest_point_on_surface(self.position)
                    .unwrap_or(self.position);
                (target, point)
            }),
        };

        let unchanged = match (&current, &next) {
            (Some(current), Some((next, _))) => same_target(current, next),
            (None, None) => true,
            _ => false,
        };

        if unchanged {
            self.closest_point = next.as_ref().map_or(point, |(_, point)| *point);
            if current.is_none() {
                // Drop a handle whose target has gone away.
                self.hovered = None;
            }
            return;
        }

        if let Some(previous) = current {
            previous.hover_ended(self);
        }

        self.hovered = next.as_ref().map(|(target, _)| Rc::downgrade(target));
        self.closest_point = next.as_ref().map_or(point, |(_, point)| *point);
        debug!(pointer = %self.id, hovering = next.is_some(), "hovered target changed");

        if let Some((target, _)) = next {
            target.hover_started(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        HoverStarted,
        HoverEnded,
        GraspStarted,
        GraspEnded,
    }

    struct Probe {
        name: &'static str,
        point: Cell<Option<Vec3>>,
        journal: Rc<RefCell<Vec<(&'static str, Event)>>>,
    }

    impl TouchTarget for Probe {
        fn hover_started(&self, _pointer: &TouchPointer) {
            self.journal.borrow_mut().push((self.name, Event::HoverStarted));
        }
        fn hover_ended(&self, _pointer: &TouchPointer) {
            self.journal.borrow_mut().push((self.name, Event::HoverEnded));
        }
        fn grasp_started(&self, _pointer: &TouchPointer) {
            self.journal.borrow_mut().push((self.name, Event::GraspStarted));
        }
        fn grasp_ended(&self, _pointer: &TouchPointer) {
            self.journal.borrow_mut().push((self.name, Event::GraspEnded));
        }
        fn closest_point_on_surface(&self, _point: Vec3) -> Option<Vec3> {
            self.point.get()
        }
    }

    type Journal = Rc<RefCell<Vec<(&'static str, Event)>>>;

    fn probe(journal: &Journal, name: &'static str, distance: f32) -> (Rc<Probe>, TargetRef) {
        let probe = Rc::new(Probe {
            name,
            point: Cell::new(Some(Vec3::new(distance, 0.0, 0.0))),
            journal: Rc::clone(journal),
        });
        let target: TargetRef = probe.clone();
        (probe, target)
    }

    fn drain(journal: &Journal) -> Vec<(&'static str, Event)> {
        std::mem::take(&mut *journal.borrow_mut())
    }

    #[test]
    fn hovers_closest_and_hands_over_in_order() {
        let journal = Journal::default();
        let (_a, a) = probe(&journal, "a", 2.0);
        let (_b, b) = probe(&journal, "b", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[a.clone(), b.clone()]);
        assert!(pointer.is_hovering(&b));
        assert_eq!(drain(&journal), vec![("b", Event::HoverStarted)]);

        pointer.tick(&[a.clone()]);
        assert!(pointer.is_hovering(&a));
        assert_eq!(
            drain(&journal),
            vec![("b", Event::HoverEnded), ("a", Event::HoverStarted)]
        );
    }

    #[test]
    fn staying_on_a_target_only_updates_closest_point() {
        let journal = Journal::default();
        let (a_probe, a) = probe(&journal, "a", 2.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[a.clone()]);
        a_probe.point.set(Some(Vec3::new(0.5, 0.0, 0.0)));
        pointer.tick(&[a.clone()]);

        assert_eq!(drain(&journal), vec![("a", Event::HoverStarted)]);
        let (_, point) = pointer.hovered_target().expect("still hovering");
        assert_eq!(point, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn ties_keep_the_first_target() {
        let journal = Journal::default();
        let (_a, a) = probe(&journal, "a", 1.0);
        let (_b, b) = probe(&journal, "b", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[a.clone(), b.clone()]);
        assert!(pointer.is_hovering(&a));
    }

    #[test]
    fn targets_without_surface_point_are_skipped() {
        let journal = Journal::default();
        let (near_probe, near) = probe(&journal, "near", 0.1);
        let (_far, far) = probe(&journal, "far", 3.0);
        near_probe.point.set(None);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[near, far.clone()]);
        assert!(pointer.is_hovering(&far));
    }

    #[test]
    fn hover_lock_freezes_transitions() {
        let journal = Journal::default();
        let (_a, a) = probe(&journal, "a", 1.0);
        let (_b, b) = probe(&journal, "b", 0.5);
        let mut pointer = TouchPointer::new(PointerId(1));

        assert!(pointer.set_hovered_target(Some(&a), true));
        assert!(pointer.hover_locked());
        drain(&journal);

        pointer.tick(&[b.clone()]);
        pointer.tick(&[]);
        assert!(pointer.is_hovering(&a));
        assert!(drain(&journal).is_empty());
        assert!(!pointer.set_hovered_target(Some(&b), false));

        pointer.set_hover_locked(false);
        pointer.tick(&[b.clone()]);
        assert!(pointer.is_hovering(&b));
    }

    #[test]
    fn clearing_hover_never_locks() {
        let journal = Journal::default();
        let (_a, a) = probe(&journal, "a", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.set_hovered_target(Some(&a), false);
        assert!(!pointer.hover_locked());
        pointer.set_hovered_target(None, true);
        assert!(!pointer.hover_locked());
        assert!(pointer.hovered_target().is_none());
        assert_eq!(
            drain(&journal),
            vec![("a", Event::HoverStarted), ("a", Event::HoverEnded)]
        );
    }

    #[test]
    fn grasp_follows_current_hover() {
        let journal = Journal::default();
        let (_t, t) = probe(&journal, "t", 1.0);
        let (_u, u) = probe(&journal, "u", 0.5);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[t.clone()]);
        pointer.set_grasped(true);
        pointer.set_grasped(true);
        pointer.tick(&[t.clone(), u.clone()]);
        assert!(!pointer.hover_locked());
        pointer.set_grasped(false);

        assert_eq!(
            drain(&journal),
            vec![
                ("t", Event::HoverStarted),
                ("t", Event::GraspStarted),
                ("t", Event::HoverEnded),
                ("u", Event::HoverStarted),
                ("u", Event::GraspEnded),
            ]
        );
    }

    #[test]
    fn default_target_catches_idle_pointer() {
        let journal = Journal::default();
        let (_d, fallback) = probe(&journal, "default", 5.0);
        let (_a, a) = probe(&journal, "a", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.set_default_target(Some(&fallback));
        assert!(pointer.is_hovering(&fallback));

        pointer.tick(&[]);
        pointer.tick(&[a.clone()]);
        pointer.tick(&[]);
        pointer.set_grasped(true);

        assert_eq!(
            drain(&journal),
            vec![
                ("default", Event::HoverStarted),
                ("default", Event::HoverEnded),
                ("a", Event::HoverStarted),
                ("a", Event::HoverEnded),
                ("default", Event::HoverStarted),
                ("default", Event::GraspStarted),
            ]
        );
    }

    #[test]
    fn dropped_target_counts_as_unhovered() {
        let journal = Journal::default();
        let (a_probe, a) = probe(&journal, "a", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));

        pointer.tick(&[a.clone()]);
        drop(a);
        drop(a_probe);
        assert!(pointer.hovered_target().is_none());

        pointer.set_grasped(true);
        pointer.tick(&[]);
        assert_eq!(drain(&journal), vec![("a", Event::HoverStarted)]);
    }

    #[test]
    fn release_skips_default_target() {
        let journal = Journal::default();
        let (_d, fallback) = probe(&journal, "default", 5.0);
        let (_a, a) = probe(&journal, "a", 1.0);
        let mut pointer = TouchPointer::new(PointerId(1));
        pointer.set_default_target(Some(&fallback));
        pointer.set_hovered_target(Some(&a), true);
        drain(&journal);

        pointer.release();
        assert!(pointer.hovered_target().is_none());
        assert!(!pointer.hover_locked());
        assert_eq!(drain(&journal), vec![("a", Event::HoverEnded)]);
    }

    #[test]
    fn touch_radius_is_never_negative() {
        let pointer = TouchPointer::new(PointerId(3)).with_touch_radius(-1.0);
        assert_eq!(pointer.touch_radius(), 0.0);
        assert_eq!(pointer.sample().id, PointerId(3));
    }
}
