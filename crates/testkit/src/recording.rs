//! Test doubles that record every notification they receive.

use crate::EventRecord;
use mrtouch_button::{ButtonHandler, PressableButton};
use mrtouch_core::{FrameTick, PointerId};
use mrtouch_math::Vec3;
use mrtouch_pointer::{TouchPointer, TouchTarget};
use std::cell::{Cell, RefCell};

/// A button notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonEvent {
    /// First pointer started hovering.
    HoverStarted(PointerId),
    /// Last pointer stopped hovering.
    HoverEnded(PointerId),
    /// A pointer started pushing the face, at the given world point.
    TouchStarted(PointerId, Vec3),
    /// A pointer stopped pushing the face.
    TouchEnded(PointerId),
    /// Pressed threshold crossed.
    Pressed(Option<PointerId>, Vec3),
    /// Released threshold crossed.
    Released(Option<PointerId>),
    /// Button enabled.
    Enabled,
    /// Button disabled.
    Disabled,
}

impl ButtonEvent {
    /// Stable label used in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HoverStarted(_) => "hover_start",
            Self::HoverEnded(_) => "hover_end",
            Self::TouchStarted(..) => "touch_start",
            Self::TouchEnded(_) => "touch_end",
            Self::Pressed(..) => "pressed",
            Self::Released(_) => "released",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// Convert to a log record for `subject` at `tick`.
    pub fn to_record(&self, tick: FrameTick, subject: &str) -> EventRecord {
        let payload = match self {
            Self::HoverStarted(id) | Self::HoverEnded(id) | Self::TouchEnded(id) => id.to_string(),
            Self::TouchStarted(id, point) => format!("{id} at {point}"),
            Self::Pressed(id, point) => format!("{} at {point}", describe(*id)),
            Self::Released(id) => describe(*id),
            Self::Enabled | Self::Disabled => String::new(),
        };
        EventRecord::new(tick, self.kind(), subject, payload)
    }
}

fn describe(pointer: Option<PointerId>) -> String {
    pointer.map_or_else(|| "none".to_string(), |id| id.to_string())
}

/// Button handler that logs every event in order.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: RefCell<Vec<ButtonEvent>>,
    unsubscribe_on_press: Cell<bool>,
}

impl RecordingHandler {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: unsubscribe from inside the first pressed callback
    pub fn unsubscribing_on_press(self) -> Self {
        self.unsubscribe_on_press.set(true);
        self
    }

    /// Events so far.
    pub fn events(&self) -> Vec<ButtonEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<ButtonEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of pressed events.
    pub fn press_count(&self) -> usize {
        self.count(|e| matches!(e, ButtonEvent::Pressed(..)))
    }

    /// Number of released events.
    pub fn release_count(&self) -> usize {
        self.count(|e| matches!(e, ButtonEvent::Released(_)))
    }

    fn count(&self, predicate: impl Fn(&ButtonEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: ButtonEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ButtonHandler for RecordingHandler {
    fn on_hover_start(&self, _button: &PressableButton, pointer: PointerId) {
        self.push(ButtonEvent::HoverStarted(pointer));
    }

    fn on_hover_end(&self, _button: &PressableButton, pointer: PointerId) {
        self.push(ButtonEvent::HoverEnded(pointer));
    }

    fn on_touch_start(&self, _button: &PressableButton, pointer: PointerId, point: Vec3) {
        self.push(ButtonEvent::TouchStarted(pointer, point));
    }

    fn on_touch_end(&self, _button: &PressableButton, pointer: PointerId) {
        self.push(ButtonEvent::TouchEnded(pointer));
    }

    fn on_pressed(&self, button: &PressableButton, pointer: Option<PointerId>, point: Vec3) {
        self.push(ButtonEvent::Pressed(pointer, point));
        if self.unsubscribe_on_press.replace(false) {
            button.unsubscribe(self);
        }
    }

    fn on_released(&self, _button: &PressableButton, pointer: Option<PointerId>) {
        self.push(ButtonEvent::Released(pointer));
    }

    fn on_enabled(&self, _button: &PressableButton) {
        self.push(ButtonEvent::Enabled);
    }

    fn on_disabled(&self, _button: &PressableButton) {
        self.push(ButtonEvent::Disabled);
    }
}

/// What a [`RecordingTarget`] reports as its closest surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Always the same point, wherever the pointer is.
    Point(Vec3),
    /// Surface of a sphere.
    Sphere {
        /// Sphere center.
        center: Vec3,
        /// Sphere radius.
        radius: f32,
    },
    /// No answer; the target is skipped.
    Unavailable,
}

impl Surface {
    fn closest_point(&self, point: Vec3) -> Option<Vec3> {
        match *self {
            Self::Point(p) => Some(p),
            Self::Sphere { center, radius } => {
                let direction = (point - center).try_normalize().unwrap_or(Vec3::Z);
                Some(center + direction * radius)
            }
            Self::Unavailable => None,
        }
    }
}

/// A touch target notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEvent {
    /// Pointer started hovering.
    HoverStarted(PointerId),
    /// Pointer stopped hovering.
    HoverEnded(PointerId),
    /// Hovering pointer started grasping.
    GraspStarted(PointerId),
    /// Hovering pointer stopped grasping.
    GraspEnded(PointerId),
}

impl TargetEvent {
    /// Stable label used in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HoverStarted(_) => "hover_start",
            Self::HoverEnded(_) => "hover_end",
            Self::GraspStarted(_) => "grasp_start",
            Self::GraspEnded(_) => "grasp_end",
        }
    }

    /// Pointer that caused the event.
    pub fn pointer(&self) -> PointerId {
        match *self {
            Self::HoverStarted(id)
            | Self::HoverEnded(id)
            | Self::GraspStarted(id)
            | Self::GraspEnded(id) => id,
        }
    }

    /// Convert to a log record for `subject` at `tick`.
    pub fn to_record(&self, tick: FrameTick, subject: &str) -> EventRecord {
        EventRecord::new(tick, self.kind(), subject, self.pointer().to_string())
    }
}

/// Per-kind totals of target events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    /// Hover started count.
    pub hover_started: usize,
    /// Hover ended count.
    pub hover_ended: usize,
    /// Grasp started count.
    pub grasp_started: usize,
    /// Grasp ended count.
    pub grasp_ended: usize,
}

/// Touch target that logs every notification in order.
#[derive(Debug)]
pub struct RecordingTarget {
    surface: Cell<Surface>,
    events: RefCell<Vec<TargetEvent>>,
}

impl RecordingTarget {
    /// Create a target with the given surface.
    pub fn new(surface: Surface) -> Self {
        Self {
            surface: Cell::new(surface),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Target whose closest point is always `point`.
    pub fn at(point: Vec3) -> Self {
        Self::new(Surface::Point(point))
    }

    /// Change the reported surface.
    pub fn set_surface(&self, surface: Surface) {
        self.surface.set(surface);
    }

    /// Events so far.
    pub fn events(&self) -> Vec<TargetEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<TargetEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Totals per event kind.
    pub fn counts(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in self.events.borrow().iter() {
            match event {
                TargetEvent::HoverStarted(_) => counts.hover_started += 1,
                TargetEvent::HoverEnded(_) => counts.hover_ended += 1,
                TargetEvent::GraspStarted(_) => counts.grasp_started += 1,
                TargetEvent::GraspEnded(_) => counts.grasp_ended += 1,
            }
        }
        counts
    }

    fn push(&self, event: TargetEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl TouchTarget for RecordingTarget {
    fn hover_started(&self, pointer: &TouchPointer) {
        self.push(TargetEvent::HoverStarted(pointer.id()));
    }

    fn hover_ended(&self, pointer: &TouchPointer) {
        self.push(TargetEvent::HoverEnded(pointer.id()));
    }

    fn grasp_started(&self, pointer: &TouchPointer) {
        self.push(TargetEvent::GraspStarted(pointer.id()));
    }

    fn grasp_ended(&self, pointer: &TouchPointer) {
        self.push(TargetEvent::GraspEnded(pointer.id()));
    }

    fn closest_point_on_surface(&self, point: Vec3) -> Option<Vec3> {
        self.surface.get().closest_point(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrtouch_math::Quat;
    use mrtouch_core::PointerSample;
    use std::rc::Rc;

    #[test]
    fn sphere_surface_projects_outward() {
        let target = RecordingTarget::new(Surface::Sphere {
            center: Vec3::ZERO,
            radius: 2.0,
        });
        assert_eq!(
            target.closest_point_on_surface(Vec3::new(0.0, 5.0, 0.0)),
            Some(Vec3::new(0.0, 2.0, 0.0))
        );
        assert_eq!(
            target.closest_point_on_surface(Vec3::ZERO),
            Some(Vec3::new(0.0, 0.0, 2.0))
        );

        target.set_surface(Surface::Unavailable);
        assert_eq!(target.closest_point_on_surface(Vec3::ZERO), None);
    }

    #[test]
    fn counts_follow_events() {
        let target = RecordingTarget::at(Vec3::ZERO);
        let pointer = TouchPointer::new(PointerId(4));
        target.hover_started(&pointer);
        target.grasp_started(&pointer);
        target.grasp_ended(&pointer);
        target.hover_ended(&pointer);

        let counts = target.counts();
        assert_eq!(counts.hover_started, 1);
        assert_eq!(counts.grasp_ended, 1);
        assert_eq!(target.take()[1], TargetEvent::GraspStarted(PointerId(4)));
        assert!(target.events().is_empty());
    }

    #[test]
    fn handler_can_unsubscribe_itself() {
        let mut button =
            PressableButton::new(Vec3::ZERO, Quat::IDENTITY, 10.0, 10.0, 10.0, 5.0, 2.0);
        let quitter = Rc::new(RecordingHandler::new().unsubscribing_on_press());
        let stayer = Rc::new(RecordingHandler::new());
        button.subscribe(&quitter);
        button.subscribe(&stayer);

        let id = PointerId(1);
        button.update(0.1, &[PointerSample::new(id, Vec3::new(0.0, 0.0, 1.0))]);
        button.update(0.1, &[PointerSample::new(id, Vec3::new(0.0, 0.0, -6.0))]);

        assert_eq!(button.subscriber_count(), 1);
        assert_eq!(quitter.press_count(), 1);
        assert_eq!(stayer.press_count(), 1);

        button.update(0.1, &[]);
        button.update(10.0, &[]);
        assert_eq!(quitter.release_count(), 0);
        assert_eq!(stayer.release_count(), 1);
    }

    #[test]
    fn records_render_payloads() {
        let record = ButtonEvent::Released(None).to_record(FrameTick(2), "ok");
        assert_eq!(record.kind, "released");
        assert_eq!(record.payload, "none");

        let record = TargetEvent::GraspStarted(PointerId(7)).to_record(FrameTick(5), "knob");
        assert_eq!(record.payload, "pointer#7");
        assert_eq!(record.subject, "knob");
    }
}
