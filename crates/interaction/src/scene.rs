//! Frame loop tying pointers to targets.

use crate::ButtonTarget;
use mrtouch_core::{FrameTick, PointerId};
use mrtouch_pointer::{same_target, TargetRef, TouchPointer};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// Pointers, buttons and other targets stepped together one frame at a time.
#[derive(Default)]
pub struct InteractionScene {
    pointers: Vec<TouchPointer>,
    buttons: Vec<Rc<ButtonTarget>>,
    /// Every target including buttons, in registration order.
    targets: Vec<TargetRef>,
    /// Pointers whose hover lock was set by the scene.
    scene_locks: HashSet<PointerId>,
    current_tick: FrameTick,
}

impl InteractionScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pointer. Returns false if a pointer with the same id exists.
    pub fn add_pointer(&mut self, pointer: TouchPointer) -> bool {
        if self.pointer(pointer.id()).is_some() {
            return false;
        }
        debug!(pointer = %pointer.id(), "pointer added");
        self.pointers.push(pointer);
        true
    }

    /// Remove a pointer, ending its hover.
    pub fn remove_pointer(&mut self, id: PointerId) -> Option<TouchPointer> {
        let index = self.pointers.iter().position(|p| p.id() == id)?;
        let mut pointer = self.pointers.remove(index);
        pointer.release();
        self.scene_locks.remove(&id);
        debug!(pointer = %id, "pointer removed");
        Some(pointer)
    }

    /// Look up a pointer.
    pub fn pointer(&self, id: PointerId) -> Option<&TouchPointer> {
        self.pointers.iter().find(|p| p.id() == id)
    }

    /// Look up a pointer to move it or change its grasp.
    pub fn pointer_mut(&mut self, id: PointerId) -> Option<&mut TouchPointer> {
        self.pointers.iter_mut().find(|p| p.id() == id)
    }

    /// All pointers in insertion order.
    pub fn pointers(&self) -> &[TouchPointer] {
        &self.pointers
    }

    /// Register a button and return a shared handle to it.
    pub fn add_button(&mut self, button: ButtonTarget) -> Rc<ButtonTarget> {
        let button = Rc::new(button);
        self.buttons.push(Rc::clone(&button));
        let target: TargetRef = button.clone();
        self.targets.push(target);
        button
    }

    /// All buttons in registration order.
    pub fn buttons(&self) -> &[Rc<ButtonTarget>] {
        &self.buttons
    }

    /// Register a target that is not a button.
    pub fn add_target(&mut self, target: TargetRef) {
        self.targets.push(target);
    }

    /// All targets, buttons included, in registration order.
    pub fn targets(&self) -> &[TargetRef] {
        &self.targets
    }

    /// Unregister a target (or button). Pointers hovering it let go on the next step.
    pub fn remove_target(&mut self, target: &TargetRef) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| !same_target(t, target));
        self.buttons
            .retain(|b| Rc::as_ptr(b) as *const () != Rc::as_ptr(target) as *const ());
        self.targets.len() != before
    }

    /// Frames stepped so far.
    pub fn tick(&self) -> FrameTick {
        self.current_tick
    }

    /// Run one frame of `delta_time` seconds.
    pub fn step(&mut self, delta_time: f32) {
        for pointer in &mut self.pointers {
            let position = pointer.position();
            let radius = pointer.touch_radius();
            let overlapping: Vec<TargetRef> = self
                .targets
                .iter()
                .filter(|target| {
                    target
                        .closest_point_on_surface(position)
                        .is_some_and(|point| point.distance(position) <= radius)
                })
                .cloned()
                .collect();

            pointer.tick(&overlapping);
        }

        for button in &self.buttons {
            button.update(delta_time, &self.pointers);
        }

        for pointer in &mut self.pointers {
            let id = pointer.id();
            let touching = self
                .buttons
                .iter()
                .any(|button| button.button().touching_pointer() == Some(id));

            if touching {
                if !pointer.hover_locked() {
                    pointer.set_hover_locked(true);
                    self.scene_locks.insert(id);
                }
            } else if self.scene_locks.remove(&id) {
                pointer.set_hover_locked(false);
            }
        }

        trace!(tick = self.current_tick.0, "scene stepped");
        self.current_tick = self.current_tick.advance(1);
    }
}
