//! Button event handlers and the subscriber list.

use crate::PressableButton;
use mrtouch_core::PointerId;
use mrtouch_math::Vec3;
use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

/// Receives button notifications. Every method defaults to a no-op.
///
/// Handlers are called synchronously from inside the button's mutating
/// methods and may call [`PressableButton::unsubscribe`] on the button they
/// receive, including to remove themselves.
pub trait ButtonHandler {
    /// The first pointer was seen near the button.
    fn on_hover_start(&self, _button: &PressableButton, _pointer: PointerId) {}

    /// The last pointer was lost.
    fn on_hover_end(&self, _button: &PressableButton, _pointer: PointerId) {}

    /// A pointer started pushing the button.
    fn on_touch_start(&self, _button: &PressableButton, _pointer: PointerId, _touch_point: Vec3) {}

    /// The pointer that was pushing the button stopped doing so.
    fn on_touch_end(&self, _button: &PressableButton, _pointer: PointerId) {}

    /// An unpressed button reached the pressed distance.
    fn on_pressed(&self, _button: &PressableButton, _pointer: Option<PointerId>, _touch_point: Vec3) {}

    /// A pressed button came back to the released distance.
    fn on_released(&self, _button: &PressableButton, _pointer: Option<PointerId>) {}

    /// The button was enabled.
    fn on_enabled(&self, _button: &PressableButton) {}

    /// The button was disabled.
    fn on_disabled(&self, _button: &PressableButton) {}
}

type Slot = Option<Weak<dyn ButtonHandler>>;

/// Subscribers, tombstoned on unsubscribe and compacted between dispatches.
///
/// Slots are never removed while a dispatch may be in progress, so indices
/// stay stable for the loop in [`HandlerList::dispatch`].
#[derive(Default)]
pub(crate) struct HandlerList {
    slots: RefCell<Vec<Slot>>,
}

fn address_of(handler: &Weak<dyn ButtonHandler>) -> *const () {
    handler.as_ptr() as *const ()
}

impl HandlerList {
    /// Add a handler. Returns false if it is already subscribed.
    pub(crate) fn subscribe(&self, handler: Weak<dyn ButtonHandler>) -> bool {
        let address = address_of(&handler);
        let mut slots = self.slots.borrow_mut();
        if slots.iter().flatten().any(|slot| address_of(slot) == address) {
            return false;
        }
        slots.push(Some(handler));
        true
    }

    /// Tombstone the handler living at `address`. Returns false if not found.
    pub(crate) fn unsubscribe(&self, address: *const ()) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|h| address_of(h) == address))
        {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Call `notify` on every live handler subscribed when the dispatch began.
    pub(crate) fn dispatch(&self, mut notify: impl FnMut(&dyn ButtonHandler)) {
        let count = self.slots.borrow().len();
        for index in 0..count {
            // The borrow must end before the callback runs: handlers may unsubscribe.
            let handler = self
                .slots
                .borrow()
                .get(index)
                .and_then(|slot| slot.as_ref())
                .and_then(Weak::upgrade);
            if let Some(handler) = handler {
                notify(handler.as_ref());
            }
        }
    }

    /// Drop tombstones and handlers that no longer exist.
    pub(crate) fn compact(&self) {
        self.slots
            .borrow_mut()
            .retain(|slot| slot.as_ref().is_some_and(|h| h.strong_count() > 0));
    }

    /// Number of live subscribers.
    pub(crate) fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .flatten()
            .filter(|h| h.strong_count() > 0)
            .count()
    }
}

impl fmt::Debug for HandlerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerList")
            .field("slots", &self.slots.borrow().len())
            .field("live", &self.len())
            .finish()
    }
}
