#![warn(missing_docs)]
//! Glue between touch pointers and pressable buttons.
//!
//! [`ButtonTarget`] exposes a [`PressableButton`](mrtouch_button::PressableButton)
//! as a touch target, and [`InteractionScene`] runs the per-frame loop:
//! overlap, hover, push, lock.

mod button_target;
mod scene;

pub use button_target::ButtonTarget;
pub use scene::InteractionScene;
