#![warn(missing_docs)]
//! Flat rectangular buttons pushed by touch pointers.
//!
//! A [`PressableButton`] is fed the positions of nearby pointers once per
//! frame. It works out how far the button face is pushed in, raises
//! pressed/released notifications with hysteresis, and springs back towards
//! rest at a limited speed once pointers retreat.
//!
//! ```rust
//! use mrtouch_button::PressableButton;
//! use mrtouch_core::{PointerId, PointerSample};
//! use mrtouch_math::{Quat, Vec3};
//!
//! let mut button = PressableButton::new(Vec3::ZERO, Quat::IDENTITY, 10.0, 10.0, 10.0, 5.0, 2.0);
//! let finger = PointerId(1);
//!
//! button.update(0.016, &[PointerSample::new(finger, Vec3::new(0.0, 0.0, 1.0))]);
//! button.update(0.016, &[PointerSample::new(finger, Vec3::new(0.0, 0.0, -6.0))]);
//!
//! assert!(button.is_pressed());
//! assert_eq!(button.current_push_distance(), 6.0);
//! ```

mod button;
mod config;
mod handler;

pub use button::{ButtonState, PressableButton, DEFAULT_RECOVERY_SPEED};
pub use config::ButtonConfig;
pub use handler::ButtonHandler;
