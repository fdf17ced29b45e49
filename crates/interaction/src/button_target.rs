//! A pressable button seen as a touch target.

use mrtouch_button::{ButtonConfig, PressableButton};
use mrtouch_core::{PointerId, PointerSample};
use mrtouch_math::{Aabb, Pose, Vec3};
use mrtouch_pointer::{TouchPointer, TouchTarget};
use std::cell::{Ref, RefCell, RefMut};
use tracing::debug;

/// Pressable button driven by the pointers hovering it.
///
/// Pointers hover the button's hover volume: the box swept by the face from
/// rest to maximum travel, extended `hover_depth` in front of the face. Every
/// hovering pointer is fed to [`PressableButton::update`].
///
/// Button handlers run while the button is mutably borrowed and must use the
/// `&PressableButton` they are given rather than [`ButtonTarget::button`].
#[derive(Debug)]
pub struct ButtonTarget {
    button: RefCell<PressableButton>,
    hover_depth: f32,
    /// Hovering pointers, in the order they arrived.
    active: RefCell<Vec<PointerId>>,
}

impl ButtonTarget {
    /// Wrap `button`. Negative hover depths are treated as zero.
    pub fn new(button: PressableButton, hover_depth: f32) -> Self {
        Self {
            button: RefCell::new(button),
            hover_depth: hover_depth.max(0.0),
            active: RefCell::new(Vec::new()),
        }
    }

    /// Build the button from configuration.
    pub fn from_config(rest_pose: Pose, config: &ButtonConfig) -> Self {
        Self::new(
            PressableButton::from_config(rest_pose, config),
            config.hover_depth,
        )
    }

    /// The wrapped button.
    pub fn button(&self) -> Ref<'_, PressableButton> {
        self.button.borrow()
    }

    /// The wrapped button, mutably (enable, remote press, move).
    pub fn button_mut(&self) -> RefMut<'_, PressableButton> {
        self.button.borrow_mut()
    }

    /// Distance in front of the face that still counts as hovering.
    pub fn hover_depth(&self) -> f32 {
        self.hover_depth
    }

    /// Pointers currently hovering the button.
    pub fn active_pointers(&self) -> Vec<PointerId> {
        self.active.borrow().clone()
    }

    /// Hover volume in the button's local space.
    pub fn hover_volume(&self) -> Aabb {
        let button = self.button.borrow();
        hover_volume(&button, self.hover_depth)
    }

    /// Feed the hovering pointers among `pointers` to the button.
    pub fn update(&self, delta_time: f32, pointers: &[TouchPointer]) {
        let samples: Vec<PointerSample> = {
            let active = self.active.borrow();
            pointers
                .iter()
                .filter(|pointer| active.contains(&pointer.id()))
                .map(TouchPointer::sample)
                .collect()
        };

        self.button.borrow_mut().update(delta_time, &samples);
    }
}

fn hover_volume(button: &PressableButton, hover_depth: f32) -> Aabb {
    let half_width = button.width() * 0.5;
    let half_height = button.height() * 0.5;
    Aabb::new(
        Vec3::new(-half_width, -half_height, -button.max_push_distance()),
        Vec3::new(half_width, half_height, hover_depth),
    )
}

impl TouchTarget for ButtonTarget {
    fn hover_started(&self, pointer: &TouchPointer) {
        let mut active = self.active.borrow_mut();
        if !active.contains(&pointer.id()) {
            active.push(pointer.id());
            debug!(pointer = %pointer.id(), "pointer entered button");
        }
    }

    fn hover_ended(&self, pointer: &TouchPointer) {
        let mut active = self.active.borrow_mut();
        let before = active.len();
        active.retain(|id| *id != pointer.id());
        if active.len() != before {
            debug!(pointer = %pointer.id(), "pointer left button");
        }
    }

    fn closest_point_on_surface(&self, point: Vec3) -> Option<Vec3> {
        // Busy while its own handlers run.
        let button = self.button.try_borrow().ok()?;
        let pose = button.rest_pose();
        let local = hover_volume(&button, self.hover_depth).closest_point(pose.to_local(point));
        Some(pose.to_world(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrtouch_math::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn target() -> ButtonTarget {
        let button = PressableButton::new(Vec3::ZERO, Quat::IDENTITY, 2.0, 2.0, 1.0, 0.5, 0.2);
        ButtonTarget::new(button, 0.5)
    }

    #[test]
    fn closest_point_uses_hover_volume() {
        let target = target();
        let inside = Vec3::new(0.5, 0.5, 0.25);
        assert_eq!(target.closest_point_on_surface(inside), Some(inside));
        assert_eq!(
            target.closest_point_on_surface(Vec3::new(0.0, 0.0, 3.0)),
            Some(Vec3::new(0.0, 0.0, 0.5))
        );
        assert_eq!(
            target.closest_point_on_surface(Vec3::new(5.0, 0.0, -5.0)),
            Some(Vec3::new(1.0, 0.0, -1.0))
        );
    }

    #[test]
    fn closest_point_follows_rest_pose() {
        let button = PressableButton::new(
            Vec3::new(0.0, 0.0, 10.0),
            Quat::from_rotation_y(FRAC_PI_2),
            2.0,
            2.0,
            1.0,
            0.5,
            0.2,
        );
        let target = ButtonTarget::new(button, 0.5);
        // Local +Z maps to world +X.
        let closest = target
            .closest_point_on_surface(Vec3::new(4.0, 0.0, 10.0))
            .expect("button answers");
        assert!(closest.abs_diff_eq(Vec3::new(0.5, 0.0, 10.0), 1e-5));
    }

    #[test]
    fn hover_tracks_active_pointers_once() {
        let target = target();
        let first = TouchPointer::new(PointerId(1));
        let second = TouchPointer::new(PointerId(2));

        target.hover_started(&first);
        target.hover_started(&second);
        target.hover_started(&first);
        assert_eq!(target.active_pointers(), vec![PointerId(1), PointerId(2)]);

        target.hover_ended(&first);
        assert_eq!(target.active_pointers(), vec![PointerId(2)]);
    }

    #[test]
    fn update_only_feeds_hovering_pointers() {
        let target = target();
        let mut pointers = [
            TouchPointer::new(PointerId(1)).with_position(Vec3::new(0.0, 0.0, 0.25)),
            TouchPointer::new(PointerId(2)).with_position(Vec3::new(0.0, 0.0, 0.25)),
        ];
        target.hover_started(&pointers[0]);
        target.update(0.1, &pointers);

        pointers[0].set_position(Vec3::new(0.0, 0.0, -0.75));
        pointers[1].set_position(Vec3::new(0.0, 0.0, -0.9));
        target.update(0.1, &pointers);

        let button = target.button();
        assert_eq!(button.touching_pointer(), Some(PointerId(1)));
        assert!((button.current_push_distance() - 0.75).abs() < 1e-5);
        assert!(button.is_pressed());
    }

    #[test]
    fn negative_hover_depth_is_clamped() {
        let button = PressableButton::new(Vec3::ZERO, Quat::IDENTITY, 2.0, 2.0, 1.0, 0.5, 0.2);
        let target = ButtonTarget::new(button, -1.0);
        assert_eq!(target.hover_depth(), 0.0);
        assert_eq!(target.hover_volume().max.z, 0.0);
    }
}
