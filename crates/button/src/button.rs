//! Push-distance model for a flat rectangular button.

use crate::handler::{ButtonHandler, HandlerList};
use crate::ButtonConfig;
use mrtouch_core::{PointerId, PointerSample};
use mrtouch_math::{within_half_extents_xy, Aabb, Plane, Pose, Quat, Vec2, Vec3};
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Release speed used when none is configured, in distance units per second.
pub const DEFAULT_RECOVERY_SPEED: f32 = 0.5;

/// Interaction state, mostly for driving visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// No pointer nearby.
    Default,
    /// At least one pointer is tracked by the button.
    Hovered,
    /// A pointer is pushing the face.
    Contacted,
    /// Past the pressed distance and not yet released.
    Pressed,
    /// Ignoring all input.
    Disabled,
}

/// Pointer position from the previous frame.
#[derive(Debug, Clone, Copy)]
struct CachedPointer {
    id: PointerId,
    position: Vec3,
}

/// How far one pointer pushes the button, and where it touches the face.
#[derive(Debug, Clone, Copy)]
struct Contact {
    distance: f32,
    point: Vec3,
}

/// A flat, rectangular button that can be pushed via touch pointers.
///
/// The rest pose's local +Z axis is the front normal; the button travels
/// along local -Z when pushed. Width runs along local X, height along local Y.
#[derive(Debug)]
pub struct PressableButton {
    pose: Pose,
    width: f32,
    height: f32,
    max_push_distance: f32,
    pressed_distance: f32,
    released_distance: f32,
    current_push_distance: f32,
    recovery_speed: f32,
    /// Pointer producing the deepest push this frame.
    touching_pointer: Option<PointerId>,
    is_pressed: bool,
    enabled: bool,
    /// Pointer holding a remote press, if any.
    remote_pointer: Option<PointerId>,
    pointers: Vec<CachedPointer>,
    handlers: HandlerList,
}

impl PressableButton {
    /// Create a button at rest.
    ///
    /// Negative (or NaN) extents are treated as zero, and distances are
    /// clamped so that
    /// `0 <= released_distance <= pressed_distance <= max_push_distance`.
    pub fn new(
        rest_position: Vec3,
        orientation: Quat,
        width: f32,
        height: f32,
        max_push_distance: f32,
        pressed_distance: f32,
        released_distance: f32,
    ) -> Self {
        let max_push_distance = max_push_distance.max(0.0);
        let pressed_distance = pressed_distance.clamp(0.0, max_push_distance);
        let released_distance = released_distance.clamp(0.0, pressed_distance);

        Self {
            pose: Pose::new(rest_position, orientation),
            width: width.max(0.0),
            height: height.max(0.0),
            max_push_distance,
            pressed_distance,
            released_distance,
            current_push_distance: 0.0,
            recovery_speed: DEFAULT_RECOVERY_SPEED,
            touching_pointer: None,
            is_pressed: false,
            enabled: true,
            remote_pointer: None,
            pointers: Vec::new(),
            handlers: HandlerList::default(),
        }
    }

    /// Create a button at `rest_pose` from a config.
    pub fn from_config(rest_pose: Pose, config: &ButtonConfig) -> Self {
        let mut button = Self::new(
            rest_pose.position,
            rest_pose.orientation,
            config.width,
            config.height,
            config.max_push_distance,
            config.pressed_distance(),
            config.released_distance(),
        );
        button.set_recovery_speed(config.recovery_speed);
        button
    }

    /// Subscribe a handler. The button only keeps a weak reference, so a
    /// dropped handler silently stops receiving events.
    ///
    /// Returns false if the handler was already subscribed.
    pub fn subscribe<H: ButtonHandler + 'static>(&self, handler: &Rc<H>) -> bool {
        let weak: Weak<H> = Rc::downgrade(handler);
        self.handlers.subscribe(weak)
    }

    /// Unsubscribe a handler. Safe to call from inside a notification.
    ///
    /// Returns false if the handler was not subscribed.
    pub fn unsubscribe<H: ButtonHandler + ?Sized>(&self, handler: &H) -> bool {
        self.handlers
            .unsubscribe(handler as *const H as *const ())
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Pose at rest, i.e. when not pushed.
    pub fn rest_pose(&self) -> Pose {
        self.pose
    }

    /// Move the button while keeping the current push distance.
    pub fn set_rest_transform(&mut self, position: Vec3, orientation: Quat) {
        self.pose = Pose::new(position, orientation);
    }

    /// Rest position pushed back along the front normal by the current push distance.
    pub fn current_position(&self) -> Vec3 {
        self.pose.position - self.pose.forward() * self.current_push_distance
    }

    /// Extent along local X.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Extent along local Y.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Maximum travel.
    pub fn max_push_distance(&self) -> f32 {
        self.max_push_distance
    }

    /// Distance at which the button gets pressed.
    pub fn pressed_distance(&self) -> f32 {
        self.pressed_distance
    }

    /// Distance at which a pressed button gets released.
    pub fn released_distance(&self) -> f32 {
        self.released_distance
    }

    /// How far the button is pushed in right now.
    pub fn current_push_distance(&self) -> f32 {
        self.current_push_distance
    }

    /// Release speed in distance units per second.
    pub fn recovery_speed(&self) -> f32 {
        self.recovery_speed
    }

    /// Set the release speed. Negative values are treated as zero.
    pub fn set_recovery_speed(&mut self, speed: f32) {
        self.recovery_speed = speed.max(0.0);
    }

    /// Pointer producing the deepest push during the last update.
    pub fn touching_pointer(&self) -> Option<PointerId> {
        self.touching_pointer
    }

    /// True between a pressed and a released notification.
    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Current interaction state.
    pub fn state(&self) -> ButtonState {
        if !self.enabled {
            ButtonState::Disabled
        } else if self.is_pressed {
            ButtonState::Pressed
        } else if self.touching_pointer.is_some() {
            ButtonState::Contacted
        } else if !self.pointers.is_empty() {
            ButtonState::Hovered
        } else {
            ButtonState::Default
        }
    }

    /// Enable or disable the button.
    ///
    /// Disabling drops all pointer state and returns the button to rest
    /// without raising a released notification.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }

        if enabled {
            self.enabled = true;
            debug!("button enabled");
            self.handlers.dispatch(|h| h.on_enabled(self));
        } else {
            self.is_pressed = false;
            self.remote_pointer = None;
            self.touching_pointer = None;
            self.pointers.clear();
            self.current_push_distance = 0.0;
            self.enabled = false;
            debug!("button disabled");
            self.handlers.dispatch(|h| h.on_disabled(self));
        }

        self.handlers.compact();
    }

    /// Press the button on behalf of a pointer that is not touching it.
    ///
    /// Returns false if the button is disabled or already held remotely.
    pub fn press_remote(&mut self, pointer: PointerId) -> bool {
        if !self.enabled || self.remote_pointer.is_some() {
            return false;
        }

        self.remote_pointer = Some(pointer);
        self.current_push_distance = self.pressed_distance;
        if !self.is_pressed {
            let point = self.current_position();
            self.set_pressed(true, Some(pointer), point);
        }

        self.handlers.compact();
        true
    }

    /// End a remote press started by the same pointer.
    pub fn release_remote(&mut self, pointer: PointerId) -> bool {
        if self.remote_pointer != Some(pointer) {
            return false;
        }

        self.remote_pointer = None;
        self.current_push_distance = 0.0;
        if self.is_pressed {
            self.set_pressed(false, Some(pointer), Vec3::ZERO);
        }

        self.handlers.compact();
        true
    }

    /// Update the button with the latest positions of all relevant pointers.
    ///
    /// `delta_time` is the time since the previous call. Pointers not listed
    /// are forgotten; a pointer seen for the first time never pushes the
    /// button, since its direction of travel is unknown.
    pub fn update(&mut self, delta_time: f32, pointers: &[PointerSample]) {
        if !self.enabled {
            return;
        }

        let was_hovered = !self.pointers.is_empty();
        let previous_touching = self.touching_pointer;
        let mut first_new = None;
        let mut deepest: Option<(PointerId, Contact)> = None;
        let mut target_distance = 0.0;

        for sample in pointers {
            let contact = match self.pointers.iter_mut().find(|p| p.id == sample.id) {
                Some(cached) => {
                    let previous = std::mem::replace(&mut cached.position, sample.position);
                    self.contact(previous, sample.position)
                }
                None => {
                    self.pointers.push(CachedPointer {
                        id: sample.id,
                        position: sample.position,
                    });
                    first_new.get_or_insert(sample.id);
                    None
                }
            };

            if let Some(contact) = contact {
                if contact.distance > target_distance {
                    target_distance = contact.distance;
                    deepest = Some((sample.id, contact));
                }
            }
        }

        debug_assert!(target_distance >= 0.0 && target_distance <= self.max_push_distance);

        let mut last_lost = None;
        self.pointers.retain(|cached| {
            let seen = pointers.iter().any(|p| p.id == cached.id);
            if !seen {
                last_lost = Some(cached.id);
            }
            seen
        });

        self.touching_pointer = deepest.map(|(id, _)| id);

        if !was_hovered {
            if let Some(pointer) = first_new {
                self.handlers.dispatch(|h| h.on_hover_start(self, pointer));
            }
        }

        if previous_touching != self.touching_pointer {
            if let Some(pointer) = previous_touching {
                self.handlers.dispatch(|h| h.on_touch_end(self, pointer));
            }
            if let Some((pointer, contact)) = deepest {
                self.handlers
                    .dispatch(|h| h.on_touch_start(self, pointer, contact.point));
            }
        }

        if self.remote_pointer.is_none() {
            let touch_point = deepest.map_or(Vec3::ZERO, |(_, contact)| contact.point);
            self.apply_target_distance(delta_time.max(0.0), target_distance, touch_point);
        }

        if was_hovered && self.pointers.is_empty() {
            if let Some(pointer) = last_lost {
                self.handlers.dispatch(|h| h.on_hover_end(self, pointer));
            }
        }

        trace!(
            push = self.current_push_distance,
            pressed = self.is_pressed,
            "button updated"
        );

        // Only now is it safe to drop slots unsubscribed during dispatch.
        self.handlers.compact();
    }

    /// Snap forward to deeper pushes, decay towards shallower ones, and raise
    /// pressed/released on threshold crossings.
    fn apply_target_distance(&mut self, delta_time: f32, target_distance: f32, touch_point: Vec3) {
        let previous = self.current_push_distance;

        if target_distance > previous {
            self.current_push_distance = target_distance;

            if !self.is_pressed
                && self.current_push_distance >= self.pressed_distance
                && previous < self.pressed_distance
            {
                self.set_pressed(true, self.touching_pointer, touch_point);
            }
        } else {
            self.current_push_distance =
                target_distance.max(previous - delta_time * self.recovery_speed);

            if self.is_pressed
                && self.current_push_distance <= self.released_distance
                && previous > self.released_distance
            {
                self.set_pressed(false, self.touching_pointer, touch_point);
            }
        }
    }

    fn set_pressed(&mut self, pressed: bool, pointer: Option<PointerId>, touch_point: Vec3) {
        self.is_pressed = pressed;
        if pressed {
            debug!(pointer = ?pointer, push = self.current_push_distance, "button pressed");
            self.handlers
                .dispatch(|h| h.on_pressed(self, pointer, touch_point));
        } else {
            debug!(pointer = ?pointer, push = self.current_push_distance, "button released");
            self.handlers.dispatch(|h| h.on_released(self, pointer));
        }
    }

    /// Push produced by a pointer that moved from `start` to `end` (world space).
    fn contact(&self, start: Vec3, end: Vec3) -> Option<Contact> {
        let start_local = self.pose.to_local(start);
        let end_local = self.pose.to_local(end);

        // Local +Z points away from the button, so pushing in grows these.
        let start_distance = -start_local.z;
        let end_distance = -end_local.z;
        let current = self.current_push_distance;

        let distance = if end_distance > current {
            if start_distance > current {
                return None;
            }

            // Only count pointers that crossed the face inside its rectangle.
            let face = Plane::new(Vec3::Z, current);
            let crossing = face.intersect_segment(start_local, end_local)?;
            if !within_half_extents_xy(crossing, self.half_size()) {
                return None;
            }
            end_distance.min(self.max_push_distance)
        } else if end_distance > 0.0 {
            if !self.push_volume().contains(end_local) {
                return None;
            }
            end_distance
        } else {
            return None;
        };

        Some(Contact {
            distance,
            point: self
                .pose
                .to_world(Vec3::new(end_local.x, end_local.y, -distance)),
        })
    }

    fn half_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Box swept by the face between rest and maximum travel, in local space.
    fn push_volume(&self) -> Aabb {
        let half_depth = self.max_push_distance * 0.5;
        Aabb::from_center_half_extents(
            Vec3::new(0.0, 0.0, -half_depth),
            self.half_size().extend(half_depth),
        )
    }
}
