//! Per-frame pointer state.
//!
//! Filled by the host before the schedule runs (see
//! [`update_pointer_input`](crate::systems::input::update_pointer_input)) and
//! read by the gesture systems.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Pointer position in scene space while it is over the window.
    pub scene: Option<Vector2>,
    /// Pointer position in screen space.
    pub screen: Vector2,
    /// Wheel notches this frame, positive away from the user.
    pub wheel: f32,
    pub primary_pressed: bool,
    pub primary_down: bool,
    pub primary_released: bool,
    /// Whether the pointer was over the window last frame.
    pub was_inside: bool,
}

impl PointerInput {
    pub fn is_inside(&self) -> bool {
        self.scene.is_some()
    }

    /// Pointer entered or moved over the window this frame.
    pub fn entered(&self) -> bool {
        self.scene.is_some() && !self.was_inside
    }

    /// Pointer left the window this frame.
    pub fn left(&self) -> bool {
        self.scene.is_none() && self.was_inside
    }

    /// Roll the inside flag over to the next frame.
    pub fn advance(&mut self) {
        self.was_inside = self.scene.is_some();
        self.wheel = 0.0;
        self.primary_pressed = false;
        self.primary_released = false;
    }
}
