//! Pointer input from raylib.
//!
//! [`update_pointer_input`] reads the mouse each frame and writes
//! [`PointerInput`]. Raylib reports the mouse relative to the window, so the
//! screen position is rebuilt from the window position.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::resources::pointerinput::PointerInput;
use crate::resources::presentation::PresentationController;

/// Poll raylib for pointer input and update the `PointerInput` resource.
pub fn update_pointer_input(
    mut input: ResMut<PointerInput>,
    rl: NonSend<raylib::RaylibHandle>,
    controller: Res<PresentationController>,
) {
    input.advance();

    let local = rl.get_mouse_position();
    let window = rl.get_window_position();
    input.screen = Vector2 {
        x: window.x + local.x,
        y: window.y + local.y,
    };
    let inside = rl.is_cursor_on_screen() && controller.transform().contains_scene(local);
    input.scene = inside.then_some(local);

    input.wheel = rl.get_mouse_wheel_move();
    input.primary_pressed = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
    input.primary_down = rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT);
    input.primary_released = rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT);
}
