//! Pointer hover inside and outside the window.
//!
//! - [`pointer_hover`] handles window-local input: forwards hover to the
//!   overlays, switches the global hook off while the pointer is inside and
//!   on when it leaves.
//! - [`global_pointer`] drains the global hook's channel and enforces the
//!   deregistration deadline.

use bevy_ecs::prelude::*;
use log::debug;

use crate::host::{GlobalPointerHook, rect_contains};
use crate::resources::globalmouse::GlobalMouse;
use crate::resources::pointerinput::PointerInput;
use crate::resources::presentation::PresentationController;
use crate::resources::worldtime::WorldTime;

pub fn pointer_hover<G: GlobalPointerHook + 'static>(
    input: Res<PointerInput>,
    time: Res<WorldTime>,
    mut controller: ResMut<PresentationController>,
    mut mouse: ResMut<GlobalMouse>,
    mut hook: NonSendMut<G>,
) {
    if let Some(scene) = input.scene {
        mouse.disable(&mut *hook);
        mouse.pointer_inside = true;
        controller.pointer_moved(Some(scene));
    } else if input.left() {
        debug!("pointer left the window");
        mouse.pointer_inside = false;
        controller.pointer_moved(None);
        mouse.enable(&mut *hook);
        mouse.schedule_deregistration(time.elapsed);
    }
}

/// Re-dispatch global pointer positions onto the render thread.
///
/// A position over the window resumes hover handling; the first position
/// outside after that produces a single leave.
pub fn global_pointer<G: GlobalPointerHook + 'static>(
    time: Res<WorldTime>,
    mut controller: ResMut<PresentationController>,
    mut mouse: ResMut<GlobalMouse>,
    mut hook: NonSendMut<G>,
) {
    if !mouse.is_running() {
        return;
    }
    for event in mouse.poll() {
        let bounds = controller.transform().bounds();
        if rect_contains(&bounds, event.screen) {
            mouse.pointer_inside = true;
            let scene = controller.transform().screen_to_scene(event.screen);
            controller.pointer_moved(Some(scene));
        } else if mouse.pointer_inside {
            mouse.pointer_inside = false;
            controller.pointer_moved(None);
            mouse.schedule_deregistration(time.elapsed);
        }
    }
    if mouse.deregistration_due(time.elapsed) {
        mouse.disable(&mut *hook);
    }
}
