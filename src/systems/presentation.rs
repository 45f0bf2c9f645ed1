//! Zoom and drag gestures, plus re-centring on request.
//!
//! Both systems are generic over the [`HostWindow`] stored as a non-send
//! resource, so the raylib binary runs them with its `RaylibHandle` and tests
//! with a fake window.
//!
//! Each committed change triggers a [`PresentationChangedEvent`]. A
//! [`GestureCompletedEvent`] follows every zoom notch and every drag that
//! actually moved the window.

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::events::presentation::{
    GestureCompletedEvent, PointerClickEvent, PresentationChangedEvent,
};
use crate::host::HostWindow;
use crate::resources::pointerinput::PointerInput;
use crate::resources::presentation::PresentationController;

/// Apply the wheel delta anchored at the pointer.
pub fn zoom_gesture<H: HostWindow + 'static>(
    input: Res<PointerInput>,
    mut controller: ResMut<PresentationController>,
    mut host: NonSendMut<H>,
    mut commands: Commands,
) {
    if input.wheel == 0.0 {
        return;
    }
    let Some(scene) = input.scene else {
        return;
    };
    match controller.zoom(input.wheel, scene, &mut *host) {
        Ok(Some(change)) => {
            commands.trigger(PresentationChangedEvent { change });
            commands.trigger(GestureCompletedEvent {});
        }
        Ok(None) => {}
        Err(e) => error!("zoom rejected: {}", e),
    }
}

/// Press starts a drag, motion moves the window, release ends it.
///
/// A release without motion counts as a click on the image.
pub fn drag_gesture<H: HostWindow + 'static>(
    input: Res<PointerInput>,
    mut controller: ResMut<PresentationController>,
    mut host: NonSendMut<H>,
    mut commands: Commands,
) {
    if input.primary_pressed && input.scene.is_some() {
        controller.begin_drag(input.screen);
    }

    if input.primary_down && controller.is_dragging() {
        if let Some(change) = controller.drag_to(input.screen, &mut *host) {
            commands.trigger(PresentationChangedEvent { change });
        }
    }

    if input.primary_released {
        if controller.end_drag() {
            debug!("drag finished at {:?}", controller.transform().position());
            commands.trigger(GestureCompletedEvent {});
        } else if let Some(scene) = input.scene {
            let image = controller.click(scene);
            debug!("click at image ({},{})", image.x, image.y);
            commands.trigger(PointerClickEvent { image });
        }
    }
}

/// Centre the window on its current screen and persist the new position.
///
/// Runs on the whole world so the host can call it from a key handler
/// outside the schedule. Does nothing if `H` is not in the world.
pub fn recenter<H: HostWindow + 'static>(world: &mut World) {
    let change = world.resource_scope(|world, mut controller: Mut<PresentationController>| {
        let mut host = world.get_non_send_resource_mut::<H>()?;
        Some(controller.center_on_screen(&mut *host))
    });
    let Some(change) = change else {
        return;
    };
    debug!("window re-centred");
    world.trigger(PresentationChangedEvent { change });
    world.trigger(GestureCompletedEvent {});
}
