//! Presentation notifications.
//!
//! [`PresentationChangedEvent`] is triggered after every committed scale or
//! move, once the overlays have been laid out. [`GestureCompletedEvent`]
//! marks the end of a user gesture (a wheel notch or a drag release) and is
//! what the persistence observer listens to.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::Vector2;

use crate::resources::characonfig::CharaConfig;
use crate::resources::overlay::PresentationChange;
use crate::resources::presentation::PresentationController;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationChangedEvent {
    pub change: PresentationChange,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureCompletedEvent {}

/// Primary button released over the window without dragging it.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerClickEvent {
    /// Clicked point in image space.
    pub image: Vector2,
}

/// Observer that stores the current scale and position in [`CharaConfig`]
/// and writes it to disk.
///
/// Saving failures are logged and otherwise ignored.
pub fn persist_presentation_observer(
    _trigger: On<GestureCompletedEvent>,
    controller: Res<PresentationController>,
    config: Option<ResMut<CharaConfig>>,
) {
    let Some(mut config) = config else {
        return;
    };
    config.set_persisted(controller.persisted());
    if let Err(e) = config.save_to_file() {
        warn!("{}", e);
    }
}
