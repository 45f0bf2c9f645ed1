//! Clip switch requests.
//!
//! Anything that wants a body part to change clip (the host reacting to a
//! click, a chat reply, a timer) triggers a [`PlayClipEvent`]. The observer
//! resolves the entity's [`AnimationTrack`] and switches it through the
//! [`DisplayList`] compositor.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, error, warn};

use crate::components::animation::AnimationTrack;
use crate::resources::displaylist::DisplayList;

/// Request to play `clip` on the track of `entity`.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PlayClipEvent {
    pub entity: Entity,
    pub clip: String,
    /// Wait for the current clip's loop boundary instead of switching now.
    pub at_loop_end: bool,
}

impl PlayClipEvent {
    pub fn now(entity: Entity, clip: impl Into<String>) -> Self {
        Self {
            entity,
            clip: clip.into(),
            at_loop_end: false,
        }
    }

    pub fn at_loop_end(entity: Entity, clip: impl Into<String>) -> Self {
        Self {
            entity,
            clip: clip.into(),
            at_loop_end: true,
        }
    }
}

/// Observer that applies [`PlayClipEvent`]s.
///
/// Unknown clips are a programming error in the character definition; they
/// are logged and the track is left untouched.
pub fn play_clip_observer(
    trigger: On<PlayClipEvent>,
    mut tracks: Query<&mut AnimationTrack>,
    mut display: ResMut<DisplayList>,
) {
    let event = trigger.event();
    let Ok(mut track) = tracks.get_mut(event.entity) else {
        warn!("PlayClipEvent for {:?} without an animation track", event.entity);
        return;
    };
    debug!(
        "play '{}' on '{}' (at_loop_end={})",
        event.clip,
        track.part(),
        event.at_loop_end
    );
    let result = if event.at_loop_end {
        track.queue(&event.clip, &mut *display)
    } else {
        track.trigger(&event.clip, &mut *display)
    };
    if let Err(e) = result {
        error!("{}", e);
    }
}
