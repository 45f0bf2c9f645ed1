//! Click reaction.
//!
//! A [`PointerClickEvent`] plays the [`ClickReaction`] clip once on every part
//! that has it and asks the message panel to show the reaction lines.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animation::AnimationTrack;
use crate::events::clip::PlayClipEvent;
use crate::events::message::ShowMessageEvent;
use crate::events::presentation::PointerClickEvent;
use crate::resources::clickreaction::ClickReaction;

pub fn react_to_click_observer(
    trigger: On<PointerClickEvent>,
    reaction: Res<ClickReaction>,
    tracks: Query<(Entity, &AnimationTrack)>,
    mut commands: Commands,
) {
    let image = trigger.event().image;
    debug!("clicked at ({}, {})", image.x, image.y);
    for (entity, track) in tracks.iter() {
        let previous = track.current_clip().map(|c| c.name().to_string());
        if !track.has_clip(&reaction.clip)
            || previous.as_deref() == Some(reaction.clip.as_str())
        {
            continue;
        }
        commands.trigger(PlayClipEvent::now(entity, reaction.clip.clone()));
        if let Some(previous) = previous {
            commands.trigger(PlayClipEvent::at_loop_end(entity, previous));
        }
    }
    if !reaction.lines.is_empty() {
        commands.trigger(ShowMessageEvent::new(reaction.lines.clone()));
    }
}
