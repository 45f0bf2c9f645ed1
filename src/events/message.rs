//! Message balloon requests.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::resources::messages::MessageQueue;
use crate::resources::worldtime::WorldTime;

/// Show `lines` one after another in the message panel.
///
/// With `replace` set, pending and shown lines are dropped first. Lines
/// pushed with `always_show` stay until cleared.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ShowMessageEvent {
    pub lines: Vec<String>,
    pub always_show: bool,
    pub replace: bool,
}

impl ShowMessageEvent {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            always_show: false,
            replace: false,
        }
    }
}

pub fn show_message_observer(
    trigger: On<ShowMessageEvent>,
    mut queue: ResMut<MessageQueue>,
    time: Res<WorldTime>,
) {
    let event = trigger.event();
    if event.replace {
        queue.clear_all();
    }
    queue.push_words(event.lines.iter().cloned(), event.always_show, time.elapsed);
}
