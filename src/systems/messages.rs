//! Message balloon timing.

use bevy_ecs::prelude::*;

use crate::resources::messages::MessageQueue;
use crate::resources::worldtime::WorldTime;

/// Reveal due lines and expire old ones.
pub fn update_messages(mut queue: ResMut<MessageQueue>, time: Res<WorldTime>) {
    queue.update(time.elapsed);
}
