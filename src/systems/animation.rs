//! Animation ticking.
//!
//! [`animation`] advances every [`AnimationTrack`] by the frame delta from
//! [`WorldTime`]. Tracks are independent: each one swaps its own clips
//! through the shared [`DisplayList`] and no ordering between parts is
//! implied.

use bevy_ecs::prelude::*;

use crate::components::animation::AnimationTrack;
use crate::resources::displaylist::DisplayList;
use crate::resources::worldtime::WorldTime;

/// Advance every track by `WorldTime::delta`.
pub fn animation(
    mut tracks: Query<&mut AnimationTrack>,
    mut display: ResMut<DisplayList>,
    time: Res<WorldTime>,
) {
    if time.delta <= 0.0 {
        return;
    }
    for mut track in tracks.iter_mut() {
        track.tick(time.delta, &mut *display);
    }
}
