//! Frame clock update.
//!
//! Advances the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! once per rendered frame, before the schedule runs.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Longest frame delta fed to the engine. A window dragged across monitors
/// or a suspended laptop can stall the loop for seconds; clamping keeps the
/// animation catch-up bounded.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is the unscaled frame delta in seconds. Negative deltas count as
/// zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.clamp(0.0, MAX_FRAME_DELTA) * wt.time_scale;
    wt.elapsed += f64::from(scaled_dt);
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
