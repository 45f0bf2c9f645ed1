//! Render-thread clock.
//!
//! Updated once per frame by
//! [`update_world_time`](crate::systems::time::update_world_time). Animation
//! ticking, message scheduling and the global pointer deregistration timer all
//! read it, so every deadline in the crate is expressed in `elapsed` seconds.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Seconds since start-up, scaled. Kept in `f64` so frame deltas still
    /// register after weeks of uptime.
    pub elapsed: f64,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
