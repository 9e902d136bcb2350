use std::time::Duration;

use bevy_ecs::prelude::Resource;

/// Animator clock.
///
/// Durations keep integer precision so timers fire on exact boundaries: ten
/// 100 ms steps always add up to exactly one second.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: Duration,
    pub delta: Duration,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
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
