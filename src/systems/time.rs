//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta.
use std::time::Duration;

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta. The system applies the
/// current `time_scale` and writes `elapsed`, `delta` and `frame_count`.
pub fn update_world_time(world: &mut World, dt: Duration) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = if wt.time_scale == 1.0 {
        dt
    } else {
        dt.mul_f32(wt.time_scale.max(0.0))
    };
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
