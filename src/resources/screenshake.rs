//! Screen shake resource.
//!
//! While present, the render pass offsets every sprite horizontally by the
//! current sample of a short wobble track (0 → -2 → +2 → 0 px). The
//! [`screen_shake_system`](crate::systems::reaction::screen_shake_system)
//! advances it and removes it when done.

use std::time::Duration;

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::components::tween::{Easing, Keyframe, Keyframes};

pub const SHAKE_DURATION: Duration = Duration::from_millis(300);

#[derive(Resource, Clone, Debug)]
pub struct ScreenShake {
    pub elapsed: Duration,
    pub duration: Duration,
    pub track: Keyframes,
}

impl Default for ScreenShake {
    fn default() -> Self {
        ScreenShake {
            elapsed: Duration::ZERO,
            duration: SHAKE_DURATION,
            track: Keyframes::new(
                [
                    Keyframe::shift(0.0, 0.0),
                    Keyframe::shift(0.25, -2.0),
                    Keyframe::shift(0.75, 2.0),
                    Keyframe::shift(1.0, 0.0),
                ],
                Easing::EASE_IN_OUT,
            ),
        }
    }
}

impl ScreenShake {
    pub fn offset(&self) -> Vec2 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        Vec2::new(self.track.sample(t).dx, 0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
