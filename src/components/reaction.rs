//! Floating emoji reaction component.
//!
//! A [`FloatingReaction`] draws a glyph that pops in, rises, wobbles and fades
//! out over its lifetime. The motion follows [`FloatingReaction::track`]:
//!
//! | progress | scale | rotation | opacity | rise   |
//! |----------|-------|----------|---------|--------|
//! | 0%       | 0.0   | 0°       | 0.0     | 0      |
//! | 10%      | 1.2   | 10°      | 1.0     | 0      |
//! | 90%      | 0.8   | -10°     | 0.8     | -100   |
//! | 100%     | 0.3   | -20°     | 0.0     | -150   |
//!
//! Burst reactions additionally drift by `travel` over their lifetime.
//!
//! # Related
//!
//! - [`crate::systems::reaction::floating_reaction_system`] – ages and removes reactions
//! - [`crate::reactions`] – catalog and reaction effects

use std::time::Duration;

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::tween::{Easing, Keyframe, Keyframes};

#[derive(Component, Clone, Debug)]
pub struct FloatingReaction {
    pub glyph: String,
    /// Glyph size in pixels at scale 1.0.
    pub size: f32,
    pub duration: Duration,
    pub elapsed: Duration,
    /// Total drift over the lifetime.
    pub travel: Vec2,
    pub track: Keyframes,
}

/// Resolved look of a reaction for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionPose {
    /// Offset from the reaction origin.
    pub offset: Vec2,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
}

impl FloatingReaction {
    pub fn new(glyph: impl Into<String>, size: f32, duration: Duration) -> Self {
        FloatingReaction {
            glyph: glyph.into(),
            size,
            duration,
            elapsed: Duration::ZERO,
            travel: Vec2::ZERO,
            track: Self::float_track(),
        }
    }

    pub fn with_travel(mut self, travel: Vec2) -> Self {
        self.travel = travel;
        self
    }

    /// The pop-rise-fade track shared by all floating reactions.
    pub fn float_track() -> Keyframes {
        Keyframes::new(
            [
                Keyframe::new(0.0, 0.0, 0.0, 0.0, 0.0),
                Keyframe::new(0.1, 1.2, 10.0, 1.0, 0.0),
                Keyframe::new(0.9, 0.8, -10.0, 0.8, -100.0),
                Keyframe::new(1.0, 0.3, -20.0, 0.0, -150.0),
            ],
            Easing::STANDARD,
        )
    }

    /// Normalized progress through the lifetime.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn pose(&self) -> ReactionPose {
        let t = self.progress();
        let k = self.track.sample(t);
        ReactionPose {
            offset: Vec2::new(k.dx, k.dy) + self.travel * t,
            scale: k.scale,
            rotation: k.rotation,
            opacity: k.opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_pose_at_start_is_invisible() {
        let r = FloatingReaction::new("💕", 40.0, Duration::from_millis(2000));
        let p = r.pose();
        assert!(approx_eq(p.scale, 0.0));
        assert!(approx_eq(p.opacity, 0.0));
    }

    #[test]
    fn test_pose_at_keyframe_offsets() {
        let mut r = FloatingReaction::new("💕", 40.0, Duration::from_millis(1000));
        r.elapsed = Duration::from_millis(100);
        let p = r.pose();
        assert!(approx_eq(p.scale, 1.2));
        assert!(approx_eq(p.opacity, 1.0));

        r.elapsed = Duration::from_millis(1000);
        let p = r.pose();
        assert!(approx_eq(p.offset.y, -150.0));
        assert!(approx_eq(p.opacity, 0.0));
        assert!(r.is_expired());
    }

    #[test]
    fn test_travel_is_added_proportionally() {
        let mut r = FloatingReaction::new("✨", 30.0, Duration::from_millis(1000))
            .with_travel(Vec2::new(100.0, 0.0));
        r.elapsed = Duration::from_millis(500);
        assert!(approx_eq(r.pose().offset.x, 50.0));
    }

    #[test]
    fn test_zero_duration_is_expired() {
        let r = FloatingReaction::new("🎉", 30.0, Duration::ZERO);
        assert!(r.is_expired());
        assert!(approx_eq(r.progress(), 1.0));
    }
}
