//! Effect requests exchanged between timers and the animator.
//!
//! Every visual effect the animator can play is described by an [`Effect`]
//! value. Callers usually go through the
//! [`ParticleAnimator`](crate::animator::ParticleAnimator) methods, but timed
//! producers inside the ECS (rain spawners, scheduled sequence steps) write
//! [`EffectRequest`] messages which the animator drains and applies once per
//! tick.
//!
//! Effects are serializable so sequences can be described in JSON:
//!
//! ```json
//! { "kind": "burst", "at": { "relative": [0.5, 0.3] }, "count": 30 }
//! ```

use bevy_ecs::message::Message;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::scheduledstep::CancelToken;
use crate::resources::viewport::Viewport;

/// Where an effect originates.
///
/// Relative anchors are fractions of the viewport and are resolved when the
/// effect fires, so a staged step still lands in the right place after a
/// resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Viewport center.
    #[default]
    Center,
    /// Absolute surface coordinates in pixels.
    Point([f32; 2]),
    /// Fractions of the viewport width and height.
    Relative([f32; 2]),
}

impl Anchor {
    pub fn point(x: f32, y: f32) -> Self {
        Anchor::Point([x, y])
    }

    pub fn relative(fx: f32, fy: f32) -> Self {
        Anchor::Relative([fx, fy])
    }

    pub fn resolve(self, viewport: Viewport) -> Vec2 {
        match self {
            Anchor::Center => viewport.center(),
            Anchor::Point([x, y]) => Vec2::new(x, y),
            Anchor::Relative([fx, fy]) => Vec2::new(viewport.width() * fx, viewport.height() * fy),
        }
    }
}

/// A single effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Instant confetti burst.
    Burst { at: Anchor, count: u32 },
    /// Time-bounded confetti rain from the top edge.
    Rain { duration_ms: u64, intensity: u32 },
    /// One rain spawn tick: `count` particles along the top edge.
    RainDrops { count: u32 },
    /// Confetti whose initial velocities trace a heart.
    HeartBurst { at: Anchor, count: u32 },
    /// Radial explosion with reduced gravity.
    Firework { at: Anchor, count: u32 },
    /// Three staged rings of heart-shaped particles.
    LoveExplosion { at: Anchor },
    /// One ring of a love explosion. `wave` starts at 0.
    LoveWave { at: Anchor, wave: u32 },
    /// A floating emoji that rises, spins and fades out.
    Reaction {
        glyph: String,
        at: Anchor,
        size: f32,
        duration_ms: u64,
        /// Offset travelled over the reaction lifetime, in addition to the rise.
        #[serde(default)]
        travel: [f32; 2],
    },
    /// A ring of staggered reactions around a point.
    EmojiBurst { glyph: String, at: Anchor, count: u32 },
    /// Time-bounded emoji rain from the top edge.
    EmojiRain {
        glyph: String,
        duration_ms: u64,
        intensity: u32,
    },
    /// One emoji rain spawn tick.
    EmojiDrops { glyph: String, count: u32 },
    /// Short horizontal shake of the whole surface.
    ScreenShake,
}

impl Effect {
    /// Short, stable name used in logs and by the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Burst { .. } => "burst",
            Effect::Rain { .. } => "rain",
            Effect::RainDrops { .. } => "rain_drops",
            Effect::HeartBurst { .. } => "heart_burst",
            Effect::Firework { .. } => "firework",
            Effect::LoveExplosion { .. } => "love_explosion",
            Effect::LoveWave { .. } => "love_wave",
            Effect::Reaction { .. } => "reaction",
            Effect::EmojiBurst { .. } => "emoji_burst",
            Effect::EmojiRain { .. } => "emoji_rain",
            Effect::EmojiDrops { .. } => "emoji_drops",
            Effect::ScreenShake => "screen_shake",
        }
    }
}

/// An effect waiting to be applied by the animator.
///
/// Staged effects keep the token of the sequence that produced them, so
/// sub-steps they schedule (love explosion waves, emoji burst stagger) are
/// cancelled together with the sequence.
#[derive(Message, Clone, Debug)]
pub struct EffectRequest {
    pub effect: Effect,
    pub token: Option<CancelToken>,
}

impl EffectRequest {
    pub fn new(effect: Effect) -> Self {
        EffectRequest {
            effect,
            token: None,
        }
    }

    pub fn with_token(effect: Effect, token: CancelToken) -> Self {
        EffectRequest {
            effect,
            token: Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_anchor_resolution() {
        let vp = Viewport::new(800, 600);
        let c = Anchor::Center.resolve(vp);
        assert!(approx_eq(c.x, 400.0) && approx_eq(c.y, 300.0));
        let p = Anchor::point(10.0, 20.0).resolve(vp);
        assert!(approx_eq(p.x, 10.0) && approx_eq(p.y, 20.0));
        let r = Anchor::relative(0.2, 0.3).resolve(vp);
        assert!(approx_eq(r.x, 160.0) && approx_eq(r.y, 180.0));
    }

    #[test]
    fn test_effect_json_shape() {
        let json = r#"{ "kind": "burst", "at": { "relative": [0.5, 0.3] }, "count": 30 }"#;
        let effect: Effect = serde_json::from_str(json).unwrap();
        assert_eq!(
            effect,
            Effect::Burst {
                at: Anchor::relative(0.5, 0.3),
                count: 30
            }
        );
        assert_eq!(effect.name(), "burst");
    }

    #[test]
    fn test_unit_anchor_and_reaction_defaults() {
        let json = r#"{ "kind": "reaction", "glyph": "💕", "at": "center", "size": 40.0, "duration_ms": 2000 }"#;
        let effect: Effect = serde_json::from_str(json).unwrap();
        match effect {
            Effect::Reaction { at, travel, .. } => {
                assert_eq!(at, Anchor::Center);
                assert_eq!(travel, [0.0, 0.0]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
