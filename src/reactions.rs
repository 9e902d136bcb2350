//! Emoji reactions.
//!
//! Reactions are emoji glyphs that pop in, float upwards while wobbling and
//! fade out. They live in the same world as the confetti and are drawn below
//! it. This module holds the reaction catalog, the reaction methods of
//! [`ParticleAnimator`] and the [`DoubleClickDetector`] used to fire quick
//! love reactions from pointer input.

use std::time::Duration;

use glam::Vec2;
use log::info;
use rustc_hash::FxHashMap;

use crate::animator::ParticleAnimator;
use crate::color::Color;
use crate::components::scheduledstep::CancelToken;
use crate::events::effect::{Anchor, Effect};
use crate::resources::effectrng::EffectRng;
use crate::sequence::Sequence;

pub const REACTION_SIZE: f32 = 40.0;
pub const REACTION_DURATION: Duration = Duration::from_millis(2000);

pub const EMOJI_BURST_RADIUS: f32 = 100.0;
pub const DEFAULT_EMOJI_BURST_COUNT: u32 = 8;
pub const BURST_REACTION_SIZE: f32 = 30.0;
pub const BURST_REACTION_DURATION: Duration = Duration::from_millis(1500);
pub const BURST_STAGGER: Duration = Duration::from_millis(50);

pub const EMOJI_RAIN_TICK: Duration = Duration::from_millis(200);
pub const EMOJI_RAIN_SPAWN_Y: f32 = -50.0;
/// Glyph size range in pixels.
pub const EMOJI_RAIN_SIZE: (f32, f32) = (20.0, 40.0);
/// Lifetime range in milliseconds.
pub const EMOJI_RAIN_DURATION_MS: (u64, u64) = (3000, 5000);

/// Delay between a triggered reaction and its confetti burst.
pub const TRIGGER_BURST_DELAY_MS: u64 = 300;
pub const TRIGGER_BURST_COUNT: u32 = 10;
/// Glyphs whose triggered reaction also throws confetti.
pub const CONFETTI_GLYPHS: [&str; 3] = ["❤️", "💕", "🎉"];

pub const QUICK_LOVE_GLYPH: &str = "💕";
pub const QUICK_LOVE_BURST: u32 = 5;

pub const CELEBRATION_GLYPHS: [&str; 6] = ["🎉", "🎊", "✨", "💕", "❤️", "🌟"];

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionInfo {
    pub key: &'static str,
    pub glyph: &'static str,
    pub name: &'static str,
    /// Accent color for reaction pickers.
    pub color: Color,
}

const CATALOG: [(&str, &str, &str, &str); 10] = [
    ("love", "❤️", "Love", "#e91e63"),
    ("heart_eyes", "😍", "Heart Eyes", "#ff6b9d"),
    ("kiss", "😘", "Kiss", "#f06292"),
    ("heart", "💕", "Hearts", "#ff9a9e"),
    ("fire", "🔥", "Fire", "#ff5722"),
    ("sparkles", "✨", "Sparkles", "#ffc107"),
    ("smile", "😊", "Smile", "#4caf50"),
    ("party", "🎉", "Party", "#9c27b0"),
    ("rose", "🌹", "Rose", "#e91e63"),
    ("gift", "🎁", "Gift", "#3f51b5"),
];

/// The known reactions, in display order.
#[derive(Clone, Debug)]
pub struct ReactionCatalog {
    entries: Vec<ReactionInfo>,
    by_key: FxHashMap<&'static str, usize>,
}

impl Default for ReactionCatalog {
    fn default() -> Self {
        let entries: Vec<ReactionInfo> = CATALOG
            .iter()
            .map(|&(key, glyph, name, hex)| ReactionInfo {
                key,
                glyph,
                name,
                color: Color::from_hex(hex).unwrap_or(Color::WHITE),
            })
            .collect();
        let by_key = entries
            .iter()
            .enumerate()
            .map(|(i, info)| (info.key, i))
            .collect();
        ReactionCatalog { entries, by_key }
    }
}

impl ReactionCatalog {
    pub fn get(&self, key: &str) -> Option<&ReactionInfo> {
        self.by_key.get(key).map(|&i| &self.entries[i])
    }

    pub fn by_glyph(&self, glyph: &str) -> Option<&ReactionInfo> {
        self.entries.iter().find(|info| info.glyph == glyph)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactionInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fires on the second of two clicks less than the window apart.
///
/// Times are host timestamps; only their differences matter.
#[derive(Clone, Debug)]
pub struct DoubleClickDetector {
    window: Duration,
    first_click: Option<Duration>,
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl DoubleClickDetector {
    pub fn new(window: Duration) -> Self {
        DoubleClickDetector {
            window,
            first_click: None,
        }
    }

    /// Register a click at `now`; returns true on a double click.
    pub fn click(&mut self, now: Duration) -> bool {
        match self.first_click {
            Some(first) if now.saturating_sub(first) < self.window => {
                self.first_click = None;
                true
            }
            _ => {
                self.first_click = Some(now);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.first_click = None;
    }
}

/// Sound hook for reactions. Audio is not wired up; the call is only logged.
pub fn play_reaction_sound(glyph: &str) {
    info!("sound for {glyph} reaction");
}

fn reaction(glyph: &str, at: Anchor, size: f32, duration: Duration) -> Effect {
    Effect::Reaction {
        glyph: glyph.to_string(),
        at,
        size,
        duration_ms: duration.as_millis() as u64,
        travel: [0.0, 0.0],
    }
}

impl ParticleAnimator {
    /// One floating reaction with the default size and lifetime.
    pub fn floating_reaction(&mut self, glyph: &str, x: f32, y: f32) -> bool {
        self.play(reaction(
            glyph,
            Anchor::point(x, y),
            REACTION_SIZE,
            REACTION_DURATION,
        ))
    }

    /// A floating reaction with a custom size and lifetime.
    pub fn floating_reaction_with(
        &mut self,
        glyph: &str,
        x: f32,
        y: f32,
        size: f32,
        duration: Duration,
    ) -> bool {
        self.play(reaction(glyph, Anchor::point(x, y), size, duration))
    }

    /// `count` reactions fanning out from a point, 50 ms apart.
    pub fn emoji_burst(&mut self, glyph: &str, x: f32, y: f32, count: u32) -> Option<CancelToken> {
        self.play_sequence(Sequence::new().then(
            0,
            Effect::EmojiBurst {
                glyph: glyph.to_string(),
                at: Anchor::point(x, y),
                count,
            },
        ))
    }

    /// The full reaction: float, shake, maybe confetti, and a sound.
    pub fn trigger_reaction(&mut self, glyph: &str, x: f32, y: f32) -> Option<CancelToken> {
        let at = Anchor::point(x, y);
        let mut sequence = Sequence::new()
            .then(0, reaction(glyph, at, REACTION_SIZE, REACTION_DURATION))
            .then(0, Effect::ScreenShake);
        if CONFETTI_GLYPHS.contains(&glyph) {
            sequence = sequence.then(
                TRIGGER_BURST_DELAY_MS,
                Effect::Burst {
                    at,
                    count: TRIGGER_BURST_COUNT,
                },
            );
        }
        let token = self.play_sequence(sequence);
        if token.is_some() {
            play_reaction_sound(glyph);
        }
        token
    }

    /// Hearts and a little confetti at a click position.
    pub fn quick_love_reaction(&mut self, x: f32, y: f32) -> Option<CancelToken> {
        let at = Anchor::point(x, y);
        self.play_sequence(
            Sequence::new()
                .then(
                    0,
                    reaction(QUICK_LOVE_GLYPH, at, REACTION_SIZE, REACTION_DURATION),
                )
                .then(
                    0,
                    Effect::Burst {
                        at,
                        count: QUICK_LOVE_BURST,
                    },
                ),
        )
    }

    /// Emoji raining from the top edge for `duration`.
    pub fn emoji_rain(&mut self, glyph: &str, duration: Duration, intensity: u32) -> bool {
        self.play(Effect::EmojiRain {
            glyph: glyph.to_string(),
            duration_ms: duration.as_millis() as u64,
            intensity,
        })
    }

    /// Six emoji bursts around the center, then sparkle rain.
    pub fn celebration_mode(&mut self) -> Option<CancelToken> {
        let center = self.viewport().center();
        let offsets: Vec<Vec2> = {
            let mut rng = self.world_mut().resource_mut::<EffectRng>();
            CELEBRATION_GLYPHS
                .iter()
                .map(|_| Vec2::new((rng.0.f32() - 0.5) * 200.0, (rng.0.f32() - 0.5) * 100.0))
                .collect()
        };

        let mut sequence = Sequence::new();
        for (i, (glyph, offset)) in CELEBRATION_GLYPHS.iter().zip(offsets).enumerate() {
            let at = center + offset;
            sequence = sequence.then(
                i as u64 * 200,
                Effect::EmojiBurst {
                    glyph: glyph.to_string(),
                    at: Anchor::point(at.x, at.y),
                    count: 6,
                },
            );
        }
        sequence = sequence.then(
            1000,
            Effect::EmojiRain {
                glyph: "✨".to_string(),
                duration_ms: 2000,
                intensity: 2,
            },
        );
        self.play_sequence(sequence)
    }
}
