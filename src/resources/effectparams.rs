//! Injectable distributions for every randomized effect parameter.
//!
//! Effects never hard-code their ranges: each draws from a [`Span`] stored in
//! the [`EffectParams`] resource, using the animator's seeded
//! [`EffectRng`](super::effectrng::EffectRng). Tests pin a span to a single
//! value (`Span::fixed`) to assert exact outcomes, and the INI configuration
//! overrides the defaults at startup.

use std::time::Duration;

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

use crate::color::Color;

/// Closed range `[min, max]` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    /// Range between `a` and `b`, in either order.
    pub fn new(a: f32, b: f32) -> Self {
        Span {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn fixed(v: f32) -> Self {
        Span { min: v, max: v }
    }

    /// Symmetric range `[-half, half]`.
    pub fn around_zero(half: f32) -> Self {
        Span::new(-half, half)
    }

    /// Sample a value in the range.
    /// If the range is smaller than EPSILON, returns min directly.
    #[inline]
    pub fn sample(&self, rng: &mut Rng) -> f32 {
        let range = self.max - self.min;
        if range < f32::EPSILON {
            return self.min;
        }
        self.min + rng.f32() * range
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Base confetti particle, shared by every confetti effect.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiParams {
    pub gravity: f32,
    pub friction: f32,
    pub vx: Span,
    pub vy: Span,
    pub decay: Span,
    pub size: Span,
    pub rotation: Span,
    pub spin: Span,
    /// Probability of a square instead of a circle.
    pub square_chance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BurstParams {
    pub vx: Span,
    pub vy: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RainParams {
    pub tick: Duration,
    /// Vertical spawn position, slightly above the top edge.
    pub spawn_y: f32,
    pub vy: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeartParams {
    /// Multiplier from heart-curve units to pixels per tick.
    pub scale: f32,
    pub jitter_x: Span,
    /// Extra upward speed subtracted from the curve's vertical component.
    pub lift: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FireworkParams {
    pub speed: Span,
    pub gravity: f32,
    pub size: Span,
    /// Default origin height as a fraction of the viewport.
    pub origin_height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoveParams {
    pub waves: u32,
    pub per_wave: u32,
    pub wave_gap: Duration,
    /// Speed of wave `n` is `(n + 1) * speed_step`.
    pub speed_step: f32,
    pub size: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palettes {
    pub confetti: Vec<Color>,
    pub heart: Vec<Color>,
    pub love: Vec<Color>,
}

impl Palettes {
    /// Pick a random color; white for an empty palette.
    pub fn pick(colors: &[Color], rng: &mut Rng) -> Color {
        if colors.is_empty() {
            return Color::WHITE;
        }
        colors[rng.usize(0..colors.len())]
    }
}

fn hex_palette(hexes: &[&str]) -> Vec<Color> {
    hexes.iter().filter_map(|h| Color::from_hex(h)).collect()
}

impl Default for Palettes {
    fn default() -> Self {
        Palettes {
            confetti: hex_palette(&[
                "#ff6b9d", "#ff9a9e", "#ffc1cc", "#ffb3ba", "#bae1ff", "#b3d9ff", "#c7ceea",
            ]),
            heart: hex_palette(&["#ff6b9d", "#ff9a9e", "#ffc1cc", "#ffb3ba"]),
            love: hex_palette(&["#ff1744", "#ff6b9d", "#ff9a9e", "#ffc1cc"]),
        }
    }
}

/// All effect distributions.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct EffectParams {
    pub confetti: ConfettiParams,
    pub burst: BurstParams,
    pub rain: RainParams,
    pub heart: HeartParams,
    pub firework: FireworkParams,
    pub love: LoveParams,
    pub palettes: Palettes,
}

impl Default for EffectParams {
    fn default() -> Self {
        EffectParams {
            confetti: ConfettiParams {
                gravity: 0.3,
                friction: 0.99,
                vx: Span::around_zero(3.0),
                vy: Span::new(-10.0, -2.0),
                decay: Span::new(0.01, 0.03),
                size: Span::new(4.0, 12.0),
                rotation: Span::new(0.0, 360.0),
                spin: Span::around_zero(5.0),
                square_chance: 0.5,
            },
            burst: BurstParams {
                vx: Span::around_zero(6.0),
                vy: Span::new(-20.0, -5.0),
            },
            rain: RainParams {
                tick: Duration::from_millis(100),
                spawn_y: -20.0,
                vy: Span::new(2.0, 5.0),
            },
            heart: HeartParams {
                scale: 0.3,
                jitter_x: Span::around_zero(1.0),
                lift: Span::new(0.0, 3.0),
            },
            firework: FireworkParams {
                speed: Span::new(4.0, 12.0),
                gravity: 0.2,
                size: Span::new(2.0, 8.0),
                origin_height: 0.3,
            },
            love: LoveParams {
                waves: 3,
                per_wave: 20,
                wave_gap: Duration::from_millis(300),
                speed_step: 4.0,
                size: Span::new(6.0, 16.0),
            },
            palettes: Palettes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_orders_bounds() {
        let s = Span::new(5.0, -5.0);
        assert_eq!(s.min, -5.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn test_fixed_span_always_returns_value() {
        let mut rng = Rng::with_seed(7);
        let s = Span::fixed(2.5);
        for _ in 0..10 {
            assert_eq!(s.sample(&mut rng), 2.5);
        }
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut rng = Rng::with_seed(42);
        let s = Span::new(-20.0, -5.0);
        for _ in 0..1000 {
            assert!(s.contains(s.sample(&mut rng)));
        }
    }

    #[test]
    fn test_default_palettes_parse() {
        let p = Palettes::default();
        assert_eq!(p.confetti.len(), 7);
        assert_eq!(p.heart.len(), 4);
        assert_eq!(p.love.len(), 4);
    }

    #[test]
    fn test_pick_from_empty_palette_is_white() {
        let mut rng = Rng::with_seed(1);
        assert_eq!(Palettes::pick(&[], &mut rng), Color::WHITE);
    }
}
