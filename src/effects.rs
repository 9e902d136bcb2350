//! Effect factories and the effect dispatcher.
//!
//! The factories turn effect parameters into [`ParticleBundle`]s without
//! touching the world, which keeps them easy to test with a seeded [`Rng`].
//! [`apply`] is the single place where an [`Effect`] changes the world:
//! particles are spawned with a fresh [`SpawnOrder`], timed producers become
//! [`RainSpawner`] or [`ScheduledStep`] entities, and reactions become
//! [`FloatingReaction`] entities.

use std::f32::consts::TAU;
use std::time::Duration;

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::components::particle::{ParticleBundle, SpawnOrder};
use crate::components::reaction::FloatingReaction;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::scheduledstep::{CancelToken, ScheduledStep};
use crate::components::spawner::{RainKind, RainSpawner};
use crate::components::sprite::{Shape, Sprite};
use crate::events::effect::{Anchor, Effect};
use crate::reactions::{
    BURST_REACTION_DURATION, BURST_REACTION_SIZE, BURST_STAGGER, EMOJI_BURST_RADIUS,
    EMOJI_RAIN_DURATION_MS, EMOJI_RAIN_SIZE, EMOJI_RAIN_SPAWN_Y, EMOJI_RAIN_TICK,
};
use crate::resources::animatorstate::AnimatorState;
use crate::resources::effectparams::{EffectParams, Palettes, Span};
use crate::resources::effectrng::EffectRng;
use crate::resources::screenshake::ScreenShake;
use crate::resources::viewport::Viewport;

/// Base confetti particle at `origin` with the default distributions.
pub fn confetti(rng: &mut Rng, params: &EffectParams, origin: Vec2) -> ParticleBundle {
    let c = &params.confetti;
    let velocity = Vec2::new(c.vx.sample(rng), c.vy.sample(rng));
    let shape = if rng.f32() < c.square_chance {
        Shape::Square
    } else {
        Shape::Circle
    };
    let color = Palettes::pick(&params.palettes.confetti, rng);
    ParticleBundle::new(origin)
        .with_body(
            RigidBody::new(velocity)
                .with_gravity(c.gravity)
                .with_friction(c.friction),
        )
        .with_decay(c.decay.sample(rng))
        .with_rotation(Rotation::new(c.rotation.sample(rng), c.spin.sample(rng)))
        .with_sprite(Sprite::new(c.size.sample(rng), color, shape))
}

pub fn burst(rng: &mut Rng, params: &EffectParams, origin: Vec2, count: u32) -> Vec<ParticleBundle> {
    (0..count)
        .map(|_| {
            let velocity = Vec2::new(params.burst.vx.sample(rng), params.burst.vy.sample(rng));
            confetti(rng, params, origin).with_velocity(velocity)
        })
        .collect()
}

/// One rain tick: `count` particles along the top edge.
pub fn rain_drops(
    rng: &mut Rng,
    params: &EffectParams,
    viewport: Viewport,
    count: u32,
) -> Vec<ParticleBundle> {
    (0..count)
        .map(|_| {
            let origin = Vec2::new(rng.f32() * viewport.width(), params.rain.spawn_y);
            let vx = params.confetti.vx.sample(rng);
            let vy = params.rain.vy.sample(rng);
            confetti(rng, params, origin).with_velocity(Vec2::new(vx, vy))
        })
        .collect()
}

/// Point `i` of `count` on the parametric heart curve, in curve units.
///
/// `y` grows downwards, so the lobes point up on screen.
pub fn heart_curve(i: u32, count: u32) -> Vec2 {
    let t = TAU * i as f32 / count.max(1) as f32;
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    Vec2::new(x, y)
}

pub fn heart_burst(
    rng: &mut Rng,
    params: &EffectParams,
    origin: Vec2,
    count: u32,
) -> Vec<ParticleBundle> {
    let h = &params.heart;
    (0..count)
        .map(|i| {
            let curve = heart_curve(i, count);
            let velocity = Vec2::new(
                curve.x * h.scale + h.jitter_x.sample(rng),
                curve.y * h.scale - h.lift.sample(rng),
            );
            let color = Palettes::pick(&params.palettes.heart, rng);
            let mut p = confetti(rng, params, origin).with_velocity(velocity);
            p.sprite.color = color;
            p
        })
        .collect()
}

/// Unit vector for slot `i` of `count` evenly spaced directions.
fn ring_direction(i: u32, count: u32) -> Vec2 {
    let angle = TAU * i as f32 / count.max(1) as f32;
    Vec2::new(angle.cos(), angle.sin())
}

pub fn firework(
    rng: &mut Rng,
    params: &EffectParams,
    origin: Vec2,
    count: u32,
) -> Vec<ParticleBundle> {
    let f = &params.firework;
    (0..count)
        .map(|i| {
            let velocity = ring_direction(i, count) * f.speed.sample(rng);
            let size = f.size.sample(rng);
            let mut p = confetti(rng, params, origin).with_velocity(velocity);
            p.body.gravity = f.gravity;
            p.sprite.size = size;
            p
        })
        .collect()
}

/// Ring `wave` of a love explosion; outer waves are faster.
pub fn love_wave(
    rng: &mut Rng,
    params: &EffectParams,
    origin: Vec2,
    wave: u32,
) -> Vec<ParticleBundle> {
    let l = &params.love;
    let speed = (wave + 1) as f32 * l.speed_step;
    (0..l.per_wave)
        .map(|i| {
            let velocity = ring_direction(i, l.per_wave) * speed;
            let color = Palettes::pick(&params.palettes.love, rng);
            let size = l.size.sample(rng);
            confetti(rng, params, origin)
                .with_velocity(velocity)
                .with_sprite(Sprite::new(size, color, Shape::Heart))
        })
        .collect()
}

/// Run `f` with the effect rng, the parameters and the viewport.
fn with_rng<R>(world: &mut World, f: impl FnOnce(&mut Rng, &EffectParams, Viewport) -> R) -> R {
    world.resource_scope(|world: &mut World, mut rng: Mut<EffectRng>| {
        let params = world.resource::<EffectParams>();
        let viewport = *world.resource::<Viewport>();
        f(&mut rng.0, params, viewport)
    })
}

/// Spawn particles in order, stamping each with a fresh [`SpawnOrder`].
pub fn spawn_particles(world: &mut World, bundles: Vec<ParticleBundle>) -> usize {
    let count = bundles.len();
    for bundle in bundles {
        let order = world.resource_mut::<AnimatorState>().next_order();
        world.spawn((bundle, SpawnOrder(order)));
    }
    world.resource_mut::<AnimatorState>().stats.particles_spawned += count as u64;
    count
}

fn spawn_reaction(world: &mut World, reaction: FloatingReaction, at: Vec2) {
    let order = {
        let mut state = world.resource_mut::<AnimatorState>();
        state.stats.reactions_spawned += 1;
        state.next_order()
    };
    world.spawn((reaction, MapPosition::from(at), SpawnOrder(order)));
}

/// Fire `effect` after `delay`, or right away when the delay is zero.
pub fn schedule(world: &mut World, delay: Duration, effect: Effect, token: &CancelToken) {
    if token.is_cancelled() {
        return;
    }
    if delay.is_zero() {
        apply(world, effect, token);
    } else {
        world.spawn(ScheduledStep::new(delay, effect, token.clone()));
    }
}

/// Apply one effect to the world.
///
/// Sub-steps the effect stages (love explosion waves, emoji burst stagger)
/// are tied to `token`.
pub fn apply(world: &mut World, effect: Effect, token: &CancelToken) {
    debug!("applying effect {}", effect.name());
    world.resource_mut::<AnimatorState>().active = true;

    match effect {
        Effect::Burst { at, count } => {
            let bundles = with_rng(world, |rng, params, vp| {
                burst(rng, params, at.resolve(vp), count)
            });
            spawn_particles(world, bundles);
        }
        Effect::Rain {
            duration_ms,
            intensity,
        } => {
            let tick = world.resource::<EffectParams>().rain.tick;
            world.spawn(RainSpawner::new(
                RainKind::Confetti,
                Duration::from_millis(duration_ms),
                tick,
                intensity,
            ));
        }
        Effect::RainDrops { count } => {
            let bundles = with_rng(world, |rng, params, vp| rain_drops(rng, params, vp, count));
            spawn_particles(world, bundles);
        }
        Effect::HeartBurst { at, count } => {
            let bundles = with_rng(world, |rng, params, vp| {
                heart_burst(rng, params, at.resolve(vp), count)
            });
            spawn_particles(world, bundles);
        }
        Effect::Firework { at, count } => {
            let bundles = with_rng(world, |rng, params, vp| {
                firework(rng, params, at.resolve(vp), count)
            });
            spawn_particles(world, bundles);
        }
        Effect::LoveExplosion { at } => {
            // Pin the origin so every wave starts from the same point.
            let origin = at.resolve(*world.resource::<Viewport>());
            let love = world.resource::<EffectParams>().love.clone();
            for wave in 0..love.waves {
                schedule(
                    world,
                    love.wave_gap * wave,
                    Effect::LoveWave {
                        at: Anchor::point(origin.x, origin.y),
                        wave,
                    },
                    token,
                );
            }
        }
        Effect::LoveWave { at, wave } => {
            let bundles = with_rng(world, |rng, params, vp| {
                love_wave(rng, params, at.resolve(vp), wave)
            });
            spawn_particles(world, bundles);
        }
        Effect::Reaction {
            glyph,
            at,
            size,
            duration_ms,
            travel,
        } => {
            let origin = at.resolve(*world.resource::<Viewport>());
            let reaction = FloatingReaction::new(glyph, size, Duration::from_millis(duration_ms))
                .with_travel(Vec2::from(travel));
            spawn_reaction(world, reaction, origin);
        }
        Effect::EmojiBurst { glyph, at, count } => {
            let (origin, travels) = with_rng(world, |rng, _, vp| {
                let distance = Span::new(EMOJI_BURST_RADIUS * 0.5, EMOJI_BURST_RADIUS);
                let travels: Vec<Vec2> = (0..count)
                    .map(|i| ring_direction(i, count) * distance.sample(rng))
                    .collect();
                (at.resolve(vp), travels)
            });
            for (i, travel) in travels.into_iter().enumerate() {
                schedule(
                    world,
                    BURST_STAGGER * i as u32,
                    Effect::Reaction {
                        glyph: glyph.clone(),
                        at: Anchor::point(origin.x, origin.y),
                        size: BURST_REACTION_SIZE,
                        duration_ms: BURST_REACTION_DURATION.as_millis() as u64,
                        travel: travel.to_array(),
                    },
                    token,
                );
            }
        }
        Effect::EmojiRain {
            glyph,
            duration_ms,
            intensity,
        } => {
            world.spawn(RainSpawner::new(
                RainKind::Emoji(glyph),
                Duration::from_millis(duration_ms),
                EMOJI_RAIN_TICK,
                intensity,
            ));
        }
        Effect::EmojiDrops { glyph, count } => {
            let drops: Vec<(Vec2, f32, Duration)> = with_rng(world, |rng, _, vp| {
                let size = Span::new(EMOJI_RAIN_SIZE.0, EMOJI_RAIN_SIZE.1);
                (0..count)
                    .map(|_| {
                        let at = Vec2::new(rng.f32() * vp.width(), EMOJI_RAIN_SPAWN_Y);
                        let ms = rng.u64(EMOJI_RAIN_DURATION_MS.0..=EMOJI_RAIN_DURATION_MS.1);
                        (at, size.sample(rng), Duration::from_millis(ms))
                    })
                    .collect()
            });
            for (at, size, duration) in drops {
                spawn_reaction(world, FloatingReaction::new(glyph.clone(), size, duration), at);
            }
        }
        Effect::ScreenShake => {
            world.insert_resource(ScreenShake::default());
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

    fn fixed_params() -> EffectParams {
        let mut p = EffectParams::default();
        p.heart.jitter_x = Span::fixed(0.0);
        p.heart.lift = Span::fixed(0.0);
        p.firework.speed = Span::fixed(10.0);
        p
    }

    #[test]
    fn test_confetti_samples_within_defaults() {
        let params = EffectParams::default();
        let mut rng = Rng::with_seed(3);
        for _ in 0..200 {
            let p = confetti(&mut rng, &params, Vec2::ZERO);
            assert!(params.confetti.vx.contains(p.body.velocity.x));
            assert!(params.confetti.vy.contains(p.body.velocity.y));
            assert!(params.confetti.decay.contains(p.fade.decay));
            assert!(params.confetti.size.contains(p.sprite.size));
            assert!(matches!(p.sprite.shape, Shape::Circle | Shape::Square));
            assert!(params.palettes.confetti.contains(&p.sprite.color));
            assert!(approx_eq(p.fade.opacity, 1.0));
        }
    }

    #[test]
    fn test_burst_velocity_ranges() {
        let params = EffectParams::default();
        let mut rng = Rng::with_seed(11);
        let ps = burst(&mut rng, &params, Vec2::new(5.0, 6.0), 100);
        assert_eq!(ps.len(), 100);
        for p in &ps {
            assert_eq!(p.position.pos, Vec2::new(5.0, 6.0));
            assert!((-6.0..=6.0).contains(&p.body.velocity.x));
            assert!((-20.0..=-5.0).contains(&p.body.velocity.y));
        }
    }

    #[test]
    fn test_rain_drops_start_above_top_edge() {
        let params = EffectParams::default();
        let vp = Viewport::new(400, 300);
        let mut rng = Rng::with_seed(5);
        for p in rain_drops(&mut rng, &params, vp, 50) {
            assert!(approx_eq(p.position.pos.y, -20.0));
            assert!((0.0..=400.0).contains(&p.position.pos.x));
            assert!((2.0..=5.0).contains(&p.body.velocity.y));
        }
    }

    #[test]
    fn test_heart_curve_shape() {
        // Top of the curve at t = 0 points up on screen.
        let top = heart_curve(0, 4);
        assert!(approx_eq(top.x, 0.0));
        assert!(approx_eq(top.y, -5.0));
        // t = pi/2 is the widest point.
        let side = heart_curve(1, 4);
        assert!(approx_eq(side.x, 16.0));
        assert!(approx_eq(side.y, -4.0));
    }

    #[test]
    fn test_heart_burst_velocity_is_scaled_curve() {
        let params = fixed_params();
        let mut rng = Rng::with_seed(1);
        let ps = heart_burst(&mut rng, &params, Vec2::ZERO, 4);
        let v = ps[1].body.velocity;
        assert!(approx_eq(v.x, 16.0 * 0.3));
        assert!(approx_eq(v.y, -4.0 * 0.3));
        for p in &ps {
            assert!(params.palettes.heart.contains(&p.sprite.color));
        }
    }

    #[test]
    fn test_heart_burst_finite_for_single_particle() {
        let params = EffectParams::default();
        let mut rng = Rng::with_seed(2);
        let ps = heart_burst(&mut rng, &params, Vec2::ZERO, 1);
        assert_eq!(ps.len(), 1);
        assert!(ps[0].body.velocity.is_finite());
    }

    #[test]
    fn test_firework_is_radial_with_low_gravity() {
        let params = fixed_params();
        let mut rng = Rng::with_seed(9);
        let ps = firework(&mut rng, &params, Vec2::ZERO, 8);
        for p in &ps {
            assert!(approx_eq(p.body.velocity.length(), 10.0));
            assert!(approx_eq(p.body.gravity, 0.2));
            assert!((2.0..=8.0).contains(&p.sprite.size));
        }
        assert!(approx_eq(ps[0].body.velocity.x, 10.0));
        assert!(approx_eq(ps[2].body.velocity.y, 10.0));
    }

    #[test]
    fn test_love_wave_speed_grows_with_wave() {
        let params = EffectParams::default();
        let mut rng = Rng::with_seed(4);
        let ps = love_wave(&mut rng, &params, Vec2::ZERO, 2);
        assert_eq!(ps.len(), 20);
        for p in &ps {
            assert!(approx_eq(p.body.velocity.length(), 12.0));
            assert_eq!(p.sprite.shape, Shape::Heart);
            assert!(params.palettes.love.contains(&p.sprite.color));
        }
    }
}
