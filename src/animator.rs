//! The particle animator.
//!
//! [`ParticleAnimator`] is the explicit context object that owns one effect
//! layer: an ECS [`World`] holding particles, reactions and timed producers,
//! the two schedules that advance them, and a lazily acquired
//! [`DrawSurface`].
//!
//! The host drives it by calling [`ParticleAnimator::tick`] once per display
//! frame. A tick:
//!
//! 1. advances [`WorldTime`] by `dt`
//! 2. runs the timer schedule (rain spawners, sequence steps, reactions,
//!    screen shake)
//! 3. applies every effect those timers staged
//! 4. if a frame is requested, runs the particle update and renders
//! 5. recomputes the active flag and reschedules or terminates the loop
//!
//! Effect methods never fail: when no surface can be acquired they log and
//! return without touching the world.

use std::time::Duration;

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::fade::Fade;
use crate::components::mapposition::MapPosition;
use crate::components::particle::{Particle, ParticleState, SpawnOrder};
use crate::components::reaction::FloatingReaction;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::scheduledstep::{CancelToken, ScheduledStep};
use crate::components::spawner::RainSpawner;
use crate::components::sprite::Sprite;
use crate::effects;
use crate::events::effect::{Anchor, Effect, EffectRequest};
use crate::resources::animatorstate::{AnimatorState, EffectStats};
use crate::resources::effectconfig::EffectConfig;
use crate::resources::effectparams::EffectParams;
use crate::resources::effectrng::EffectRng;
use crate::resources::screenshake::ScreenShake;
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;
use crate::sequence::Sequence;
use crate::surface::{DrawSurface, SurfaceError, SurfaceProvider};
use crate::systems::particles::particle_update_system;
use crate::systems::reaction::{floating_reaction_system, screen_shake_system};
use crate::systems::render::render_pass;
use crate::systems::sequence::scheduled_step_system;
use crate::systems::spawner::rain_spawner_system;
use crate::systems::time::update_world_time;

pub const DEFAULT_BURST_COUNT: u32 = 50;
pub const DEFAULT_RAIN_DURATION: Duration = Duration::from_millis(3000);
pub const DEFAULT_RAIN_INTENSITY: u32 = 3;
pub const DEFAULT_HEART_COUNT: u32 = 60;
pub const DEFAULT_FIREWORK_COUNT: u32 = 80;

pub struct ParticleAnimator {
    world: World,
    timers: Schedule,
    frame: Schedule,
    provider: Box<dyn SurfaceProvider>,
    surface: Option<Box<dyn DrawSurface>>,
    /// Tokens of effects and sequences that may still have pending steps.
    tokens: Vec<CancelToken>,
}

impl ParticleAnimator {
    /// Build an animator from a loaded configuration.
    pub fn new(provider: impl SurfaceProvider + 'static, config: &EffectConfig) -> Self {
        Self::with_params(provider, config.viewport(), config.params.clone(), config.seed)
    }

    pub fn with_params(
        provider: impl SurfaceProvider + 'static,
        viewport: Viewport,
        params: EffectParams,
        seed: Option<u64>,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(viewport);
        world.insert_resource(params);
        world.insert_resource(EffectRng::from_optional_seed(seed));
        world.init_resource::<AnimatorState>();
        world.init_resource::<Messages<EffectRequest>>();

        let mut timers = Schedule::default();
        // Chained so staged effects always apply in the same order.
        timers.add_systems(
            (
                rain_spawner_system,
                scheduled_step_system,
                floating_reaction_system,
                screen_shake_system,
            )
                .chain(),
        );

        let mut frame = Schedule::default();
        frame.add_systems(particle_update_system);

        info!(
            "particle animator ready: {}x{} viewport, seed={:?}",
            viewport.w, viewport.h, seed
        );

        ParticleAnimator {
            world,
            timers,
            frame,
            provider: Box::new(provider),
            surface: None,
            tokens: Vec::new(),
        }
    }

    /// Acquire the drawing surface if we don't hold one yet.
    fn ensure_surface(&mut self) -> bool {
        if self.surface.is_some() {
            return true;
        }
        let viewport = *self.world.resource::<Viewport>();
        match self.provider.acquire(viewport) {
            Ok(surface) => {
                debug!("acquired drawing surface {:?}", surface.size());
                self.surface = Some(surface);
                true
            }
            Err(err) => {
                warn!("effect skipped: {err}");
                self.world.resource_mut::<AnimatorState>().stats.effects_skipped += 1;
                false
            }
        }
    }

    fn start_loop(&mut self) {
        let mut state = self.world.resource_mut::<AnimatorState>();
        state.active = true;
        state.request_frame();
    }

    fn track(&mut self, token: CancelToken) {
        self.tokens.retain(|t| !t.is_cancelled());
        self.tokens.push(token);
    }

    /// Play a single effect now. Returns false when it was skipped.
    pub fn play(&mut self, effect: Effect) -> bool {
        if !self.ensure_surface() {
            return false;
        }
        let token = CancelToken::new();
        effects::apply(&mut self.world, effect, &token);
        self.track(token);
        self.start_loop();
        true
    }

    /// Schedule every step of `sequence`; zero-delay steps fire right away.
    ///
    /// Returns the token that cancels the steps not yet fired, or `None` when
    /// the sequence was skipped.
    pub fn play_sequence(&mut self, sequence: Sequence) -> Option<CancelToken> {
        if !self.ensure_surface() {
            return None;
        }
        let token = CancelToken::new();
        for step in sequence.steps {
            effects::schedule(&mut self.world, step.delay(), step.effect, &token);
        }
        self.track(token.clone());
        self.start_loop();
        Some(token)
    }

    pub fn burst(&mut self, x: f32, y: f32, count: u32) -> bool {
        self.play(Effect::Burst {
            at: Anchor::point(x, y),
            count,
        })
    }

    /// Burst of the default size at the viewport center.
    pub fn burst_centered(&mut self) -> bool {
        self.play(Effect::Burst {
            at: Anchor::Center,
            count: DEFAULT_BURST_COUNT,
        })
    }

    pub fn rain(&mut self, duration: Duration, intensity: u32) -> bool {
        self.play(Effect::Rain {
            duration_ms: duration.as_millis() as u64,
            intensity,
        })
    }

    pub fn heart_burst(&mut self, x: f32, y: f32, count: u32) -> bool {
        self.play(Effect::HeartBurst {
            at: Anchor::point(x, y),
            count,
        })
    }

    pub fn heart_burst_centered(&mut self) -> bool {
        self.play(Effect::HeartBurst {
            at: Anchor::Center,
            count: DEFAULT_HEART_COUNT,
        })
    }

    pub fn firework(&mut self, x: f32, y: f32, count: u32) -> bool {
        self.play(Effect::Firework {
            at: Anchor::point(x, y),
            count,
        })
    }

    /// Firework of the default size high above the center.
    pub fn firework_default(&mut self) -> bool {
        let height = self.world.resource::<EffectParams>().firework.origin_height;
        self.play(Effect::Firework {
            at: Anchor::relative(0.5, height),
            count: DEFAULT_FIREWORK_COUNT,
        })
    }

    pub fn love_explosion(&mut self, x: f32, y: f32) -> Option<CancelToken> {
        self.play_sequence(Sequence::love_explosion(Anchor::point(x, y)))
    }

    pub fn gift_celebration(&mut self, x: f32, y: f32) -> Option<CancelToken> {
        self.play_sequence(Sequence::gift_celebration(Anchor::point(x, y)))
    }

    pub fn success_celebration(&mut self) -> Option<CancelToken> {
        self.play_sequence(Sequence::success_celebration())
    }

    /// Advance the animation by `dt`. Returns true while another frame is
    /// requested.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.world.resource::<AnimatorState>().frame.is_none() {
            return false;
        }

        update_world_time(&mut self.world, dt);
        self.timers.run(&mut self.world);
        self.apply_staged();

        self.frame.run(&mut self.world);
        if let Some(surface) = self.surface.as_deref_mut()
            && let Err(err) = render_pass(&mut self.world, surface)
        {
            self.drop_surface(err);
        }
        self.world.resource_mut::<AnimatorState>().stats.frames += 1;

        let producers = self.producer_count();
        if producers == 0 {
            self.tokens.clear();
        }
        let live = self.particle_count()
            + self.reaction_count()
            + usize::from(self.world.contains_resource::<ScreenShake>());
        let mut state = self.world.resource_mut::<AnimatorState>();
        state.active = producers > 0;
        let again = state.sync_frame_request(live);
        if !again {
            debug!("render loop idle");
        }
        again
    }

    /// Apply the effects written by timers during this tick.
    fn apply_staged(&mut self) {
        let requests: Vec<EffectRequest> = self
            .world
            .resource_mut::<Messages<EffectRequest>>()
            .drain()
            .collect();
        for request in requests {
            let token = request.token.unwrap_or_default();
            if token.is_cancelled() {
                continue;
            }
            effects::apply(&mut self.world, request.effect, &token);
        }
    }

    fn producer_count(&mut self) -> usize {
        let spawners = self
            .world
            .query::<&RainSpawner>()
            .iter(&self.world)
            .count();
        let steps = self
            .world
            .query::<&ScheduledStep>()
            .iter(&self.world)
            .count();
        spawners + steps
    }

    /// Stop every effect and clear the surface. Safe to call repeatedly.
    pub fn stop(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }

        let doomed: Vec<Entity> = self
            .world
            .query_filtered::<Entity, Or<(
                With<Particle>,
                With<FloatingReaction>,
                With<RainSpawner>,
                With<ScheduledStep>,
            )>>()
            .iter(&self.world)
            .collect();
        for entity in doomed {
            self.world.despawn(entity);
        }

        self.world.resource_mut::<Messages<EffectRequest>>().clear();
        self.world.remove_resource::<ScreenShake>();

        let mut state = self.world.resource_mut::<AnimatorState>();
        state.active = false;
        state.cancel_frame();

        if let Some(surface) = self.surface.as_deref_mut() {
            surface.clear();
            if let Err(err) = surface.present() {
                self.drop_surface(err);
            }
        }
    }

    /// Forget a surface that failed; the next effect acquires a new one.
    fn drop_surface(&mut self, err: SurfaceError) {
        warn!("dropping drawing surface: {err}");
        self.surface = None;
    }

    /// Stop and release the surface; the next effect acquires a new one.
    pub fn destroy(&mut self) {
        self.stop();
        if self.surface.take().is_some() {
            info!("drawing surface released");
        }
    }

    /// Track a new host size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.world.insert_resource(Viewport::new(width, height));
        if let Some(surface) = self.surface.as_deref_mut() {
            surface.resize(width, height);
        }
    }

    pub fn is_active(&self) -> bool {
        self.world.resource::<AnimatorState>().active
    }

    /// True while a frame is requested.
    pub fn is_running(&self) -> bool {
        self.world.resource::<AnimatorState>().frame.is_some()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn particle_count(&mut self) -> usize {
        self.world
            .query_filtered::<(), With<Particle>>()
            .iter(&self.world)
            .count()
    }

    pub fn reaction_count(&mut self) -> usize {
        self.world
            .query::<&FloatingReaction>()
            .iter(&self.world)
            .count()
    }

    /// Snapshot of the live particles in draw order.
    pub fn particles(&mut self) -> Vec<ParticleState> {
        let mut states: Vec<ParticleState> = self
            .world
            .query_filtered::<(
                &SpawnOrder,
                &MapPosition,
                &RigidBody,
                &Fade,
                &Rotation,
                &Sprite,
            ), With<Particle>>()
            .iter(&self.world)
            .map(|(order, pos, body, fade, rotation, sprite)| ParticleState {
                order: order.0,
                position: pos.pos,
                velocity: body.velocity,
                gravity: body.gravity,
                friction: body.friction,
                opacity: fade.opacity,
                decay: fade.decay,
                size: sprite.size,
                color: sprite.color,
                rotation: rotation.degrees,
                rotation_speed: rotation.speed,
                shape: sprite.shape,
            })
            .collect();
        states.sort_by_key(|s| s.order);
        states
    }

    pub fn stats(&self) -> EffectStats {
        self.world.resource::<AnimatorState>().stats
    }

    pub fn viewport(&self) -> Viewport {
        *self.world.resource::<Viewport>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{NoSurface, RecordingSurface};

    fn animator() -> ParticleAnimator {
        let (provider, _) = RecordingSurface::provider();
        ParticleAnimator::with_params(
            provider,
            Viewport::new(800, 600),
            EffectParams::default(),
            Some(7),
        )
    }

    #[test]
    fn test_surface_acquired_lazily() {
        let mut a = animator();
        assert!(!a.has_surface());
        assert!(a.burst(10.0, 10.0, 3));
        assert!(a.has_surface());
    }

    #[test]
    fn test_effects_skipped_without_surface() {
        let mut a = ParticleAnimator::with_params(
            NoSurface,
            Viewport::default(),
            EffectParams::default(),
            None,
        );
        assert!(!a.burst(0.0, 0.0, 10));
        assert!(a.success_celebration().is_none());
        assert_eq!(a.particle_count(), 0);
        assert!(!a.is_running());
        assert_eq!(a.stats().effects_skipped, 2);
    }

    #[test]
    fn test_tick_without_request_is_noop() {
        let mut a = animator();
        assert!(!a.tick(Duration::from_millis(16)));
        assert_eq!(a.stats().frames, 0);
    }

    #[test]
    fn test_burst_sets_active_then_loop_follows_particles() {
        let mut a = animator();
        a.burst(400.0, 300.0, 5);
        assert!(a.is_active());
        assert!(a.is_running());
        assert!(a.tick(Duration::from_millis(16)));
        assert!(!a.is_active());
        assert!(a.is_running());
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut a = animator();
        a.burst(0.0, 0.0, 1);
        a.resize(1024, 768);
        assert_eq!(a.viewport(), Viewport::new(1024, 768));
    }
}
