//! Sequence and reaction integration tests: staged steps, cancellation and
//! emoji reactions driven through the animator.

use std::time::Duration;

use lovefx::animator::ParticleAnimator;
use lovefx::events::effect::{Anchor, Effect};
use lovefx::resources::effectparams::EffectParams;
use lovefx::resources::viewport::Viewport;
use lovefx::sequence::Sequence;
use lovefx::surface::{RecordingHandle, RecordingSurface};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn make_animator() -> (ParticleAnimator, RecordingHandle) {
    let (provider, recording) = RecordingSurface::provider();
    let animator = ParticleAnimator::with_params(
        provider,
        Viewport::new(800, 600),
        EffectParams::default(),
        Some(7),
    );
    (animator, recording)
}

fn run_for(a: &mut ParticleAnimator, total_ms: u64, step_ms: u64) {
    for _ in 0..total_ms / step_ms {
        a.tick(ms(step_ms));
    }
}

#[test]
fn gift_celebration_fires_steps_on_time() {
    let (mut a, _) = make_animator();
    let token = a.gift_celebration(400.0, 300.0);
    assert!(token.is_some());
    assert_eq!(a.stats().particles_spawned, 40);

    run_for(&mut a, 400, 100);
    assert_eq!(a.stats().particles_spawned, 40);

    run_for(&mut a, 100, 100);
    assert_eq!(a.stats().particles_spawned, 100);

    run_for(&mut a, 500, 100);
    assert!(a.is_active());
    run_for(&mut a, 2000, 100);
    // 2000 ms of rain at intensity 2: 19 spawn events.
    assert_eq!(a.stats().rain_events, 19);
    assert_eq!(a.stats().particles_spawned, 100 + 38);
    assert!(!a.is_active());
}

#[test]
fn cancelled_token_prevents_unfired_steps() {
    let (mut a, _) = make_animator();
    let token = a.gift_celebration(400.0, 300.0).unwrap();
    a.tick(ms(100));
    token.cancel();
    run_for(&mut a, 3000, 100);

    let stats = a.stats();
    assert_eq!(stats.particles_spawned, 40);
    assert_eq!(stats.rain_events, 0);
    assert_eq!(stats.steps_fired, 0);
}

#[test]
fn stop_mid_sequence_cancels_remaining_steps() {
    let (mut a, _) = make_animator();
    let token = a.success_celebration().unwrap();
    run_for(&mut a, 300, 100);
    assert_eq!(a.stats().particles_spawned, 60);

    a.stop();
    assert!(token.is_cancelled());
    assert!(!a.tick(ms(100)));

    a.burst(10.0, 10.0, 1);
    run_for(&mut a, 1000, 100);
    assert_eq!(a.stats().particles_spawned, 61);
    assert_eq!(a.stats().rain_events, 0);
}

#[test]
fn love_explosion_waves_are_staged() {
    let (mut a, _) = make_animator();
    a.love_explosion(400.0, 300.0);
    assert_eq!(a.stats().particles_spawned, 20);

    run_for(&mut a, 300, 100);
    assert_eq!(a.stats().particles_spawned, 40);

    run_for(&mut a, 300, 100);
    assert_eq!(a.stats().particles_spawned, 60);
    assert!(!a.is_active());
}

#[test]
fn cancelling_love_explosion_stops_later_waves() {
    let (mut a, _) = make_animator();
    let token = a.love_explosion(400.0, 300.0).unwrap();
    token.cancel();
    run_for(&mut a, 1000, 100);
    assert_eq!(a.stats().particles_spawned, 20);
}

#[test]
fn emoji_burst_staggers_reactions() {
    let (mut a, _) = make_animator();
    a.emoji_burst("💕", 400.0, 300.0, 4);
    assert_eq!(a.stats().reactions_spawned, 1);

    a.tick(ms(50));
    assert_eq!(a.stats().reactions_spawned, 2);

    run_for(&mut a, 100, 50);
    assert_eq!(a.stats().reactions_spawned, 4);
    assert_eq!(a.reaction_count(), 4);
}

#[test]
fn reactions_expire_after_their_lifetime() {
    let (mut a, _) = make_animator();
    a.floating_reaction("😍", 100.0, 100.0);
    run_for(&mut a, 1900, 100);
    assert_eq!(a.reaction_count(), 1);
    a.tick(ms(100));
    assert_eq!(a.reaction_count(), 0);
    assert!(!a.is_running());
}

#[test]
fn custom_reaction_uses_its_own_lifetime() {
    let (mut a, recording) = make_animator();
    assert!(a.floating_reaction_with("🌹", 100.0, 100.0, 64.0, ms(500)));
    a.tick(ms(250));
    {
        let r = recording.borrow();
        assert_eq!(r.last_frame.len(), 1);
        assert_eq!(r.last_frame[0].size, 64.0);
    }
    a.tick(ms(250));
    assert_eq!(a.reaction_count(), 0);
    assert!(!a.is_running());
}

#[test]
fn trigger_reaction_adds_confetti_for_love_glyphs() {
    let (mut a, _) = make_animator();
    a.trigger_reaction("❤️", 200.0, 200.0);
    assert_eq!(a.reaction_count(), 1);
    assert_eq!(a.particle_count(), 0);

    run_for(&mut a, 300, 100);
    assert_eq!(a.stats().particles_spawned, 10);
}

#[test]
fn trigger_reaction_without_confetti_for_other_glyphs() {
    let (mut a, _) = make_animator();
    a.trigger_reaction("🔥", 200.0, 200.0);
    run_for(&mut a, 600, 100);
    assert_eq!(a.stats().particles_spawned, 0);
    assert_eq!(a.stats().reactions_spawned, 1);
}

#[test]
fn quick_love_reaction_is_immediate() {
    let (mut a, _) = make_animator();
    a.quick_love_reaction(50.0, 60.0);
    assert_eq!(a.reaction_count(), 1);
    assert_eq!(a.particle_count(), 5);
}

#[test]
fn emoji_rain_spawns_every_200ms() {
    let (mut a, _) = make_animator();
    a.emoji_rain("✨", ms(1000), 2);
    run_for(&mut a, 1000, 100);
    // Spawns at 200, 400, 600 and 800 ms.
    assert_eq!(a.stats().reactions_spawned, 8);
    assert!(!a.is_active());
}

#[test]
fn celebration_mode_bursts_then_rains() {
    let (mut a, _) = make_animator();
    a.celebration_mode();
    run_for(&mut a, 1000, 50);
    // Bursts start 200 ms apart and stagger their six reactions by 50 ms.
    assert_eq!(a.stats().reactions_spawned, 30);
    run_for(&mut a, 300, 50);
    assert_eq!(a.stats().reactions_spawned, 36 + 2);
    run_for(&mut a, 1700, 50);
    // 2000 ms of sparkle rain: nine spawns of two.
    assert_eq!(a.stats().reactions_spawned, 36 + 18);
    assert!(!a.is_active());
}

#[test]
fn json_sequence_plays_like_built_in() {
    let json = r#"{ "steps": [
        { "delay_ms": 0,   "effect": { "kind": "burst", "at": { "relative": [0.5, 0.5] }, "count": 12 } },
        { "delay_ms": 200, "effect": { "kind": "firework", "at": { "point": [100.0, 100.0] }, "count": 8 } },
        { "delay_ms": 200, "effect": { "kind": "screen_shake" } }
    ] }"#;
    let sequence = Sequence::from_json(json).unwrap();
    let (mut a, _) = make_animator();
    a.play_sequence(sequence);
    assert_eq!(a.particle_count(), 12);
    run_for(&mut a, 200, 100);
    assert_eq!(a.stats().particles_spawned, 20);
    assert_eq!(a.stats().steps_fired, 2);
}

#[test]
fn relative_anchor_resolves_when_step_fires() {
    let (mut a, _) = make_animator();
    a.play_sequence(Sequence::new().then(
        100,
        Effect::Burst {
            at: Anchor::relative(0.5, 0.5),
            count: 1,
        },
    ));
    a.resize(400, 200);
    a.tick(ms(100));
    let p = a.particles()[0];
    // Spawned at (200, 100) and moved by one tick of velocity.
    assert!((p.position.x - 200.0).abs() <= 6.0);
    assert!((p.position.y - 100.0).abs() <= 20.0);
}
