//! Periodic spawner component for rain effects.
//!
//! A [`RainSpawner`] entity emits one spawn event every `interval` until
//! `duration` has elapsed, then removes itself. Particles already spawned are
//! unaffected and finish on their own.
//!
//! # Timing
//!
//! Spawn events happen at `k * interval` for every `k >= 1` with
//! `k * interval < duration`. A spawn that would coincide with the end of
//! the rain is dropped, so `duration = 1000 ms, interval = 100 ms` yields
//! exactly nine events.
//!
//! # Related
//!
//! - [`crate::systems::spawner::rain_spawner_system`] – advances spawners and emits drops

use std::time::Duration;

use bevy_ecs::prelude::Component;

use crate::events::effect::Effect;

/// Shortest accepted spawn interval; a zero interval would never finish a tick.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What a rain spawner drops on each tick.
#[derive(Clone, Debug, PartialEq)]
pub enum RainKind {
    Confetti,
    Emoji(String),
}

#[derive(Component, Clone, Debug)]
pub struct RainSpawner {
    pub kind: RainKind,
    /// Items spawned per event.
    pub intensity: u32,
    /// Time between spawn events.
    pub interval: Duration,
    /// Total time the spawner runs.
    pub duration: Duration,
    /// Time accumulated since the spawner was created.
    pub elapsed: Duration,
    /// Elapsed time at which the next spawn event is due.
    pub next_spawn_at: Duration,
    /// Spawn events emitted so far.
    pub events_emitted: u32,
}

impl RainSpawner {
    pub fn new(kind: RainKind, duration: Duration, interval: Duration, intensity: u32) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        RainSpawner {
            kind,
            intensity,
            interval,
            duration,
            elapsed: Duration::ZERO,
            next_spawn_at: interval,
            events_emitted: 0,
        }
    }

    /// Advance the spawner clock and return how many spawn events are due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let mut due = 0;
        while self.next_spawn_at <= self.elapsed && self.next_spawn_at < self.duration {
            due += 1;
            self.next_spawn_at += self.interval;
        }
        self.events_emitted += due;
        due
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Effect produced by one spawn event.
    pub fn drops(&self) -> Effect {
        match &self.kind {
            RainKind::Confetti => Effect::RainDrops {
                count: self.intensity,
            },
            RainKind::Emoji(glyph) => Effect::EmojiDrops {
                glyph: glyph.clone(),
                count: self.intensity,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_one_second_rain_emits_nine_events() {
        let mut s = RainSpawner::new(RainKind::Confetti, ms(1000), ms(100), 3);
        let mut total = 0;
        while !s.is_finished() {
            total += s.advance(ms(10));
        }
        assert_eq!(total, 9);
        assert_eq!(s.events_emitted, 9);
    }

    #[test]
    fn test_large_step_catches_up() {
        let mut s = RainSpawner::new(RainKind::Confetti, ms(1000), ms(100), 3);
        assert_eq!(s.advance(ms(350)), 3);
        assert_eq!(s.advance(ms(5000)), 6);
        assert!(s.is_finished());
    }

    #[test]
    fn test_nothing_due_before_first_interval() {
        let mut s = RainSpawner::new(RainKind::Confetti, ms(1000), ms(100), 3);
        assert_eq!(s.advance(ms(99)), 0);
        assert_eq!(s.advance(ms(1)), 1);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let s = RainSpawner::new(RainKind::Confetti, ms(10), Duration::ZERO, 1);
        assert_eq!(s.interval, MIN_INTERVAL);
    }

    #[test]
    fn test_drops_carry_kind_and_intensity() {
        let s = RainSpawner::new(RainKind::Emoji("✨".into()), ms(100), ms(10), 2);
        assert_eq!(
            s.drops(),
            Effect::EmojiDrops {
                glyph: "✨".into(),
                count: 2
            }
        );
    }
}
