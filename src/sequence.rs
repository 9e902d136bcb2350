//! Composite effects as timed sequences.
//!
//! A [`Sequence`] is an ordered list of steps, each firing one [`Effect`]
//! `delay_ms` after the sequence starts. The built-in celebrations are
//! sequences, and the CLI loads custom ones from JSON:
//!
//! ```json
//! { "steps": [
//!     { "delay_ms": 0,   "effect": { "kind": "heart_burst", "at": "center", "count": 40 } },
//!     { "delay_ms": 500, "effect": { "kind": "firework", "at": { "relative": [0.5, 0.3] }, "count": 60 } }
//! ] }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::effect::{Anchor, Effect};

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("failed to read sequence file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sequence: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    /// Offset from the start of the sequence.
    #[serde(default)]
    pub delay_ms: u64,
    pub effect: Effect,
}

impl SequenceStep {
    pub fn new(delay_ms: u64, effect: Effect) -> Self {
        SequenceStep { delay_ms, effect }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub steps: Vec<SequenceStep>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step firing `delay_ms` after the start.
    pub fn then(mut self, delay_ms: u64, effect: Effect) -> Self {
        self.steps.push(SequenceStep::new(delay_ms, effect));
        self
    }

    /// Time from the start until the last step fires.
    pub fn span(&self) -> Duration {
        self.steps
            .iter()
            .map(SequenceStep::delay)
            .max()
            .unwrap_or_default()
    }

    /// Hearts, then a firework, then a gentle rain.
    pub fn gift_celebration(at: Anchor) -> Self {
        Sequence::new()
            .then(0, Effect::HeartBurst { at, count: 40 })
            .then(500, Effect::Firework { at, count: 60 })
            .then(
                1000,
                Effect::Rain {
                    duration_ms: 2000,
                    intensity: 2,
                },
            )
    }

    /// Three bursts across the top of the screen followed by rain.
    pub fn success_celebration() -> Self {
        Sequence::new()
            .then(
                0,
                Effect::Burst {
                    at: Anchor::relative(0.2, 0.3),
                    count: 30,
                },
            )
            .then(
                200,
                Effect::Burst {
                    at: Anchor::relative(0.8, 0.3),
                    count: 30,
                },
            )
            .then(
                400,
                Effect::Burst {
                    at: Anchor::relative(0.5, 0.2),
                    count: 40,
                },
            )
            .then(
                600,
                Effect::Rain {
                    duration_ms: 2500,
                    intensity: 3,
                },
            )
    }

    /// Single-step wrapper so the waves share the caller's token.
    pub fn love_explosion(at: Anchor) -> Self {
        Sequence::new().then(0, Effect::LoveExplosion { at })
    }

    pub fn from_json(text: &str) -> Result<Self, SequenceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SequenceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, SequenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
