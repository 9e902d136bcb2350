//! Delayed effect steps and their cancellation token.
//!
//! Composite celebrations are played as a set of [`ScheduledStep`] entities,
//! one per step, all sharing one [`CancelToken`]. Each step counts its delay
//! down and fires its effect once the delay is over, unless the token has been
//! cancelled in the meantime. Cancelling is permanent and affects every step
//! created with the same token.
//!
//! # Related
//!
//! - [`crate::systems::sequence::scheduled_step_system`] – counts down and fires steps
//! - [`crate::sequence::Sequence`] – builds the steps for a composite effect

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bevy_ecs::prelude::Component;

use crate::events::effect::Effect;

/// Shared flag that stops every not-yet-fired step of a sequence.
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Component, Clone, Debug)]
pub struct ScheduledStep {
    /// Time left before the effect fires.
    pub remaining: Duration,
    pub effect: Effect,
    pub token: CancelToken,
}

impl ScheduledStep {
    pub fn new(delay: Duration, effect: Effect, token: CancelToken) -> Self {
        ScheduledStep {
            remaining: delay,
            effect,
            token,
        }
    }

    /// Count the delay down; returns true once the step is due.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}
