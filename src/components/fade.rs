//! Opacity decay component.
//!
//! Every particle starts fully opaque and loses `decay` opacity per tick. Once
//! the opacity reaches zero the particle is dropped from the animator.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    /// Current opacity, starts at 1.0. May go negative on the tick it expires.
    pub opacity: f32,
    /// Opacity lost per tick.
    pub decay: f32,
}

impl Fade {
    pub fn new(decay: f32) -> Self {
        Fade {
            opacity: 1.0,
            decay,
        }
    }

    /// Decrease opacity by one tick's worth of decay.
    pub fn step(&mut self) {
        self.opacity -= self.decay;
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}
