//! Per-particle kinematics.
//!
//! The [`RigidBody`] component stores the velocity of a particle together with
//! the two constants that shape its trajectory: a downward `gravity` added to
//! the vertical velocity each tick, and a `friction` multiplier applied to both
//! velocity components afterwards.
//!
//! Values are expressed per frame tick, not per second: the animator advances
//! every live particle exactly once per displayed frame.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Default downward acceleration, pixels per tick squared.
pub const DEFAULT_GRAVITY: f32 = 0.3;
/// Default velocity multiplier applied each tick.
pub const DEFAULT_FRICTION: f32 = 0.99;

/// Kinematic body storing velocity, gravity and friction.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new(Vec2::new(2.0, -10.0));
/// let delta = rb.step();
/// assert_eq!(delta, Vec2::new(2.0, -10.0));
/// ```
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    /// Current velocity in pixels per tick.
    pub velocity: Vec2,
    /// Added to `velocity.y` every tick.
    pub gravity: f32,
    /// Velocity damping factor in `0.0..1.0`. Applied as `velocity *= friction`.
    pub friction: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl RigidBody {
    /// Body with the given velocity and the default gravity/friction.
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            gravity: DEFAULT_GRAVITY,
            friction: DEFAULT_FRICTION,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Advance one tick and return the displacement to apply to the position.
    ///
    /// The displacement is the velocity *before* gravity and friction are
    /// applied, matching the explicit Euler order: move, accelerate, damp.
    pub fn step(&mut self) -> Vec2 {
        let displacement = self.velocity;
        self.velocity.y += self.gravity;
        self.velocity *= self.friction;
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_new_uses_default_constants() {
        let rb = RigidBody::new(Vec2::new(1.0, 2.0));
        assert!(approx_eq(rb.gravity, DEFAULT_GRAVITY));
        assert!(approx_eq(rb.friction, DEFAULT_FRICTION));
    }

    #[test]
    fn test_step_returns_velocity_before_update() {
        let mut rb = RigidBody::new(Vec2::new(4.0, -10.0));
        let d = rb.step();
        assert!(approx_eq(d.x, 4.0));
        assert!(approx_eq(d.y, -10.0));
    }

    #[test]
    fn test_step_applies_gravity_then_friction() {
        let mut rb = RigidBody::new(Vec2::new(4.0, -10.0))
            .with_gravity(0.5)
            .with_friction(0.5);
        rb.step();
        assert!(approx_eq(rb.velocity.x, 2.0));
        assert!(approx_eq(rb.velocity.y, -4.75));
    }

    #[test]
    fn test_zero_gravity_unit_friction_is_inert() {
        let mut rb = RigidBody::new(Vec2::new(1.0, 1.0))
            .with_gravity(0.0)
            .with_friction(1.0);
        for _ in 0..10 {
            rb.step();
        }
        assert!(approx_eq(rb.velocity.x, 1.0));
        assert!(approx_eq(rb.velocity.y, 1.0));
    }
}
