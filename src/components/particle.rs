//! Particle marker, spawn order and the bundle used to spawn particles.
//!
//! A particle is an entity carrying a [`ParticleBundle`]. Effects build
//! bundles with the `crate::effects` factories and the animator spawns them,
//! stamping each with a [`SpawnOrder`] so rendering can respect insertion
//! order regardless of how the ECS stores entities.
//!
//! # Related
//!
//! - [`crate::systems::particles::particle_update_system`] – per-tick integration and eviction
//! - [`crate::systems::render::render_pass`] – draws particles sorted by [`SpawnOrder`]

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::color::Color;
use crate::components::fade::Fade;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::sprite::{Shape, Sprite};

/// Tag component for confetti particles owned by the animator.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Particle;

/// Monotonic insertion index. Lower values are drawn first.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnOrder(pub u64);

/// Every component a live particle carries, minus its [`SpawnOrder`].
#[derive(Bundle, Clone, Debug)]
pub struct ParticleBundle {
    pub particle: Particle,
    pub position: MapPosition,
    pub body: RigidBody,
    pub fade: Fade,
    pub rotation: Rotation,
    pub sprite: Sprite,
}

impl ParticleBundle {
    /// A white 8px circle at `position` with no velocity and no decay.
    pub fn new(position: Vec2) -> Self {
        ParticleBundle {
            particle: Particle,
            position: MapPosition::from(position),
            body: RigidBody::default(),
            fade: Fade::new(0.0),
            rotation: Rotation::default(),
            sprite: Sprite::new(8.0, Color::WHITE, Shape::Circle),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.body.velocity = velocity;
        self
    }

    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.fade = Fade::new(decay);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = sprite;
        self
    }
}

/// Plain snapshot of one live particle, in draw order.
///
/// Returned by [`ParticleAnimator::particles`](crate::animator::ParticleAnimator::particles)
/// so callers can inspect the simulation without touching the ECS world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleState {
    pub order: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity: f32,
    pub friction: f32,
    pub opacity: f32,
    pub decay: f32,
    pub size: f32,
    pub color: Color,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub shape: Shape,
}
