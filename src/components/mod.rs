//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the effect world: particle physics and appearance, floating reactions and
//! the timed producers (rain spawners, scheduled steps) that create them.
//!
//! Submodules overview:
//! - [`fade`] – opacity with a per-tick decay
//! - [`mapposition`] – surface-space position of an entity
//! - [`particle`] – particle marker, spawn order, bundle and snapshot
//! - [`reaction`] – floating emoji reaction and its keyframed pose
//! - [`rigidbody`] – velocity with gravity and friction
//! - [`rotation`] – rotation angle in degrees and its spin
//! - [`scheduledstep`] – delayed effect step and its cancel token
//! - [`spawner`] – periodic rain spawner
//! - [`sprite`] – size, color and shape of a particle
//! - [`tween`] – easing curves and keyframe tracks

pub mod fade;
pub mod mapposition;
pub mod particle;
pub mod reaction;
pub mod rigidbody;
pub mod rotation;
pub mod scheduledstep;
pub mod spawner;
pub mod sprite;
pub mod tween;
