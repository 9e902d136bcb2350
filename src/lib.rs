//! lovefx library.
//!
//! Confetti, hearts, fireworks and emoji reactions for a 2D drawing surface,
//! driven by an ECS world. This module exposes the animator, its components,
//! resources, systems and messages for use in integration tests and as a
//! reusable library.
//!
//! Start with [`animator::ParticleAnimator`]:
//!
//! ```no_run
//! use std::time::Duration;
//! use lovefx::animator::ParticleAnimator;
//! use lovefx::resources::effectconfig::EffectConfig;
//! use lovefx::surface::RecordingSurface;
//!
//! let (provider, _recording) = RecordingSurface::provider();
//! let mut animator = ParticleAnimator::new(provider, &EffectConfig::new());
//! animator.burst(640.0, 360.0, 50);
//! while animator.tick(Duration::from_millis(16)) {}
//! ```

pub mod animator;
pub mod backend;
pub mod color;
pub mod components;
pub mod countdown;
pub mod effects;
pub mod events;
pub mod reactions;
pub mod resources;
pub mod sequence;
pub mod surface;
pub mod systems;
