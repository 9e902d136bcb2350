//! Effect systems.
//!
//! This module groups the ECS systems that advance the effect world and the
//! render pass that draws it.
//!
//! Submodules overview
//! - [`particles`] – integrate particle physics and evict dead particles
//! - [`reaction`] – age floating reactions and the screen shake
//! - [`render`] – draw reactions and particles onto a drawing surface
//! - [`sequence`] – count down scheduled steps and stage their effects
//! - [`spawner`] – run rain spawners and stage their drops
//! - [`time`] – update simulation time and delta

pub mod particles;
pub mod reaction;
pub mod render;
pub mod sequence;
pub mod spawner;
pub mod time;
