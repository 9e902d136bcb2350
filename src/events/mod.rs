//! Messages exchanged inside the effect world.
//!
//! Submodules:
//! - [`effect`] – effect descriptions and the requests timers stage for the animator
pub mod effect;
