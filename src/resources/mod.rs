//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the effect world and
//! accessed by systems during execution: timing, the viewport, effect
//! parameters and randomness, and the animator's own bookkeeping.
//!
//! Overview
//! - `animatorstate` – active flag, frame request, spawn order and stats
//! - `effectconfig` – INI-backed configuration (not inserted into the world)
//! - `effectparams` – distributions for every randomized effect parameter
//! - `effectrng` – seeded random number generator shared by effects
//! - `screenshake` – transient surface shake
//! - `viewport` – current surface dimensions in pixels
//! - `worldtime` – simulation time and delta
pub mod animatorstate;
pub mod effectconfig;
pub mod effectparams;
pub mod effectrng;
pub mod screenshake;
pub mod viewport;
pub mod worldtime;
