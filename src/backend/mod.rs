//! Windowed backends.
//!
//! - [`raylib`] – preview window that shows the frames a
//!   [`RecordingSurface`](crate::surface::RecordingSurface) captured (feature `raylib`)

#[cfg(feature = "raylib")]
pub mod raylib;
