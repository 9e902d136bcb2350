//! Viewport size resource.
//!
//! Stores the current drawing surface dimensions in pixels. The particle
//! update reads the height for its keep-alive bound, and effects resolve
//! default and relative origins against it. The animator updates it when the
//! host reports a resize.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// Particles are kept while they are less than this far below the bottom edge.
pub const BOTTOM_MARGIN: f32 = 100.0;

/// Current viewport size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl Viewport {
    pub fn new(w: u32, h: u32) -> Self {
        Viewport { w, h }
    }

    pub fn width(&self) -> f32 {
        self.w as f32
    }

    pub fn height(&self) -> f32 {
        self.h as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width() / 2.0, self.height() / 2.0)
    }

    /// Lowest `y` (exclusive) at which a particle is still kept alive.
    pub fn kill_line(&self) -> f32 {
        self.height() + BOTTOM_MARGIN
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { w: 1280, h: 720 }
    }
}
