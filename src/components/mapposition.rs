//! World-space position component.
//!
//! The [`MapPosition`] component is the pivot of a particle or reaction in
//! surface coordinates (pixels, Y+ down). Shapes are drawn centered on it.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        MapPosition {
            pos: Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for MapPosition {
    fn from(pos: Vec2) -> Self {
        MapPosition { pos }
    }
}
