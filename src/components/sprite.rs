//! Drawable appearance of a particle.
//!
//! A [`Sprite`] selects one of the built-in [`Shape`] primitives, its size in
//! pixels and its fill color. Opacity and rotation live in their own
//! components ([`Fade`](super::fade::Fade), [`Rotation`](super::rotation::Rotation))
//! because they change every tick while the sprite itself never does.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Primitive drawn for a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Filled circle with diameter `size`.
    #[default]
    Circle,
    /// Axis-aligned (before rotation) square with side `size`.
    Square,
    /// Heart outline scaled so that `size` spans its width.
    Heart,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub size: f32,
    pub color: Color,
    pub shape: Shape,
}

impl Sprite {
    pub fn new(size: f32, color: Color, shape: Shape) -> Self {
        Sprite { size, color, shape }
    }
}
