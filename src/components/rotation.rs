use bevy_ecs::prelude::Component;

/// Rotation angle in degrees plus the spin added every tick.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    /// Degrees added per tick.
    pub speed: f32,
}

impl Rotation {
    pub fn new(degrees: f32, speed: f32) -> Self {
        Rotation { degrees, speed }
    }

    pub fn step(&mut self) {
        self.degrees += self.speed;
    }
}
