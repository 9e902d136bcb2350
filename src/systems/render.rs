use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::color::Color;
use crate::components::fade::Fade;
use crate::components::mapposition::MapPosition;
use crate::components::particle::{Particle, SpawnOrder};
use crate::components::reaction::FloatingReaction;
use crate::components::rotation::Rotation;
use crate::components::sprite::Sprite;
use crate::resources::screenshake::ScreenShake;
use crate::surface::{DrawSurface, Primitive, SpriteDraw, SurfaceError};

/// Draw one frame into `surface`.
///
/// The surface is cleared first. Floating reactions are drawn below the
/// confetti; within each layer items are sorted by [`SpawnOrder`], which is
/// insertion order. The screen shake offset, when active, moves everything.
///
/// Returns the number of draw calls issued, or the error the surface
/// reported when presenting.
pub fn render_pass(world: &mut World, surface: &mut dyn DrawSurface) -> Result<usize, SurfaceError> {
    let shake = world
        .get_resource::<ScreenShake>()
        .map(ScreenShake::offset)
        .unwrap_or(Vec2::ZERO);

    surface.clear();

    let mut reactions: Vec<(SpawnOrder, SpriteDraw)> = {
        let mut q = world.query::<(&SpawnOrder, &MapPosition, &FloatingReaction)>();
        q.iter(world)
            .filter_map(|(order, origin, reaction)| {
                let pose = reaction.pose();
                if pose.opacity <= 0.0 || pose.scale <= 0.0 {
                    return None;
                }
                Some((
                    *order,
                    SpriteDraw {
                        primitive: Primitive::Glyph(reaction.glyph.clone()),
                        position: origin.pos + pose.offset + shake,
                        size: reaction.size,
                        scale: pose.scale,
                        rotation: pose.rotation,
                        color: Color::WHITE.faded(pose.opacity),
                    },
                ))
            })
            .collect()
    };
    reactions.sort_by_key(|(order, _)| *order);

    let mut particles: Vec<(SpawnOrder, SpriteDraw)> = {
        let mut q = world
            .query_filtered::<(&SpawnOrder, &MapPosition, &Sprite, &Fade, &Rotation), With<Particle>>();
        q.iter(world)
            .map(|(order, pos, sprite, fade, rotation)| {
                (
                    *order,
                    SpriteDraw {
                        primitive: Primitive::Shape(sprite.shape),
                        position: pos.pos + shake,
                        size: sprite.size,
                        scale: 1.0,
                        rotation: rotation.degrees,
                        color: sprite.color.faded(fade.opacity),
                    },
                )
            })
            .collect()
    };
    particles.sort_by_key(|(order, _)| *order);

    let mut draws = 0;
    for (_, sprite) in reactions.iter().chain(particles.iter()) {
        surface.draw(sprite);
        draws += 1;
    }
    surface.present()?;
    Ok(draws)
}
