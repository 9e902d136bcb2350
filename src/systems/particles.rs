//! Particle update system.
//!
//! Advances every live particle by one tick and drops the ones whose
//! keep-alive predicate fails.
//!
//! # Update rule
//!
//! ```text
//! x += vx; y += vy
//! vy += gravity
//! vx *= friction; vy *= friction
//! opacity -= decay
//! rotation += rotationSpeed
//! keep alive while opacity > 0 and y < viewport height + 100
//! ```
//!
//! Removal is unconditional: a particle failing the predicate is despawned in
//! the same tick and never drawn again.

use bevy_ecs::prelude::*;

use crate::components::fade::Fade;
use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::resources::animatorstate::AnimatorState;
use crate::resources::viewport::Viewport;

/// Keep-alive predicate evaluated after each update.
#[inline]
pub fn keep_alive(position: &MapPosition, fade: &Fade, viewport: &Viewport) -> bool {
    fade.is_visible() && position.pos.y < viewport.kill_line()
}

/// Apply one tick of the update rule to a single particle.
#[inline]
pub fn integrate(
    position: &mut MapPosition,
    body: &mut RigidBody,
    fade: &mut Fade,
    rotation: &mut Rotation,
) {
    position.pos += body.step();
    fade.step();
    rotation.step();
}

/// System that integrates all particles and despawns expired ones.
///
/// # Ordering
///
/// Runs once per rendered frame, after timers have spawned this frame's
/// particles and before the render pass.
pub fn particle_update_system(
    mut query: Query<
        (
            Entity,
            &mut MapPosition,
            &mut RigidBody,
            &mut Fade,
            &mut Rotation,
        ),
        With<Particle>,
    >,
    viewport: Res<Viewport>,
    mut state: ResMut<AnimatorState>,
    mut commands: Commands,
) {
    for (entity, mut position, mut body, mut fade, mut rotation) in query.iter_mut() {
        integrate(&mut position, &mut body, &mut fade, &mut rotation);
        if !keep_alive(&position, &fade, &viewport) {
            commands.entity(entity).try_despawn();
            state.stats.particles_evicted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_integrate_follows_update_rule() {
        let mut pos = MapPosition::new(10.0, 10.0);
        let mut body = RigidBody::new(Vec2::new(2.0, -4.0))
            .with_gravity(1.0)
            .with_friction(0.5);
        let mut fade = Fade::new(0.1);
        let mut rot = Rotation::new(0.0, 15.0);

        integrate(&mut pos, &mut body, &mut fade, &mut rot);

        assert!(approx_eq(pos.pos.x, 12.0));
        assert!(approx_eq(pos.pos.y, 6.0));
        assert!(approx_eq(body.velocity.x, 1.0));
        assert!(approx_eq(body.velocity.y, -1.5));
        assert!(approx_eq(fade.opacity, 0.9));
        assert!(approx_eq(rot.degrees, 15.0));
    }

    #[test]
    fn test_keep_alive_bounds() {
        let vp = Viewport::new(800, 600);
        let fade = Fade::new(0.1);
        assert!(keep_alive(&MapPosition::new(0.0, 699.0), &fade, &vp));
        assert!(!keep_alive(&MapPosition::new(0.0, 700.0), &fade, &vp));
        // Far above the viewport is still alive.
        assert!(keep_alive(&MapPosition::new(0.0, -5000.0), &fade, &vp));

        let mut dead = Fade::new(0.5);
        dead.opacity = 0.0;
        assert!(!keep_alive(&MapPosition::new(0.0, 0.0), &dead, &vp));
    }
}
