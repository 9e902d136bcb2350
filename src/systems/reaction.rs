//! Floating reaction and screen shake systems.

use bevy_ecs::prelude::*;

use crate::components::reaction::FloatingReaction;
use crate::resources::screenshake::ScreenShake;
use crate::resources::worldtime::WorldTime;

/// Ages every [`FloatingReaction`] and despawns the expired ones.
pub fn floating_reaction_system(
    mut query: Query<(Entity, &mut FloatingReaction)>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut reaction) in query.iter_mut() {
        reaction.elapsed += time.delta;
        if reaction.is_expired() {
            commands.entity(entity).try_despawn();
        }
    }
}

/// Advances the [`ScreenShake`] resource and removes it once finished.
pub fn screen_shake_system(
    shake: Option<ResMut<ScreenShake>>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    let Some(mut shake) = shake else {
        return;
    };
    shake.elapsed += time.delta;
    if shake.is_finished() {
        commands.remove_resource::<ScreenShake>();
    }
}
