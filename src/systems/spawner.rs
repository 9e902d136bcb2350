//! Rain spawner system.
//!
//! Advances every [`RainSpawner`] and writes one drop [`Effect`] per due
//! spawn event. Finished spawners are despawned; particles they dropped keep
//! falling and fading on their own.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::spawner::RainSpawner;
use crate::events::effect::EffectRequest;
use crate::resources::animatorstate::AnimatorState;
use crate::resources::worldtime::WorldTime;

pub fn rain_spawner_system(
    mut query: Query<(Entity, &mut RainSpawner)>,
    time: Res<WorldTime>,
    mut state: ResMut<AnimatorState>,
    mut effects: MessageWriter<EffectRequest>,
    mut commands: Commands,
) {
    let dt = time.delta;
    for (entity, mut spawner) in query.iter_mut() {
        let due = spawner.advance(dt);
        for _ in 0..due {
            effects.write(EffectRequest::new(spawner.drops()));
        }
        state.stats.rain_events += due as u64;

        if spawner.is_finished() {
            debug!(
                "rain finished after {} spawn events ({:?})",
                spawner.events_emitted, spawner.kind
            );
            commands.entity(entity).try_despawn();
        }
    }
}
