//! Scheduled step system.
//!
//! Counts down every [`ScheduledStep`] and fires its effect once due. Steps
//! whose [`CancelToken`](crate::components::scheduledstep::CancelToken) was
//! cancelled are discarded without firing, whether or not they were due.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::scheduledstep::ScheduledStep;
use crate::events::effect::EffectRequest;
use crate::resources::animatorstate::AnimatorState;
use crate::resources::worldtime::WorldTime;

pub fn scheduled_step_system(
    mut query: Query<(Entity, &mut ScheduledStep)>,
    time: Res<WorldTime>,
    mut state: ResMut<AnimatorState>,
    mut effects: MessageWriter<EffectRequest>,
    mut commands: Commands,
) {
    let dt = time.delta;
    for (entity, mut step) in query.iter_mut() {
        if step.token.is_cancelled() {
            debug!("dropping cancelled step {}", step.effect.name());
            commands.entity(entity).try_despawn();
            continue;
        }
        if step.advance(dt) {
            effects.write(EffectRequest::with_token(
                step.effect.clone(),
                step.token.clone(),
            ));
            state.stats.steps_fired += 1;
            commands.entity(entity).try_despawn();
        }
    }
}
