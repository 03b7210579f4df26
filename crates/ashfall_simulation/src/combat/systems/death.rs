//! Death systems.

use bevy::prelude::*;

use crate::animation::Animator;
use crate::combat::{GuardState, HealthDepleted, HitVolumeTracer};
use crate::components::{Dead, DespawnAfter, Enemy, Hurtbox, Player};
use crate::config::CombatTuning;
use crate::movement::Locomotion;

/// Система: HealthDepleted → Dead
///
/// - death анимация
/// - оружие и блок выключаются, движение останавливается
/// - hurtbox снимается (по трупу больше не попасть)
/// - враг деспавнится после death анимации, игрок остаётся (game over)
///
/// AI реакции (GameOver, abort задач) — в ai::systems::reactions.
#[allow(clippy::type_complexity)]
pub fn handle_health_depleted(
    mut depleted: EventReader<HealthDepleted>,
    mut commands: Commands,
    mut actors: Query<
        (
            Option<&mut Animator>,
            Option<&mut HitVolumeTracer>,
            Option<&mut GuardState>,
            Option<&mut Locomotion>,
            Has<Player>,
            Has<Enemy>,
        ),
        Without<Dead>,
    >,
    tuning: Res<CombatTuning>,
    time: Res<Time<Fixed>>,
) {
    for event in depleted.read() {
        let Ok((animator, tracer, guard, locomotion, is_player, is_enemy)) =
            actors.get_mut(event.entity)
        else {
            continue;
        };

        let death_clip = if is_player {
            Some(&tuning.player.death)
        } else if is_enemy {
            Some(&tuning.ai.death)
        } else {
            None
        };

        let duration = match (animator, death_clip) {
            (Some(mut animator), Some(clip)) => animator.play(clip),
            _ => 0.0,
        };

        if let Some(mut tracer) = tracer {
            tracer.attacking = false;
        }
        if let Some(mut guard) = guard {
            guard.stop_blocking();
        }
        if let Some(mut locomotion) = locomotion {
            locomotion.stop_movement();
            locomotion.clear_focus();
        }

        let mut entity_commands = commands.entity(event.entity);
        entity_commands.insert(Dead).remove::<Hurtbox>();

        if is_enemy {
            entity_commands.insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + duration,
            });
        }

        crate::logger::log_info(&format!(
            "☠️ {:?} died (killer: {:?})",
            event.entity, event.killer
        ));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
