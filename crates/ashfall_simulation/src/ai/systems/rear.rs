//! Rear check: цель за спиной слишком долго → удар хвостом или разворот.

use bevy::prelude::*;

use crate::ai::components::{EnemyState, EnemyStateRegister, RearGuard, RearReaction};
use crate::animation::Animator;
use crate::combat::Stunned;
use crate::components::{CombatTarget, Dead};
use crate::config::CombatTuning;
use crate::DeterministicRng;

/// System: rear check + плавный разворот
///
/// Порядок внутри тика: сначала шаг разворота (если идёт), потом проверка
/// угла. Неактивный (Idle / GameOver) и разгоняющийся босс не реагирует.
pub fn check_rear_attacks(
    mut actors: Query<
        (
            Entity,
            &mut Transform,
            &CombatTarget,
            &EnemyStateRegister,
            &mut RearGuard,
            &mut Animator,
        ),
        (Without<Stunned>, Without<Dead>),
    >,
    targets: Query<&Transform, Without<RearGuard>>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, target, register, mut rear_guard, mut animator) in actors.iter_mut() {
        rear_guard.turn_step(&mut transform, delta);

        let engaged = !matches!(register.get_state(), EnemyState::Idle | EnemyState::GameOver);
        let target_position = target
            .get()
            .and_then(|target_entity| targets.get(target_entity).ok())
            .map(|target_transform| target_transform.translation);

        let Some(target_position) = target_position.filter(|_| engaged && !animator.charging) else {
            rear_guard.update(false, delta);
            continue;
        };

        let behind = rear_guard
            .is_target_behind(*transform.forward(), target_position - transform.translation);

        if !rear_guard.update(behind, delta) {
            continue;
        }

        match RearReaction::choose(&mut rng.rng) {
            RearReaction::Attack => {
                animator.play(&tuning.rear.rear_attack);
                crate::logger::log(&format!("🦎 {:?} rear attack", entity));
            }
            RearReaction::Turn => {
                rear_guard.begin_turn(&transform, target_position);
                crate::logger::log(&format!("↩️ {:?} turning to face target", entity));
            }
        }
    }
}
