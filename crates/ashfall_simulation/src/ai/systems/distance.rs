//! Target distance → register.

use bevy::prelude::*;

use crate::ai::components::{keys, EnemyStateRegister};
use crate::components::{CombatTarget, Dead};

/// Дистанция, если цели нет (все проверки "цель близко" ложны)
pub const NO_TARGET_DISTANCE: f32 = f32::MAX;

/// Система: записать дистанцию до цели в register ("Distance")
///
/// Читается melee task (attack radius / melee range) в том же тике.
pub fn update_target_distance(
    mut actors: Query<(&Transform, &CombatTarget, &mut EnemyStateRegister), Without<Dead>>,
    targets: Query<&Transform>,
) {
    for (transform, target, mut register) in actors.iter_mut() {
        let distance = target
            .get()
            .and_then(|entity| targets.get(entity).ok())
            .map_or(NO_TARGET_DISTANCE, |target_transform| {
                transform.translation.distance(target_transform.translation)
            });

        register.set_float(keys::DISTANCE, distance);
    }
}
