//! Player intent systems: combo attack, sprint, walk, roll.

use bevy::prelude::*;

use crate::animation::Animator;
use crate::combat::{
    AttackPerformed, ComboAttackIntent, ComboSequencer, PlayerActions, ResourceMeter, RollIntent,
    SprintIntent, StaminaSpent, Stunned, WalkIntent,
};
use crate::components::Dead;
use crate::movement::Locomotion;

/// Система: ComboAttackIntent → combo_attack → AttackPerformed
///
/// Stunned/Dead акторы игнорируют ввод.
pub fn handle_combo_intents(
    mut intents: EventReader<ComboAttackIntent>,
    mut attackers: Query<
        (&mut ComboSequencer, &ResourceMeter, &mut Animator),
        (Without<Stunned>, Without<Dead>),
    >,
    mut performed: EventWriter<AttackPerformed>,
) {
    for intent in intents.read() {
        let Ok((mut combo, meter, mut animator)) = attackers.get_mut(intent.entity) else {
            continue;
        };

        let Some(outcome) = combo.combo_attack(meter, &mut animator) else {
            continue;
        };

        performed.write(AttackPerformed {
            entity: intent.entity,
            cost: outcome.cost,
        });

        crate::logger::log(&format!(
            "⚔️ {:?} combo attack #{} ({:.2}s)",
            intent.entity, outcome.index, outcome.duration
        ));
    }
}

/// Система: combo reset timers
pub fn tick_combos(mut combos: Query<&mut ComboSequencer>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut combo in combos.iter_mut() {
        combo.tick(delta);
    }
}

/// Система: sprint / walk / roll intents
pub fn handle_movement_intents(
    mut sprints: EventReader<SprintIntent>,
    mut walks: EventReader<WalkIntent>,
    mut rolls: EventReader<RollIntent>,
    mut players: Query<
        (&mut PlayerActions, &ResourceMeter, &mut Locomotion, &mut Animator),
        (Without<Stunned>, Without<Dead>),
    >,
    mut spent: EventWriter<StaminaSpent>,
) {
    for intent in sprints.read() {
        let Ok((mut actions, meter, mut locomotion, _)) = players.get_mut(intent.entity) else {
            continue;
        };
        if let Some(cost) = actions.sprint(meter, intent.moving, &mut locomotion) {
            spent.write(StaminaSpent {
                entity: intent.entity,
                cost,
            });
        }
    }

    for intent in walks.read() {
        if let Ok((mut actions, _, mut locomotion, _)) = players.get_mut(intent.entity) {
            actions.walk(&mut locomotion);
        }
    }

    for intent in rolls.read() {
        let Ok((mut actions, meter, _, mut animator)) = players.get_mut(intent.entity) else {
            continue;
        };
        if let Some(cost) = actions.roll(meter, &mut animator) {
            spent.write(StaminaSpent {
                entity: intent.entity,
                cost,
            });
            crate::logger::log(&format!("🌀 {:?} rolled", intent.entity));
        }
    }
}

/// Система: roll timers
pub fn tick_player_actions(mut players: Query<&mut PlayerActions>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut actions in players.iter_mut() {
        actions.tick(delta);
    }
}
