//! Guard systems: block intents, parry window timers, stun lifecycle.

use bevy::prelude::*;

use crate::animation::Animator;
use crate::combat::{BlockIntent, GuardState, HitVolumeTracer, ParrySucceeded, Stunned};
use crate::components::Dead;
use crate::movement::Locomotion;

/// Система: BlockIntent → start/stop blocking
pub fn handle_block_intents(
    mut intents: EventReader<BlockIntent>,
    mut guards: Query<&mut GuardState, Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for intent in intents.read() {
        let Ok(mut guard) = guards.get_mut(intent.entity) else {
            continue;
        };

        if intent.start {
            if guard.start_blocking(now) {
                crate::logger::log(&format!("🛡️ {:?} started blocking at {:.2}s", intent.entity, now));
            }
        } else if guard.stop_blocking() {
            crate::logger::log(&format!("🛡️ {:?} lowered block", intent.entity));
        }
    }
}

/// Система: тик parry window
pub fn tick_guards(mut guards: Query<&mut GuardState>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut guard in guards.iter_mut() {
        guard.tick(delta);
    }
}

/// Система: ParrySucceeded → stun атакующего
///
/// Stun прерывает атаку (tracer off), останавливает движение и блок.
/// AI задачи абортируются отдельно (ai::abort_tasks_on_stun).
pub fn apply_parry_stuns(
    mut parries: EventReader<ParrySucceeded>,
    mut commands: Commands,
    mut targets: Query<(
        Option<&mut GuardState>,
        Option<&mut HitVolumeTracer>,
        Option<&mut Locomotion>,
    )>,
) {
    for parry in parries.read() {
        let Ok((guard, tracer, locomotion)) = targets.get_mut(parry.attacker) else {
            continue;
        };

        if let Some(mut guard) = guard {
            guard.enter_stun();
        }
        if let Some(mut tracer) = tracer {
            tracer.attacking = false;
        }
        if let Some(mut locomotion) = locomotion {
            locomotion.stop_movement();
        }

        commands
            .entity(parry.attacker)
            .insert(Stunned::new(parry.stun_duration, parry.defender));

        crate::logger::log_info(&format!(
            "😵 {:?} parried by {:?}, stunned for {:.1}s",
            parry.attacker, parry.defender, parry.stun_duration
        ));
    }
}

/// Система: тик stun, снятие по истечении
pub fn tick_stuns(
    mut commands: Commands,
    mut stunned: Query<(Entity, &mut Stunned, Option<&mut GuardState>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut stun, guard) in stunned.iter_mut() {
        stun.timer -= delta;
        if stun.is_stunned() {
            continue;
        }

        if let Some(mut guard) = guard {
            guard.leave_stun();
        }
        commands.entity(entity).remove::<Stunned>();
        crate::logger::log(&format!("✅ {:?} recovered from stun", entity));
    }
}

/// Система: защитник, удержавший блок, играет block reaction
pub fn play_block_reactions(
    mut reactions: EventReader<crate::combat::BlockReaction>,
    mut animators: Query<&mut Animator>,
    tuning: Res<crate::config::CombatTuning>,
) {
    for reaction in reactions.read() {
        if let Ok(mut animator) = animators.get_mut(reaction.defender) {
            animator.play(&tuning.guard.block_reaction);
        }
    }
}
