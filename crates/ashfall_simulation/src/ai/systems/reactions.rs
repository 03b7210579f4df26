//! AI reaction systems (detection, deaths, stun, charge readiness).

use bevy::prelude::*;

use crate::ai::components::{keys, EnemyState, EnemyStateRegister, RearGuard};
use crate::ai::systems::scheduler::{abort_agent_task, AgentData};
use crate::ai::TargetDetected;
use crate::animation::{AnimNotify, AnimationNotify};
use crate::combat::{HealthDepleted, Stunned};
use crate::components::{CombatTarget, Dead, Player};
use crate::config::CombatTuning;
use crate::DeterministicRng;

/// System: ChargeReady notify (конец wind-up) → IsReadyToCharge = true
pub fn handle_charge_ready(
    mut notifies: EventReader<AnimationNotify>,
    mut registers: Query<&mut EnemyStateRegister>,
) {
    for event in notifies.read() {
        if event.notify != AnimNotify::ChargeReady {
            continue;
        }
        if let Ok(mut register) = registers.get_mut(event.entity) {
            register.set_bool(keys::IS_READY_TO_CHARGE, true);
        }
    }
}

/// System: perception → Idle босс, увидевший свою цель, переходит в Range
///
/// Чужие pawns и не-Idle состояния игнорируются.
pub fn handle_target_detected(
    mut detections: EventReader<TargetDetected>,
    mut observers: Query<(&CombatTarget, &mut EnemyStateRegister), Without<Dead>>,
) {
    for detection in detections.read() {
        let Ok((target, mut register)) = observers.get_mut(detection.observer) else {
            continue;
        };

        if target.get() != Some(detection.target) || register.get_state() != EnemyState::Idle {
            continue;
        }

        register.set_state(EnemyState::Range);
        crate::logger::log_info(&format!(
            "👁️ {:?} spotted {:?} → Range",
            detection.observer, detection.target
        ));
    }
}

/// System: смерть игрока → все AI в GameOver, активные задачи прерываются
pub fn handle_player_death(
    mut depleted: EventReader<HealthDepleted>,
    players: Query<(), With<Player>>,
    mut agents: Query<(Entity, AgentData)>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
) {
    let player_died = depleted.read().any(|event| players.contains(event.entity));
    if !player_died {
        return;
    }

    for (entity, mut agent) in agents.iter_mut() {
        agent.1.set_state(EnemyState::GameOver);
        abort_agent_task(entity, agent, &tuning.ai, &mut rng.rng);
    }

    crate::logger::log_info("💀 Player died → AI GameOver");
}

/// System: смерть врага → AI logic остановлена (задача прервана, разворот отменён)
///
/// Death анимация, Dead marker и деспавн — в combat::handle_health_depleted.
pub fn handle_enemy_death(
    mut depleted: EventReader<HealthDepleted>,
    mut agents: Query<(AgentData, Option<&mut RearGuard>)>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
) {
    for event in depleted.read() {
        let Ok((agent, rear_guard)) = agents.get_mut(event.entity) else {
            continue;
        };

        if let Some(mut rear_guard) = rear_guard {
            rear_guard.cancel_turn();
        }
        abort_agent_task(event.entity, agent, &tuning.ai, &mut rng.rng);
        crate::logger::log(&format!("🤖 {:?} AI stopped (defeated)", event.entity));
    }
}

/// System: stun подавляет AI — активная задача прерывается в момент оглушения
///
/// Scheduler пропускает Stunned акторов; после stun задача выбирается заново
/// по register state.
pub fn abort_tasks_on_stun(
    mut stunned: Query<(Entity, AgentData, Option<&mut RearGuard>), Added<Stunned>>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (entity, agent, rear_guard) in stunned.iter_mut() {
        if let Some(mut rear_guard) = rear_guard {
            rear_guard.cancel_turn();
        }
        abort_agent_task(entity, agent, &tuning.ai, &mut rng.rng);
    }
}
