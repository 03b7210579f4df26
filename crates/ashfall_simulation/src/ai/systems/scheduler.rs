//! Task scheduler: callbacks → tick активной задачи → выбор новой.

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::components::EnemyStateRegister;
use crate::ai::tasks::{AgentTimers, CombatTasks, TaskContext, TaskEvent};
use crate::animation::Animator;
use crate::combat::{ComboSequencer, ResourceMeter, Stunned};
use crate::components::{CombatTarget, Dead, Enemy};
use crate::config::{AiTuning, CombatTuning};
use crate::movement::{Locomotion, MoveCompleted};
use crate::DeterministicRng;

/// Компоненты AI актора, из которых собирается TaskContext
pub type AgentData = (
    &'static CombatTarget,
    &'static mut EnemyStateRegister,
    &'static mut CombatTasks,
    &'static mut AgentTimers,
    &'static mut Locomotion,
    &'static mut Animator,
    &'static mut ComboSequencer,
    &'static ResourceMeter,
);

/// Прервать активную задачу актора (stun, смерть, game over).
///
/// Задача снимает подписку на MoveCompleted, движение и свои таймеры.
pub fn abort_agent_task(
    entity: Entity,
    agent: (
        &CombatTarget,
        Mut<EnemyStateRegister>,
        Mut<CombatTasks>,
        Mut<AgentTimers>,
        Mut<Locomotion>,
        Mut<Animator>,
        Mut<ComboSequencer>,
        &ResourceMeter,
    ),
    tuning: &AiTuning,
    rng: &mut dyn RngCore,
) {
    let (target, mut register, mut tasks, mut timers, mut locomotion, mut animator, mut combo, meter) =
        agent;

    let mut ctx = TaskContext {
        entity,
        target: target.get(),
        target_position: None,
        register: &mut register,
        locomotion: &mut locomotion,
        timers: &mut timers.0,
        animator: &mut animator,
        combo: &mut combo,
        meter,
        tuning,
        rng,
    };

    tasks.abort_active(&mut ctx);
}

/// Система: scheduler combat tasks
///
/// Для каждого Enemy без Stunned/Dead:
/// 1. сработавшие таймеры → активной задаче
/// 2. MoveCompleted → активной задаче, ТОЛЬКО если Locomotion всё ещё
///    подписан на этот запрос (после abort поздний callback отбрасывается)
/// 3. tick активной задачи или выбор новой по register state
pub fn run_combat_tasks(
    mut agents: Query<(Entity, AgentData), (With<Enemy>, Without<Stunned>, Without<Dead>)>,
    positions: Query<&Transform>,
    mut move_events: EventReader<MoveCompleted>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let completed: Vec<MoveCompleted> = move_events.read().copied().collect();

    for (entity, agent) in agents.iter_mut() {
        let (
            combat_target,
            mut register,
            mut tasks,
            mut timers,
            mut locomotion,
            mut animator,
            mut combo,
            meter,
        ) = agent;

        // Цель, которой больше нет в мире, = нет цели
        let target_position = combat_target
            .get()
            .and_then(|target| positions.get(target).ok())
            .map(|transform| transform.translation);
        let target = combat_target.get().filter(|_| target_position.is_some());

        let fired = timers.0.advance(delta);

        let mut ctx = TaskContext {
            entity,
            target,
            target_position,
            register: &mut register,
            locomotion: &mut locomotion,
            timers: &mut timers.0,
            animator: &mut animator,
            combo: &mut combo,
            meter,
            tuning: &tuning.ai,
            rng: &mut rng.rng,
        };

        for (_, timer) in fired {
            tasks.deliver(TaskEvent::TimerFired(timer), &mut ctx);
        }

        for event in completed.iter().filter(|event| event.entity == entity) {
            if ctx.locomotion.is_listening(event.request) {
                tasks.deliver(TaskEvent::MoveCompleted(event.result), &mut ctx);
            }
        }

        if let Some((kind, status)) = tasks.step(delta, &mut ctx) {
            crate::logger::log(&format!("🧠 {:?} {:?} task → {:?}", entity, kind, status));
        }
    }
}
