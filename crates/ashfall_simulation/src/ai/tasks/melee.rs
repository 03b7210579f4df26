//! MeleeAttackTask — подойти к цели или ударить random attack.

use crate::ai::components::{keys, EnemyState};
use crate::combat::{EnemyFighter, Fighter};
use crate::movement::{MoveGoal, MoveRequestId};
use crate::shared::TimerHandle;

use super::{CombatTask, TaskContext, TaskEvent, TaskStatus, TaskTimer};

/// Фазы одной активации.
///
/// ```text
/// Idle --execute(далеко)--> Approaching --MoveCompleted--> Done
/// Idle --execute(близко)--> Attacking --AttackFinished--> Done
/// Done --tick--> Succeeded (→ Idle)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeleePhase {
    #[default]
    Idle,
    /// Ждём MoveCompleted этого запроса (дошли или сорвалось — всё равно конец)
    Approaching(MoveRequestId),
    /// Random attack играет, ждём таймер её длительности
    Attacking(TimerHandle),
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct MeleeAttackTask {
    phase: MeleePhase,
}

impl MeleeAttackTask {
    pub fn phase(&self) -> MeleePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == MeleePhase::Done
    }

    /// Запрос движения, завершения которого ждёт задача
    pub fn move_request(&self) -> Option<MoveRequestId> {
        match self.phase {
            MeleePhase::Approaching(request) => Some(request),
            _ => None,
        }
    }

    /// Снять подписку и таймер, вернуться в Idle.
    fn release(&mut self, ctx: &mut TaskContext) {
        ctx.locomotion.unregister_listener();
        if let MeleePhase::Attacking(handle) = self.phase {
            ctx.timers.cancel(handle);
        }
        self.phase = MeleePhase::Idle;
    }
}

impl CombatTask for MeleeAttackTask {
    fn name(&self) -> &'static str {
        "melee attack"
    }

    /// Далеко → MoveTo(цель) + подписка на MoveCompleted.
    /// Близко → random attack + таймер на её длительность.
    fn execute(&mut self, ctx: &mut TaskContext) -> TaskStatus {
        self.phase = MeleePhase::Idle;

        let Some(target) = ctx.target else {
            return TaskStatus::Failed;
        };

        let distance = ctx.register.get_float(keys::DISTANCE);

        self.phase = if distance > ctx.tuning.attack_radius {
            let request = ctx.locomotion.move_to(
                MoveGoal::Entity(target),
                true,
                ctx.tuning.acceptance_radius,
            );
            ctx.locomotion.register_listener(request);
            ctx.locomotion.set_focus(target);
            MeleePhase::Approaching(request)
        } else {
            ctx.combo.random_attack(ctx.animator, ctx.rng);
            let duration = EnemyFighter {
                meter: ctx.meter,
                combo: Some(&*ctx.combo),
            }
            .anim_duration();
            MeleePhase::Attacking(ctx.timers.schedule_once(duration, TaskTimer::AttackFinished))
        };

        TaskStatus::InProgress
    }

    fn tick(&mut self, ctx: &mut TaskContext) -> TaskStatus {
        let distance = ctx.register.get_float(keys::DISTANCE);
        let melee_range = EnemyFighter {
            meter: ctx.meter,
            combo: Some(&*ctx.combo),
        }
        .melee_range();

        // Цель ушла из melee range → обратно в Range
        if distance > melee_range {
            ctx.register.set_state(EnemyState::Range);
            self.abort(ctx);
            return TaskStatus::Aborted;
        }

        match self.phase {
            MeleePhase::Done => {
                self.release(ctx);
                TaskStatus::Succeeded
            }
            MeleePhase::Approaching(_) | MeleePhase::Attacking(_) => TaskStatus::InProgress,
            MeleePhase::Idle => TaskStatus::Failed,
        }
    }

    fn on_event(&mut self, event: TaskEvent, _ctx: &mut TaskContext) {
        self.phase = match (self.phase, event) {
            (MeleePhase::Approaching(_), TaskEvent::MoveCompleted(_)) => MeleePhase::Done,
            (MeleePhase::Attacking(_), TaskEvent::TimerFired(TaskTimer::AttackFinished)) => {
                MeleePhase::Done
            }
            // Чужой callback для этой фазы
            (phase, _) => phase,
        };
    }

    fn abort(&mut self, ctx: &mut TaskContext) {
        ctx.locomotion.stop_movement();
        ctx.locomotion.clear_focus();
        self.release(ctx);
    }
}
