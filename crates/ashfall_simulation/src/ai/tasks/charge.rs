//! ChargeAttackTask — wind-up, рывок к позиции игрока, пауза, переход в Melee.
//!
//! ```text
//! Idle --execute--> WindingUp --IsReadyToCharge--> Dashing
//!      --MoveCompleted--> CoolingDown --PostChargePause--> Done
//! Done --следующий tick--> Melee + Succeeded
//! ```
//!
//! Нет цели на execute или к моменту рывка → Failed.

use crate::ai::components::{keys, EnemyState};
use crate::movement::{MoveGoal, MoveRequestId};
use crate::shared::TimerHandle;

use super::{CombatTask, TaskContext, TaskEvent, TaskStatus, TaskTimer};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChargePhase {
    #[default]
    Idle,
    /// Wind-up играет, ждём IsReadyToCharge
    WindingUp,
    /// Рывок на charge speed; скорость до рывка вернётся на MoveCompleted
    Dashing {
        request: MoveRequestId,
        original_speed: f32,
    },
    /// Пауза после рывка
    CoolingDown(TimerHandle),
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct ChargeAttackTask {
    phase: ChargePhase,
}

impl ChargeAttackTask {
    pub fn phase(&self) -> ChargePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ChargePhase::Done
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.phase, ChargePhase::Dashing { .. })
    }

    pub fn move_request(&self) -> Option<MoveRequestId> {
        match self.phase {
            ChargePhase::Dashing { request, .. } => Some(request),
            _ => None,
        }
    }

    /// MoveTo(позиция цели) на charge speed. None — цели уже нет.
    fn charge_at_target(&self, ctx: &mut TaskContext) -> Option<ChargePhase> {
        let (Some(target), Some(position)) = (ctx.target, ctx.target_position) else {
            return None;
        };

        let request = ctx.locomotion.move_to(
            MoveGoal::Position(position),
            true,
            ctx.tuning.acceptance_radius,
        );
        ctx.locomotion.set_focus(target);
        ctx.locomotion.register_listener(request);

        let original_speed = ctx.locomotion.max_speed;
        ctx.locomotion.max_speed = ctx.tuning.charge_speed;

        crate::logger::log(&format!("💨 {:?} charging at {:?}", ctx.entity, position));
        Some(ChargePhase::Dashing {
            request,
            original_speed,
        })
    }

    /// Снять всё, что задача повесила на актора, вернуться в Idle.
    fn release(&mut self, ctx: &mut TaskContext) {
        ctx.animator.charging = false;
        ctx.register.set_bool(keys::IS_READY_TO_CHARGE, false);
        ctx.locomotion.unregister_listener();

        match self.phase {
            ChargePhase::Dashing { original_speed, .. } => {
                ctx.locomotion.max_speed = original_speed;
            }
            ChargePhase::CoolingDown(handle) => {
                ctx.timers.cancel(handle);
            }
            ChargePhase::Idle | ChargePhase::WindingUp | ChargePhase::Done => {}
        }

        self.phase = ChargePhase::Idle;
    }
}

impl CombatTask for ChargeAttackTask {
    fn name(&self) -> &'static str {
        "charge attack"
    }

    fn execute(&mut self, ctx: &mut TaskContext) -> TaskStatus {
        self.phase = ChargePhase::Idle;

        if ctx.target.is_none() || ctx.animator.play(&ctx.tuning.charge_windup) <= 0.0 {
            return TaskStatus::Failed;
        }

        ctx.animator.charging = true;
        ctx.register.set_bool(keys::IS_READY_TO_CHARGE, false);
        self.phase = ChargePhase::WindingUp;
        TaskStatus::InProgress
    }

    fn tick(&mut self, ctx: &mut TaskContext) -> TaskStatus {
        match self.phase {
            ChargePhase::WindingUp => {
                if !ctx.register.get_bool(keys::IS_READY_TO_CHARGE) {
                    return TaskStatus::InProgress;
                }
                ctx.register.set_bool(keys::IS_READY_TO_CHARGE, false);

                match self.charge_at_target(ctx) {
                    Some(dashing) => {
                        self.phase = dashing;
                        TaskStatus::InProgress
                    }
                    None => {
                        crate::logger::log_warning(&format!(
                            "{:?} lost its charge target after wind-up",
                            ctx.entity
                        ));
                        self.release(ctx);
                        TaskStatus::Failed
                    }
                }
            }
            ChargePhase::Dashing { .. } | ChargePhase::CoolingDown(_) => TaskStatus::InProgress,
            ChargePhase::Done => {
                ctx.register.set_state(EnemyState::Melee);
                self.release(ctx);
                TaskStatus::Succeeded
            }
            ChargePhase::Idle => TaskStatus::Failed,
        }
    }

    fn on_event(&mut self, event: TaskEvent, ctx: &mut TaskContext) {
        self.phase = match (self.phase, event) {
            (ChargePhase::Dashing { original_speed, .. }, TaskEvent::MoveCompleted(_)) => {
                ctx.animator.charging = false;
                ctx.locomotion.max_speed = original_speed;
                ChargePhase::CoolingDown(
                    ctx.timers
                        .schedule_once(ctx.tuning.post_charge_pause, TaskTimer::PostChargePause),
                )
            }
            (ChargePhase::CoolingDown(_), TaskEvent::TimerFired(TaskTimer::PostChargePause)) => {
                ChargePhase::Done
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
