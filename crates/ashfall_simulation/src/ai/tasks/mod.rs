//! AI combat tasks
//!
//! Контракт задачи: `execute` (setup) → InProgress или сразу terminal result,
//! затем `tick` каждый fixed тик до terminal result.
//!
//! Scheduler не может блокироваться, поэтому "ждать анимацию/движение" =
//! фаза задачи. Out-of-band callback (`on_event`: таймер или MoveCompleted)
//! двигает фазу, `tick` читает её на следующем тике. Callback не для
//! текущей фазы игнорируется.

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::components::{EnemyState, EnemyStateRegister};
use crate::animation::Animator;
use crate::combat::{ComboSequencer, ResourceMeter};
use crate::config::AiTuning;
use crate::movement::{Locomotion, MoveResult};
use crate::shared::TimerService;

pub mod charge;
pub mod melee;
pub mod range;

#[cfg(test)]
mod tasks_tests;

pub use charge::{ChargeAttackTask, ChargePhase};
pub use melee::{MeleeAttackTask, MeleePhase};
pub use range::RangeAttackTask;

/// Результат execute / tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    InProgress,
    Succeeded,
    Failed,
    Aborted,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Payload таймеров задач
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTimer {
    /// Random attack доиграна (melee)
    AttackFinished,
    /// Пауза после рывка истекла (charge)
    PostChargePause,
}

/// Таймеры AI актора (timer collaborator)
#[derive(Component, Debug, Clone, Default)]
pub struct AgentTimers(pub TimerService<TaskTimer>);

/// Out-of-band callback для активной задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    TimerFired(TaskTimer),
    MoveCompleted(MoveResult),
}

/// Всё, что задача может читать и менять у своего актора за один вызов.
pub struct TaskContext<'a> {
    pub entity: Entity,
    pub target: Option<Entity>,
    /// Позиция цели на момент вызова (для MoveTo по точке)
    pub target_position: Option<Vec3>,
    pub register: &'a mut EnemyStateRegister,
    pub locomotion: &'a mut Locomotion,
    pub timers: &'a mut TimerService<TaskTimer>,
    pub animator: &'a mut Animator,
    pub combo: &'a mut ComboSequencer,
    pub meter: &'a ResourceMeter,
    pub tuning: &'a AiTuning,
    pub rng: &'a mut dyn RngCore,
}

/// Combat task (melee / range / charge).
///
/// `abort` обязан снять всё, что задача повесила на актора: подписку на
/// MoveCompleted, движение, таймеры. После abort поздний callback — no-op.
pub trait CombatTask {
    fn name(&self) -> &'static str;
    fn execute(&mut self, ctx: &mut TaskContext) -> TaskStatus;
    fn tick(&mut self, ctx: &mut TaskContext) -> TaskStatus;
    fn on_event(&mut self, event: TaskEvent, ctx: &mut TaskContext);
    fn abort(&mut self, ctx: &mut TaskContext);
}

/// Какая задача сейчас активна
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Melee,
    Range,
    Charge,
}

impl TaskKind {
    /// Выбор задачи по состоянию register (Idle / GameOver → ничего)
    pub fn for_state(state: EnemyState) -> Option<Self> {
        match state {
            EnemyState::Range => Some(Self::Range),
            EnemyState::Melee => Some(Self::Melee),
            EnemyState::Charge => Some(Self::Charge),
            EnemyState::Idle | EnemyState::GameOver => None,
        }
    }
}

/// Per-actor набор задач. Инстансы живут между активациями
/// (range threshold копится в RangeAttackTask).
#[derive(Component, Debug, Clone)]
pub struct CombatTasks {
    pub melee: MeleeAttackTask,
    pub range: RangeAttackTask,
    pub charge: ChargeAttackTask,
    active: Option<TaskKind>,
    /// Пауза scheduler после ranged атаки
    rest_timer: f32,
    range_rest: f32,
}

impl Default for CombatTasks {
    fn default() -> Self {
        Self::new(&AiTuning::default())
    }
}

impl CombatTasks {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            melee: MeleeAttackTask::default(),
            range: RangeAttackTask::new(tuning),
            charge: ChargeAttackTask::default(),
            active: None,
            rest_timer: 0.0,
            range_rest: tuning.range_rest,
        }
    }

    pub fn active(&self) -> Option<TaskKind> {
        self.active
    }

    pub fn is_resting(&self) -> bool {
        self.rest_timer > 0.0
    }

    fn task_mut(&mut self, kind: TaskKind) -> &mut dyn CombatTask {
        match kind {
            TaskKind::Melee => &mut self.melee,
            TaskKind::Range => &mut self.range,
            TaskKind::Charge => &mut self.charge,
        }
    }

    /// Доставить callback активной задаче (до её tick). Без активной задачи — no-op.
    pub fn deliver(&mut self, event: TaskEvent, ctx: &mut TaskContext) {
        if let Some(kind) = self.active {
            self.task_mut(kind).on_event(event, ctx);
        }
    }

    /// Один шаг scheduler: tick активной задачи или выбор + execute новой.
    ///
    /// Возвращает terminal result, если задача завершилась на этом шаге.
    pub fn step(&mut self, delta: f32, ctx: &mut TaskContext) -> Option<(TaskKind, TaskStatus)> {
        if let Some(kind) = self.active {
            let status = self.task_mut(kind).tick(ctx);
            return self.settle(kind, status);
        }

        if self.rest_timer > 0.0 {
            self.rest_timer -= delta;
            return None;
        }

        let kind = TaskKind::for_state(ctx.register.get_state())?;
        self.active = Some(kind);

        let task = self.task_mut(kind);
        crate::logger::log(&format!("🧠 {:?} → {}", ctx.entity, task.name()));
        let status = task.execute(ctx);
        self.settle(kind, status)
    }

    fn settle(&mut self, kind: TaskKind, status: TaskStatus) -> Option<(TaskKind, TaskStatus)> {
        if !status.is_terminal() {
            return None;
        }

        self.active = None;
        if kind == TaskKind::Range && status == TaskStatus::Succeeded {
            self.rest_timer = self.range_rest;
        }
        Some((kind, status))
    }

    /// Прервать активную задачу (stun, смерть, game over).
    pub fn abort_active(&mut self, ctx: &mut TaskContext) -> Option<TaskKind> {
        let kind = self.active.take()?;
        self.task_mut(kind).abort(ctx);
        crate::logger::log(&format!("🛑 {:?} aborted {:?} task", ctx.entity, kind));
        Some(kind)
    }
}
