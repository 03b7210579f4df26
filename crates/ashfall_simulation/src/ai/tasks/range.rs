//! RangeAttackTask — бросок издалека + решение о рывке.

use rand::Rng;

use crate::ai::components::EnemyState;
use crate::animation::AnimationClip;
use crate::config::AiTuning;

use super::{CombatTask, TaskContext, TaskEvent, TaskStatus};

/// Ranged атака. После каждой атаки — бросок против убывающего порога:
/// чем дольше босс кидается издалека, тем вероятнее он перейдёт в Charge.
#[derive(Debug, Clone)]
pub struct RangeAttackTask {
    pub clip: AnimationClip,
    threshold: f32,
    ceiling: f32,
    step: f32,
}

impl Default for RangeAttackTask {
    fn default() -> Self {
        Self::new(&AiTuning::default())
    }
}

impl RangeAttackTask {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            clip: tuning.range_attack.clone(),
            threshold: tuning.range_threshold_ceiling,
            ceiling: tuning.range_threshold_ceiling,
            step: tuning.range_threshold_step,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Бросок: выше порога → Charge и порог обратно к потолку, иначе порог падает.
    fn roll_for_charge(&mut self, ctx: &mut TaskContext) {
        let value: f32 = ctx.rng.gen();

        if value > self.threshold {
            ctx.register.set_state(EnemyState::Charge);
            self.threshold = self.ceiling;
            crate::logger::log(&format!("🐂 {:?} decided to charge ({:.2})", ctx.entity, value));
        } else {
            self.threshold -= self.step;
        }
    }
}

impl CombatTask for RangeAttackTask {
    fn name(&self) -> &'static str {
        "range attack"
    }

    fn execute(&mut self, ctx: &mut TaskContext) -> TaskStatus {
        if ctx.target.is_none() || ctx.animator.play(&self.clip) <= 0.0 {
            return TaskStatus::Failed;
        }

        self.roll_for_charge(ctx);
        TaskStatus::Succeeded
    }

    fn tick(&mut self, _ctx: &mut TaskContext) -> TaskStatus {
        // Завершается в execute
        TaskStatus::Succeeded
    }

    fn on_event(&mut self, _event: TaskEvent, _ctx: &mut TaskContext) {}

    fn abort(&mut self, _ctx: &mut TaskContext) {}
}
