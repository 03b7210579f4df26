//! AI decision-making module
//!
//! Босс управляется combat tasks (melee / range / charge), выбор задачи —
//! по EnemyStateRegister. Поверх задач — реактивный rear check.
//!
//! Порядок в тике (после combat):
//! 1. дистанция до цели → register
//! 2. навигация (MoveCompleted до scheduler: callback-then-tick)
//! 3. реакции (charge ready, perception, смерти, stun)
//! 4. scheduler задач
//! 5. rear check

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod tasks;

// Re-export основных типов
pub use components::*;
pub use events::TargetDetected;
pub use tasks::{
    AgentTimers, ChargeAttackTask, CombatTask, CombatTasks, MeleeAttackTask, RangeAttackTask,
    TaskContext, TaskEvent, TaskKind, TaskStatus, TaskTimer,
};

use crate::movement::{drive_locomotion, flush_cancelled_moves, MoveCompleted};
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI и навигацию в FixedUpdate для детерминизма.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetDetected>().add_event::<MoveCompleted>();

        app.add_systems(
            FixedUpdate,
            (
                systems::update_target_distance,
                flush_cancelled_moves,
                drive_locomotion,
                systems::handle_charge_ready,
                systems::handle_target_detected,
                systems::handle_player_death,
                systems::handle_enemy_death,
                systems::abort_tasks_on_stun,
                systems::run_combat_tasks,
                systems::check_rear_attacks,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Ai),
        );
    }
}
