//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: роли и базовая геометрия (Combatant, Player, Enemy, Hurtbox)
//! - target: текущая боевая цель (CombatTarget)
//!
//! Боевые подсистемы (meter, guard, tracer, combo) — в `combat::components`,
//! AI state — в `ai::components`.

pub mod actor;
pub mod target;

// Re-exports для удобного импорта
pub use actor::*;
pub use target::*;
