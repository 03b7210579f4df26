//! Текущая боевая цель актора
//!
//! Выбор цели (perception, aggro) — внешний collaborator. Симуляция
//! только читает `CombatTarget` и пишет дистанцию до неё в register.

use bevy::prelude::*;

/// Текущая цель (None → задачам AI нечего делать, они завершаются Failed)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

impl CombatTarget {
    pub fn new(target: Entity) -> Self {
        Self(Some(target))
    }

    pub fn get(&self) -> Option<Entity> {
        self.0
    }
}
