//! Базовые компоненты акторов: Combatant, роли Player/Enemy, Hurtbox, Dead

use bevy::prelude::*;

use crate::combat::ResourceMeter;

/// Боец — любой актор, способный наносить и получать урон.
///
/// Автоматически добавляет ResourceMeter, Hurtbox и Transform через Required Components.
/// Роли (Player/Enemy) навешиваются отдельными marker components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(ResourceMeter, Hurtbox, Transform)]
pub struct Combatant {
    /// Отображаемое имя (для логов)
    pub name: String,
}

impl Combatant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Marker: игрок (управляется intents)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Marker: враг под управлением AI tasks
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Marker: актор мёртв (AI и ввод игнорируют его)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Сфера попадания (geometry query проверяет sweep клинка против неё)
///
/// Центр = translation + offset.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub radius: f32,
    pub offset: Vec3,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 0.5,
            offset: Vec3::new(0.0, 1.0, 0.0), // центр корпуса
        }
    }
}

impl Hurtbox {
    pub fn center(&self, transform: &Transform) -> Vec3 {
        transform.translation + self.offset
    }
}

/// Деспавн entity после указанного времени (после death анимации)
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (секунды fixed clock от старта симуляции)
    pub despawn_time: f32,
}
