//! ResourceMeter — статы бойца (health, stamina, strength, melee range).
//!
//! Инвариант: 0 ≤ stat ≤ max_stat всегда.
//! Реген stamina выключается на `stamina_regen_delay` после ЛЮБОГО расхода;
//! повторный расход перезапускает задержку (retriggerable, не суммируется).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MeterTuning;
use crate::shared::RetriggerableDelay;

/// Идентификатор стата.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Stamina,
    MaxStamina,
    MeleeRange,
}

/// Результат успешного `reduce`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterChange {
    pub stat: Stat,
    pub value: f32,
    /// current / max для health/stamina (None для скалярных статов)
    pub percent: Option<f32>,
    /// true ровно один раз — когда health впервые дошло до 0
    pub reached_zero: bool,
}

#[derive(Component, Debug, Clone)]
pub struct ResourceMeter {
    health: f32,
    max_health: f32,
    strength: f32,
    stamina: f32,
    max_stamina: f32,
    melee_range: f32,
    regen_rate: f32,
    regen_enabled: bool,
    regen_delay: RetriggerableDelay,
    depleted: bool,
    /// Изменения с прошлого `drain_changes` (публикуются как events)
    changes: Vec<MeterChange>,
}

impl Default for ResourceMeter {
    fn default() -> Self {
        Self::new(&MeterTuning::default())
    }
}

/// Constant-rate интерполяция к target без перелёта.
pub fn interp_to_constant(current: f32, target: f32, delta: f32, speed: f32) -> f32 {
    let distance = target - current;
    let step = speed * delta;

    if speed <= 0.0 || distance.abs() <= step {
        target
    } else {
        current + step * distance.signum()
    }
}

impl ResourceMeter {
    pub fn new(tuning: &MeterTuning) -> Self {
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            strength: tuning.strength,
            stamina: tuning.max_stamina,
            max_stamina: tuning.max_stamina,
            melee_range: tuning.melee_range,
            regen_rate: tuning.stamina_regen_rate,
            regen_enabled: true,
            regen_delay: RetriggerableDelay::new(tuning.stamina_regen_delay),
            depleted: false,
            changes: Vec::new(),
        }
    }

    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Health => self.health,
            Stat::MaxHealth => self.max_health,
            Stat::Strength => self.strength,
            Stat::Stamina => self.stamina,
            Stat::MaxStamina => self.max_stamina,
            Stat::MeleeRange => self.melee_range,
        }
    }

    /// Прямая установка стата (спавн, сценарии). Результат клампится.
    pub fn set(&mut self, stat: Stat, value: f32) {
        let value = value.max(0.0);
        match stat {
            Stat::Health => self.health = value.min(self.max_health),
            Stat::Stamina => self.stamina = value.min(self.max_stamina),
            Stat::MaxHealth => {
                self.max_health = value;
                self.health = self.health.min(value);
            }
            Stat::MaxStamina => {
                self.max_stamina = value;
                self.stamina = self.stamina.min(value);
            }
            Stat::Strength => self.strength = value,
            Stat::MeleeRange => self.melee_range = value,
        }
    }

    /// Вычесть `amount` из стата.
    ///
    /// None — no-op (health уже ≤ 0). Для stamina выключает реген и
    /// (пере)запускает задержку.
    pub fn reduce(&mut self, stat: Stat, amount: f32) -> Option<MeterChange> {
        if stat == Stat::Health && self.health <= 0.0 {
            return None;
        }

        let value = (self.get(stat) - amount).max(0.0);
        self.set(stat, value);

        if stat == Stat::Stamina {
            self.regen_enabled = false;
            self.regen_delay.trigger();
        }

        let reached_zero = stat == Stat::Health && self.health <= 0.0 && !self.depleted;
        if reached_zero {
            self.depleted = true;
        }

        let change = MeterChange {
            stat,
            value: self.get(stat),
            percent: self.percent_for(stat),
            reached_zero,
        };
        self.changes.push(change);
        Some(change)
    }

    /// Реген stamina (вызывается каждый тик безусловно).
    ///
    /// Сначала продвигает задержку: если она истекла на этом тике, реген
    /// включается и работает уже в этом же тике.
    pub fn regen_tick(&mut self, delta: f32) -> Option<MeterChange> {
        if self.regen_delay.tick(delta) {
            self.regen_enabled = true;
        }

        if !self.regen_enabled || self.stamina >= self.max_stamina {
            return None;
        }

        self.stamina = interp_to_constant(self.stamina, self.max_stamina, delta, self.regen_rate)
            .clamp(0.0, self.max_stamina);

        let change = MeterChange {
            stat: Stat::Stamina,
            value: self.stamina,
            percent: self.percent_for(Stat::Stamina),
            reached_zero: false,
        };
        self.changes.push(change);
        Some(change)
    }

    /// Забрать накопленные изменения (для публикации events).
    pub fn drain_changes(&mut self) -> Vec<MeterChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_enough(&self, stat: Stat, cost: f32) -> bool {
        self.get(stat) >= cost
    }

    pub fn percentage(current: f32, max: f32) -> f32 {
        if max <= 0.0 {
            0.0
        } else {
            current / max
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_regen_enabled(&self) -> bool {
        self.regen_enabled
    }

    pub fn regen_delay_remaining(&self) -> Option<f32> {
        self.regen_delay.remaining()
    }

    fn percent_for(&self, stat: Stat) -> Option<f32> {
        match stat {
            Stat::Health | Stat::MaxHealth => Some(Self::percentage(self.health, self.max_health)),
            Stat::Stamina | Stat::MaxStamina => {
                Some(Self::percentage(self.stamina, self.max_stamina))
            }
            Stat::Strength | Stat::MeleeRange => None,
        }
    }
}
