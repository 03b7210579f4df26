//! Fighter capability set.
//!
//! Роли (игрок / враг) — не иерархия, а разные views над компонентами одного
//! актора. Код, которому нужен "урон атакующего" или "melee range", работает
//! через `&dyn Fighter` и не знает, кто перед ним.

use super::components::{ComboSequencer, GuardState, ResourceMeter, Stat};

pub trait Fighter {
    fn damage(&self) -> f32;
    fn anim_duration(&self) -> f32;
    fn melee_range(&self) -> f32;

    fn is_blocking(&self) -> bool {
        false
    }

    fn is_parrying(&self) -> bool {
        false
    }
}

/// Игрок: урон = strength, может блокировать.
pub struct PlayerFighter<'a> {
    pub meter: &'a ResourceMeter,
    pub guard: Option<&'a GuardState>,
    pub combo: Option<&'a ComboSequencer>,
}

impl Fighter for PlayerFighter<'_> {
    fn damage(&self) -> f32 {
        self.meter.get(Stat::Strength)
    }

    fn anim_duration(&self) -> f32 {
        self.combo.map_or(0.0, |combo| combo.anim_duration)
    }

    fn melee_range(&self) -> f32 {
        self.meter.get(Stat::MeleeRange)
    }

    fn is_blocking(&self) -> bool {
        self.guard.is_some_and(GuardState::is_blocking)
    }

    fn is_parrying(&self) -> bool {
        self.guard.is_some_and(GuardState::is_parrying)
    }
}

/// Враг под AI: урон = strength, длительность последней random attack.
pub struct EnemyFighter<'a> {
    pub meter: &'a ResourceMeter,
    pub combo: Option<&'a ComboSequencer>,
}

impl Fighter for EnemyFighter<'_> {
    fn damage(&self) -> f32 {
        self.meter.get(Stat::Strength)
    }

    fn anim_duration(&self) -> f32 {
        self.combo.map_or(0.0, |combo| combo.anim_duration)
    }

    fn melee_range(&self) -> f32 {
        self.meter.get(Stat::MeleeRange)
    }
}
