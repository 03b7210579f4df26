//! DamageResolver — одна точка, где guard, meter и tracer сходятся в урон.
//!
//! Порядок внутри ОДНОГО вызова `resolve`:
//! 1. attempt_parry → Parried (урон 0, stun атакующему)
//! 2. иначе check (blocking → stamina → угол) → Blocked (урон × factor)
//! 3. иначе полный урон; block-failed (не хватило stamina) даёт видимый
//!    эффект Blocked, но урон полный
//!
//! Неудачный parry не даёт второго прохода — он просто проваливается в check.

use bevy::prelude::*;

use super::components::{BlockCheck, GuardState, ResourceMeter, Stat, StunRequest};

/// Визуальная классификация попадания.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum HitEffect {
    Normal,
    Blocked,
    Parried,
}

/// Итог разрешения одного попадания.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResolution {
    pub effect: HitEffect,
    /// Урон для take_damage
    pub amount: f32,
    /// Блок удержан → проиграть block reaction
    pub block_held: bool,
    pub stun: Option<StunRequest>,
}

/// Результат take_damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedDamage {
    pub applied: f32,
    /// Health впервые дошло до 0 этим ударом
    pub depleted: bool,
}

/// Мост между попаданием и статами защитника.
pub struct DamageResolver;

impl DamageResolver {
    /// Разрешить попадание `attacker` по защитнику.
    ///
    /// Защитник без GuardState (босс) всегда получает полный урон.
    pub fn resolve(
        base_damage: f32,
        attacker: Entity,
        attacker_forward: Vec3,
        defender_forward: Vec3,
        guard: Option<&mut GuardState>,
        meter: &mut ResourceMeter,
        now: f32,
    ) -> HitResolution {
        let Some(guard) = guard else {
            return HitResolution {
                effect: HitEffect::Normal,
                amount: base_damage,
                block_held: false,
                stun: None,
            };
        };

        if guard.attempt_parry(now) {
            return HitResolution {
                effect: HitEffect::Parried,
                amount: 0.0,
                block_held: false,
                stun: Some(guard.on_successful_parry(attacker)),
            };
        }

        match guard.check(meter, attacker_forward, defender_forward) {
            BlockCheck::Reduced => HitResolution {
                effect: HitEffect::Blocked,
                amount: guard.reduced_damage(base_damage),
                block_held: true,
                stun: None,
            },
            BlockCheck::NotReduced => HitResolution {
                effect: if guard.last_block_failed {
                    HitEffect::Blocked
                } else {
                    HitEffect::Normal
                },
                amount: base_damage,
                block_held: false,
                stun: None,
            },
        }
    }

    /// Generic damage entry point: (amount, instigator, causer) → applied.
    ///
    /// 0.0 для мёртвого защитника или нулевого урона.
    pub fn take_damage(
        meter: &mut ResourceMeter,
        amount: f32,
        instigator: Entity,
        causer: Entity,
    ) -> AppliedDamage {
        if amount <= 0.0 || !meter.is_alive() {
            return AppliedDamage {
                applied: 0.0,
                depleted: false,
            };
        }

        let before = meter.get(Stat::Health);
        let depleted = meter
            .reduce(Stat::Health, amount)
            .map(|change| change.reached_zero)
            .unwrap_or(false);
        let applied = before - meter.get(Stat::Health);

        crate::logger::log(&format!(
            "💥 Took {:.1} damage from {:?} (causer {:?}), health left {:.1}",
            applied,
            instigator,
            causer,
            meter.get(Stat::Health)
        ));

        AppliedDamage { applied, depleted }
    }
}
