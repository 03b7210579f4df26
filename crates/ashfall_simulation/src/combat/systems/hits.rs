//! Hit pipeline: animation notifies → tracer → resolver → damage.

use bevy::prelude::*;

use crate::animation::{AnimNotify, AnimationNotify};
use crate::combat::{
    BlockReaction, ComboSequencer, DamageDealt, DamageResolver, EnemyFighter, Fighter,
    GuardState, HealthDepleted, HitEffectTriggered, HitVolumeTracer, HurtboxShape, HurtboxSweep,
    MeleeHit, ParrySucceeded, PlayerFighter, ResourceMeter,
};
use crate::components::{Dead, Hurtbox, Player};

/// Система: notifies анимации → tracer и combo
///
/// - HitWindowOpen / HitWindowClose → tracer.attacking
/// - AttackWindowEnd → сброс ledger + combo gate
pub fn apply_combat_notifies(
    mut notifies: EventReader<AnimationNotify>,
    mut attackers: Query<(Option<&mut HitVolumeTracer>, Option<&mut ComboSequencer>)>,
) {
    for event in notifies.read() {
        let Ok((tracer, combo)) = attackers.get_mut(event.entity) else {
            continue;
        };

        match event.notify {
            AnimNotify::HitWindowOpen => {
                if let Some(mut tracer) = tracer {
                    tracer.attacking = true;
                }
            }
            AnimNotify::HitWindowClose => {
                if let Some(mut tracer) = tracer {
                    tracer.attacking = false;
                }
            }
            AnimNotify::AttackWindowEnd => {
                if let Some(mut tracer) = tracer {
                    tracer.reset_ledger();
                }
                if let Some(mut combo) = combo {
                    combo.handle_window_end();
                }
            }
            // Charge readiness — забота AI (ai::systems::reactions), снаряды — spawn_projectiles
            AnimNotify::ChargeReady | AnimNotify::SpawnProjectile => {}
        }
    }
}

/// Система: трассировка оружия → MeleeHit
pub fn trace_hit_volumes(
    mut attackers: Query<(Entity, &Transform, &mut HitVolumeTracer), Without<Dead>>,
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), Without<Dead>>,
    mut hits: EventWriter<MeleeHit>,
) {
    let shapes: Vec<HurtboxShape> = hurtboxes
        .iter()
        .map(|(entity, transform, hurtbox)| HurtboxShape {
            entity,
            center: hurtbox.center(transform),
            radius: hurtbox.radius,
        })
        .collect();

    for (attacker, transform, mut tracer) in attackers.iter_mut() {
        if !tracer.attacking {
            continue;
        }

        let query = HurtboxSweep {
            hurtboxes: &shapes,
            samples: tracer.sweep_samples,
        };

        for hit in tracer.trace(attacker, transform, &query) {
            hits.write(MeleeHit {
                attacker,
                target: hit.target,
                impact_point: hit.impact_point,
            });
        }
    }
}

/// Система: MeleeHit → DamageResolver → take_damage
///
/// Для каждого нового попадания:
/// 1. урон атакующего (через Fighter)
/// 2. resolve (parry → block check) по guard защитника
/// 3. cosmetic effect, block reaction / parry stun
/// 4. take_damage(amount, instigator, causer)
pub fn apply_melee_hits(
    mut hits: EventReader<MeleeHit>,
    mut combatants: ParamSet<(
        Query<(
            &Transform,
            &ResourceMeter,
            Option<&ComboSequencer>,
            Option<&GuardState>,
            Has<Player>,
        )>,
        Query<(&Transform, &mut ResourceMeter, Option<&mut GuardState>), Without<Dead>>,
    )>,
    mut damage_events: EventWriter<DamageDealt>,
    mut effect_events: EventWriter<HitEffectTriggered>,
    mut block_events: EventWriter<BlockReaction>,
    mut parry_events: EventWriter<ParrySucceeded>,
    mut depleted_events: EventWriter<HealthDepleted>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for hit in hits.read() {
        if hit.attacker == hit.target {
            continue;
        }

        // Атакующий: урон через Fighter view + направление взгляда
        let attacker_view = {
            let attackers = combatants.p0();
            attackers.get(hit.attacker).ok().map(
                |(transform, meter, combo, guard, is_player)| {
                    let damage = if is_player {
                        PlayerFighter { meter, guard, combo }.damage()
                    } else {
                        EnemyFighter { meter, combo }.damage()
                    };
                    (damage, *transform.forward())
                },
            )
        };
        let Some((base_damage, attacker_forward)) = attacker_view else {
            continue;
        };

        let mut defenders = combatants.p1();
        let Ok((defender_transform, mut meter, guard)) = defenders.get_mut(hit.target) else {
            continue;
        };

        let resolution = DamageResolver::resolve(
            base_damage,
            hit.attacker,
            attacker_forward,
            *defender_transform.forward(),
            guard.map(Mut::into_inner),
            &mut meter,
            now,
        );

        effect_events.write(HitEffectTriggered {
            target: hit.target,
            effect: resolution.effect,
            impact_point: hit.impact_point,
        });

        if resolution.block_held {
            block_events.write(BlockReaction {
                defender: hit.target,
                attacker: hit.attacker,
            });
        }

        if let Some(stun) = resolution.stun {
            parry_events.write(ParrySucceeded {
                defender: hit.target,
                attacker: stun.target,
                stun_duration: stun.duration,
            });
        }

        let applied =
            DamageResolver::take_damage(&mut meter, resolution.amount, hit.attacker, hit.attacker);

        damage_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            amount: resolution.amount,
            applied: applied.applied,
            effect: resolution.effect,
        });

        if applied.depleted {
            depleted_events.write(HealthDepleted {
                entity: hit.target,
                killer: Some(hit.attacker),
            });
        }
    }
}
