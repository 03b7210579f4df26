//! Projectile pipeline: SpawnProjectile notify → полёт → take_damage.

use bevy::prelude::*;

use crate::animation::{AnimNotify, AnimationNotify};
use crate::combat::{
    DamageDealt, DamageResolver, HealthDepleted, HitEffect, HitEffectTriggered, HurtboxShape,
    Projectile, ProjectileHit, ResourceMeter,
};
use crate::components::{CombatTarget, Dead, Hurtbox};
use crate::config::CombatTuning;

/// Система: SpawnProjectile notify → снаряд в сторону цели
///
/// Точка выпуска — перед стрелком на высоте руки. Без цели снаряд летит
/// по взгляду стрелка.
pub fn spawn_projectiles(
    mut notifies: EventReader<AnimationNotify>,
    mut commands: Commands,
    shooters: Query<(&Transform, Option<&CombatTarget>), Without<Dead>>,
    targets: Query<(&Transform, Option<&Hurtbox>)>,
    tuning: Res<CombatTuning>,
) {
    for event in notifies.read() {
        if event.notify != AnimNotify::SpawnProjectile {
            continue;
        }
        let Ok((transform, target)) = shooters.get(event.entity) else {
            continue;
        };

        let forward = *transform.forward();
        let origin = transform.translation
            + Vec3::Y * tuning.projectile.spawn_height
            + forward * tuning.projectile.spawn_forward;

        let aim = target
            .and_then(CombatTarget::get)
            .and_then(|entity| targets.get(entity).ok())
            .map(|(target_transform, hurtbox)| match hurtbox {
                Some(hurtbox) => hurtbox.center(target_transform),
                None => target_transform.translation,
            })
            .unwrap_or(origin + forward);

        let projectile = Projectile::aimed(&tuning.projectile, event.entity, origin, aim, forward);
        crate::logger::log(&format!(
            "🪨 {:?} throws projectile from {:?} dir {:?}",
            event.entity, origin, projectile.direction
        ));
        commands.spawn((projectile, Transform::from_translation(origin)));
    }
}

/// Система: полёт снарядов
///
/// Попадание → ProjectileHit + despawn. Истёк lifetime → despawn.
pub fn move_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile)>,
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), (Without<Dead>, Without<Projectile>)>,
    mut hits: EventWriter<ProjectileHit>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    let shapes: Vec<HurtboxShape> = hurtboxes
        .iter()
        .map(|(entity, transform, hurtbox)| HurtboxShape {
            entity,
            center: hurtbox.center(transform),
            radius: hurtbox.radius,
        })
        .collect();

    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        if let Some(contact) = projectile.first_contact(transform.translation, delta, &shapes) {
            hits.write(ProjectileHit {
                shooter: projectile.shooter,
                target: contact.target,
                damage: projectile.damage,
                impact_point: contact.impact_point,
            });
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation = projectile.advance(transform.translation, delta);
        if projectile.is_expired() {
            commands.entity(entity).despawn();
        }
    }
}

/// Система: ProjectileHit → take_damage
///
/// Снаряд не проходит через guard: ни блок, ни parry его не останавливают.
pub fn apply_projectile_hits(
    mut hits: EventReader<ProjectileHit>,
    mut defenders: Query<&mut ResourceMeter, Without<Dead>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut effect_events: EventWriter<HitEffectTriggered>,
    mut depleted_events: EventWriter<HealthDepleted>,
) {
    for hit in hits.read() {
        let Ok(mut meter) = defenders.get_mut(hit.target) else {
            continue;
        };

        effect_events.write(HitEffectTriggered {
            target: hit.target,
            effect: HitEffect::Normal,
            impact_point: hit.impact_point,
        });

        let applied = DamageResolver::take_damage(&mut meter, hit.damage, hit.shooter, hit.shooter);

        damage_events.write(DamageDealt {
            attacker: hit.shooter,
            target: hit.target,
            amount: hit.damage,
            applied: applied.applied,
            effect: HitEffect::Normal,
        });

        if applied.depleted {
            depleted_events.write(HealthDepleted {
                entity: hit.target,
                killer: Some(hit.shooter),
            });
        }
    }
}
