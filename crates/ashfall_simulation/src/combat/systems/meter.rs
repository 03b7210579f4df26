//! Resource meter systems: regen, stamina costs, percent notifications.

use bevy::prelude::*;

use crate::combat::{AttackPerformed, ResourceMeter, Stat, StaminaSpent, StatPercentChanged};
use crate::components::Dead;

/// Система: regen stamina для всех живых бойцов
///
/// Работает каждый тик безусловно (задержка регена продвигается внутри meter).
pub fn regenerate_meters(
    mut meters: Query<&mut ResourceMeter, Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut meter in meters.iter_mut() {
        meter.regen_tick(delta);
    }
}

/// Система: списать stamina за атаки, спринт и перекаты
pub fn apply_stamina_costs(
    mut attack_events: EventReader<AttackPerformed>,
    mut spent_events: EventReader<StaminaSpent>,
    mut meters: Query<&mut ResourceMeter>,
) {
    let costs = attack_events
        .read()
        .map(|e| (e.entity, e.cost))
        .chain(spent_events.read().map(|e| (e.entity, e.cost)));

    for (entity, cost) in costs {
        if let Ok(mut meter) = meters.get_mut(entity) {
            meter.reduce(Stat::Stamina, cost);
        }
    }
}

/// Система: опубликовать изменения meter как StatPercentChanged
pub fn publish_meter_changes(
    mut meters: Query<(Entity, &mut ResourceMeter)>,
    mut percent_events: EventWriter<StatPercentChanged>,
) {
    for (entity, mut meter) in meters.iter_mut() {
        // bypass_change_detection: drain не должен помечать meter как изменённый
        for change in meter.bypass_change_detection().drain_changes() {
            if let Some(percent) = change.percent {
                percent_events.write(StatPercentChanged {
                    entity,
                    stat: change.stat,
                    percent,
                });
            }
        }
    }
}
