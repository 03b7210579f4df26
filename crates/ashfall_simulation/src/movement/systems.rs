//! Headless навигация
//!
//! Реальный движок ведёт актора по navmesh. Здесь — прямая к цели по плоскости XZ
//! с остановкой на acceptance radius. `use_pathfinding` сохраняется в запросе,
//! но без navmesh путь всегда прямой.

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{Locomotion, MovementCommand};
use super::events::{MoveCompleted, MoveResult};
use crate::combat::Stunned;
use crate::components::Dead;

/// Горизонтальная проекция (движение и повороты только по yaw)
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Повернуть актора лицом к точке (yaw only). Нулевое направление игнорируется.
pub fn face_towards(transform: &mut Transform, point: Vec3) {
    let direction = flatten(point - transform.translation);
    if direction.length_squared() > 1e-6 {
        transform.look_to(direction, Vec3::Y);
    }
}

/// Система: опубликовать отменённые запросы движения (StopMovement / перезапись).
pub fn flush_cancelled_moves(
    mut movers: Query<(Entity, &mut Locomotion)>,
    mut completed: EventWriter<MoveCompleted>,
) {
    for (entity, mut locomotion) in movers.iter_mut() {
        for request in locomotion.drain_cancelled() {
            completed.write(MoveCompleted {
                entity,
                request,
                result: MoveResult::Aborted,
            });
        }
    }
}

/// Система: двигать акторов по их MovementCommand.
///
/// Stunned/Dead акторы стоят на месте (команда не сбрасывается — это делает
/// тот, кто наложил stun).
pub fn drive_locomotion(
    mut actors: Query<(
        Entity,
        &mut Transform,
        Option<&mut Locomotion>,
        Option<&Stunned>,
        Option<&Dead>,
    )>,
    mut completed: EventWriter<MoveCompleted>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Snapshot позиций: FollowEntity и focus читают чужие Transform
    let positions: HashMap<Entity, Vec3> = actors
        .iter()
        .map(|(entity, transform, ..)| (entity, transform.translation))
        .collect();

    for (entity, mut transform, locomotion, stunned, dead) in actors.iter_mut() {
        let Some(mut locomotion) = locomotion else {
            continue;
        };
        if stunned.is_some() || dead.is_some() {
            continue;
        }

        let goal = match locomotion.command {
            MovementCommand::Idle => None,
            MovementCommand::MoveToPosition { target } => Some(target),
            MovementCommand::FollowEntity { target } => match positions.get(&target) {
                Some(position) => Some(*position),
                None => {
                    // Цель пропала → запрос отменяется
                    if let Some(request) = locomotion.finish_active() {
                        completed.write(MoveCompleted {
                            entity,
                            request,
                            result: MoveResult::Aborted,
                        });
                    }
                    None
                }
            },
        };

        if let Some(goal) = goal {
            let offset = flatten(goal - transform.translation);
            let distance = offset.length();

            if distance <= locomotion.acceptance_radius {
                if let Some(request) = locomotion.finish_active() {
                    completed.write(MoveCompleted {
                        entity,
                        request,
                        result: MoveResult::Success,
                    });
                }
            } else {
                let step = (locomotion.max_speed * delta).min(distance - locomotion.acceptance_radius);
                transform.translation += offset / distance * step;
                if locomotion.focus.is_none() {
                    face_towards(&mut transform, goal);
                }
            }
        }

        if let Some(position) = locomotion.focus.and_then(|focus| positions.get(&focus)) {
            face_towards(&mut transform, *position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_towards_is_yaw_only() {
        let mut transform = Transform::from_xyz(0.0, 0.0, 0.0);
        face_towards(&mut transform, Vec3::new(5.0, 3.0, 0.0));

        let forward = *transform.forward();
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_face_towards_ignores_same_point() {
        let mut transform = Transform::IDENTITY;
        face_towards(&mut transform, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }
}
