//! Projectile: снаряд ranged атаки босса.
//!
//! Летит по прямой с постоянной скоростью. Каждый тик отрезок полёта
//! проверяется против hurtbox сфер (расширенных на радиус снаряда), первое
//! попадание по кому-то кроме стрелка уничтожает снаряд.

use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;

use super::tracer::HurtboxShape;
use crate::config::ProjectileTuning;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    /// Кто выпустил (self-hit игнорируется, урон атрибутируется ему)
    pub shooter: Entity,
    /// Направление полёта (нормализовано)
    pub direction: Vec3,
    /// м/с
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    /// Секунды до самоуничтожения
    pub lifetime: f32,
}

/// Попадание снаряда за один шаг.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileContact {
    pub target: Entity,
    pub impact_point: Vec3,
}

impl Projectile {
    /// Снаряд от `origin` к `aim`. Вырожденное направление → `fallback`.
    pub fn aimed(
        tuning: &ProjectileTuning,
        shooter: Entity,
        origin: Vec3,
        aim: Vec3,
        fallback: Vec3,
    ) -> Self {
        Self {
            shooter,
            direction: (aim - origin).try_normalize().unwrap_or(fallback),
            speed: tuning.speed,
            damage: tuning.damage,
            radius: tuning.radius,
            lifetime: tuning.lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Ближайшая hurtbox на отрезке `position → position + direction·speed·delta`.
    pub fn first_contact(
        &self,
        position: Vec3,
        delta: f32,
        hurtboxes: &[HurtboxShape],
    ) -> Option<ProjectileContact> {
        let direction = Dir3::new(self.direction).ok()?;
        let ray = RayCast3d::new(position, direction, self.speed * delta);

        hurtboxes
            .iter()
            .filter(|hurtbox| hurtbox.entity != self.shooter)
            .filter_map(|hurtbox| {
                let sphere = BoundingSphere::new(hurtbox.center, hurtbox.radius + self.radius);
                ray.sphere_intersection_at(&sphere)
                    .map(|distance| (distance, hurtbox.entity))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, target)| ProjectileContact {
                target,
                impact_point: position + self.direction * distance,
            })
    }

    /// Сдвинуть снаряд на один тик, вернуть новую позицию.
    pub fn advance(&mut self, position: Vec3, delta: f32) -> Vec3 {
        self.lifetime -= delta;
        position + self.direction * self.speed * delta
    }
}
