//! RearGuard — реакция босса на игрока за спиной.
//!
//! Каждый тик: угол между forward и направлением на цель. Если цель держится
//! в заднем секторе `behind_check_time` секунд подряд — случайная реакция:
//! удар хвостом или плавный разворот к цели.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::config::RearTuning;
use crate::movement::flatten;

/// Что делает босс, когда цель слишком долго за спиной
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearReaction {
    /// Rear attack анимация
    Attack,
    /// Плавный разворот к цели
    Turn,
}

impl RearReaction {
    /// 50/50
    pub fn choose(rng: &mut dyn RngCore) -> Self {
        if rng.gen_bool(0.5) {
            Self::Attack
        } else {
            Self::Turn
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct RearGuard {
    pub angle_threshold_deg: f32,
    pub behind_check_time: f32,
    pub turn_speed: f32,
    pub yaw_epsilon_deg: f32,
    target_behind: bool,
    time_behind: f32,
    /// Some — идёт разворот к захваченной rotation
    turn_target: Option<Quat>,
}

impl Default for RearGuard {
    fn default() -> Self {
        Self::new(&RearTuning::default())
    }
}

impl RearGuard {
    pub fn new(tuning: &RearTuning) -> Self {
        Self {
            angle_threshold_deg: tuning.angle_threshold_deg,
            behind_check_time: tuning.behind_check_time,
            turn_speed: tuning.turn_speed,
            yaw_epsilon_deg: tuning.yaw_epsilon_deg,
            target_behind: false,
            time_behind: 0.0,
            turn_target: None,
        }
    }

    /// Угол (градусы) между forward и направлением на цель больше порога?
    ///
    /// Цель в той же точке → угол 90°, не "за спиной".
    pub fn is_target_behind(&self, forward: Vec3, to_target: Vec3) -> bool {
        let direction = flatten(to_target).normalize_or_zero();
        let dot = flatten(forward).normalize_or_zero().dot(direction);
        let angle = dot.clamp(-1.0, 1.0).acos().to_degrees();
        angle > self.angle_threshold_deg
    }

    /// Обновить накопленное время за спиной.
    ///
    /// Первый тик в заднем секторе только отмечает вход (время = 0), дальше
    /// время копится. Возвращает true на тике реакции, после чего отсчёт
    /// начинается заново. Выход из сектора мгновенно сбрасывает время.
    pub fn update(&mut self, behind: bool, delta: f32) -> bool {
        if !behind {
            self.target_behind = false;
            self.time_behind = 0.0;
            return false;
        }

        if !self.target_behind {
            self.target_behind = true;
            self.time_behind = 0.0;
            return false;
        }

        self.time_behind += delta;
        if self.time_behind >= self.behind_check_time {
            self.time_behind = 0.0;
            return true;
        }
        false
    }

    pub fn time_behind(&self) -> f32 {
        self.time_behind
    }

    pub fn is_turning(&self) -> bool {
        self.turn_target.is_some()
    }

    /// Захватить rotation "лицом к цели" (yaw only) и начать разворот.
    pub fn begin_turn(&mut self, transform: &Transform, target_position: Vec3) {
        let direction = flatten(target_position - transform.translation);
        if direction.length_squared() <= 1e-6 {
            return;
        }
        self.turn_target = Some(Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation);
    }

    /// Шаг разворота: интерполяция к захваченной rotation со скоростью turn_speed.
    /// Разворот заканчивается, когда ошибка по yaw меньше epsilon.
    pub fn turn_step(&mut self, transform: &mut Transform, delta: f32) {
        let Some(target) = self.turn_target else {
            return;
        };

        let alpha = (delta * self.turn_speed).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(target, alpha);

        if transform.rotation.angle_between(target).to_degrees() < self.yaw_epsilon_deg {
            self.turn_target = None;
        }
    }

    /// Прервать разворот (stun, смерть)
    pub fn cancel_turn(&mut self) {
        self.turn_target = None;
    }
}
