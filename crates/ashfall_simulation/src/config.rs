//! Combat tuning (data-driven balance)
//!
//! Все числа баланса живут здесь, дефолты — в `Default` impls (как AIConfig).
//! Дизайнер может переопределить любое поле через TOML:
//!
//! ```toml
//! [guard]
//! parry_window = 0.25
//!
//! [ai]
//! charge_speed = 18.0
//! ```
//!
//! Неизвестные ключи — ошибка парсинга (опечатка в имени стата ловится на старте,
//! а не молча игнорируется в рантайме).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{AnimNotify, AnimationClip};

/// Ошибки конфигурации. Единственная fallible поверхность крейта.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse combat tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{owner} has no attack variants")]
    NoAttackVariants { owner: &'static str },

    #[error("clip '{clip}' has hit window outside 0..{duration}")]
    InvalidHitWindow { clip: String, duration: f32 },

    #[error("clip '{clip}' fires its timed notify at {at}, outside 0..{duration}")]
    InvalidNotifyTime { clip: String, at: f32, duration: f32 },

    #[error("clip '{clip}' must end with the {expected:?} notify")]
    MissingEndNotify { clip: String, expected: AnimNotify },
}

/// Стартовые значения ResourceMeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeterTuning {
    pub max_health: f32,
    pub max_stamina: f32,
    pub strength: f32,
    pub melee_range: f32,
    /// Единиц stamina в секунду (constant-rate interp)
    pub stamina_regen_rate: f32,
    /// Пауза регена после любого расхода stamina (секунды)
    pub stamina_regen_delay: f32,
}

impl Default for MeterTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            strength: 10.0,
            melee_range: 5.0,
            stamina_regen_rate: 10.0,
            stamina_regen_delay: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardTuning {
    pub stamina_cost: f32,
    pub parry_window: f32,
    pub parry_stun_duration: f32,
    /// dot(opponent_forward, self_forward) выше порога → удар с фланга/спины
    pub frontal_threshold: f32,
    pub reduction_factor: f32,
    pub block_reaction: AnimationClip,
}

impl Default for GuardTuning {
    fn default() -> Self {
        Self {
            stamina_cost: 10.0,
            parry_window: 0.2,
            parry_stun_duration: 2.0,
            frontal_threshold: 0.0,
            reduction_factor: 0.3,
            block_reaction: AnimationClip::new("block_react", 0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracerTuning {
    /// Сечение box вокруг клинка (метры)
    pub box_width: f32,
    /// Сколько точек sweep проверяет между прошлой и текущей позой
    pub sweep_samples: u32,
}

impl Default for TracerTuning {
    fn default() -> Self {
        Self {
            box_width: 0.3,
            sweep_samples: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComboTuning {
    pub stamina_cost: f32,
    pub reset_time: f32,
    pub variants: Vec<AnimationClip>,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            stamina_cost: 15.0,
            reset_time: 1.0,
            variants: vec![
                AnimationClip::attack("combo_1", 0.9, (0.3, 0.55)),
                AnimationClip::attack("combo_2", 0.9, (0.3, 0.55)),
                AnimationClip::attack("combo_3", 1.2, (0.45, 0.8)),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiTuning {
    /// Дальше этого радиуса melee task сначала идёт к цели
    pub attack_radius: f32,
    pub acceptance_radius: f32,
    pub walk_speed: f32,
    pub charge_speed: f32,
    pub post_charge_pause: f32,
    pub range_threshold_ceiling: f32,
    pub range_threshold_step: f32,
    /// Пауза scheduler после ranged атаки
    pub range_rest: f32,
    pub attack_variants: Vec<AnimationClip>,
    pub range_attack: AnimationClip,
    pub charge_windup: AnimationClip,
    pub death: AnimationClip,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            attack_radius: 3.0,
            acceptance_radius: 2.5,
            walk_speed: 5.0,
            charge_speed: 20.0,
            post_charge_pause: 1.0,
            range_threshold_ceiling: 0.9,
            range_threshold_step: 0.1,
            range_rest: 1.5,
            attack_variants: vec![
                AnimationClip::attack("boss_swing", 1.4, (0.5, 0.8)),
                AnimationClip::attack("boss_slam", 1.8, (0.9, 1.2)),
                AnimationClip::attack("boss_sweep", 1.6, (0.6, 1.0)),
            ],
            range_attack: AnimationClip::new("boss_throw", 1.2)
                .with_timed_notify(0.6, AnimNotify::SpawnProjectile),
            charge_windup: AnimationClip::new("boss_charge_windup", 0.8)
                .with_end_notify(AnimNotify::ChargeReady),
            death: AnimationClip::new("boss_death", 2.5),
        }
    }
}

/// Снаряд ranged атаки босса (выпускается SpawnProjectile notify).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    /// Секунды полёта до самоуничтожения
    pub lifetime: f32,
    /// Точка выпуска относительно стрелка: высота и вынос вперёд
    pub spawn_height: f32,
    pub spawn_forward: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 15.0,
            damage: 10.0,
            radius: 0.25,
            lifetime: 3.0,
            spawn_height: 1.5,
            spawn_forward: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RearTuning {
    /// Угол (градусы) между forward и направлением на цель
    pub angle_threshold_deg: f32,
    pub behind_check_time: f32,
    pub turn_speed: f32,
    pub yaw_epsilon_deg: f32,
    pub rear_attack: AnimationClip,
}

impl Default for RearTuning {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 120.0,
            behind_check_time: 1.0,
            turn_speed: 8.0,
            yaw_epsilon_deg: 1.0,
            rear_attack: AnimationClip::attack("boss_tail_swipe", 1.0, (0.3, 0.6)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Расход stamina за тик спринта
    pub sprint_cost: f32,
    pub roll_cost: f32,
    pub roll: AnimationClip,
    pub death: AnimationClip,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            sprint_speed: 10.0,
            sprint_cost: 0.1,
            roll_cost: 5.0,
            roll: AnimationClip::new("roll", 0.7),
            death: AnimationClip::new("player_death", 2.0),
        }
    }
}

/// Весь баланс боя (Resource, вставляется SimulationPlugin).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatTuning {
    pub player_stats: MeterTuning,
    pub enemy_stats: MeterTuning,
    pub guard: GuardTuning,
    pub tracer: TracerTuning,
    pub combo: ComboTuning,
    pub ai: AiTuning,
    pub projectile: ProjectileTuning,
    pub rear: RearTuning,
    pub player: PlayerTuning,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            player_stats: MeterTuning::default(),
            enemy_stats: MeterTuning {
                max_health: 400.0,
                strength: 20.0,
                ..MeterTuning::default()
            },
            guard: GuardTuning::default(),
            tracer: TracerTuning::default(),
            combo: ComboTuning::default(),
            ai: AiTuning::default(),
            projectile: ProjectileTuning::default(),
            rear: RearTuning::default(),
            player: PlayerTuning::default(),
        }
    }
}

impl CombatTuning {
    /// Парсинг + валидация.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: CombatTuning = toml::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_meter(&self.player_stats)?;
        validate_meter(&self.enemy_stats)?;

        positive("guard.parry_window", self.guard.parry_window)?;
        positive("guard.parry_stun_duration", self.guard.parry_stun_duration)?;
        unit_range("guard.reduction_factor", self.guard.reduction_factor)?;
        validate_clip(&self.guard.block_reaction)?;

        positive("tracer.box_width", self.tracer.box_width)?;
        if self.tracer.sweep_samples == 0 {
            return Err(ConfigError::NonPositive {
                field: "tracer.sweep_samples",
                value: 0.0,
            });
        }

        positive("combo.reset_time", self.combo.reset_time)?;
        if self.combo.variants.is_empty() {
            return Err(ConfigError::NoAttackVariants { owner: "combo" });
        }
        self.combo.variants.iter().try_for_each(validate_clip)?;

        positive("ai.attack_radius", self.ai.attack_radius)?;
        positive("ai.charge_speed", self.ai.charge_speed)?;
        positive("ai.walk_speed", self.ai.walk_speed)?;
        unit_range("ai.range_threshold_ceiling", self.ai.range_threshold_ceiling)?;
        unit_range("ai.range_threshold_step", self.ai.range_threshold_step)?;
        if self.ai.attack_variants.is_empty() {
            return Err(ConfigError::NoAttackVariants { owner: "ai" });
        }
        self.ai.attack_variants.iter().try_for_each(validate_clip)?;
        validate_clip(&self.ai.range_attack)?;
        validate_clip(&self.ai.charge_windup)?;
        // Без ChargeReady charge task ждал бы рывка вечно
        if self.ai.charge_windup.end_notify != Some(AnimNotify::ChargeReady) {
            return Err(ConfigError::MissingEndNotify {
                clip: self.ai.charge_windup.name.clone(),
                expected: AnimNotify::ChargeReady,
            });
        }
        validate_clip(&self.ai.death)?;

        positive("projectile.speed", self.projectile.speed)?;
        positive("projectile.radius", self.projectile.radius)?;
        positive("projectile.lifetime", self.projectile.lifetime)?;

        positive("rear.angle_threshold_deg", self.rear.angle_threshold_deg)?;
        positive("rear.turn_speed", self.rear.turn_speed)?;
        positive("rear.yaw_epsilon_deg", self.rear.yaw_epsilon_deg)?;
        validate_clip(&self.rear.rear_attack)?;

        positive("player.walk_speed", self.player.walk_speed)?;
        positive("player.sprint_speed", self.player.sprint_speed)?;
        validate_clip(&self.player.roll)?;
        validate_clip(&self.player.death)?;

        Ok(())
    }
}

fn validate_meter(meter: &MeterTuning) -> Result<(), ConfigError> {
    positive("max_health", meter.max_health)?;
    positive("max_stamina", meter.max_stamina)?;
    positive("melee_range", meter.melee_range)?;
    positive("stamina_regen_rate", meter.stamina_regen_rate)?;
    Ok(())
}

fn validate_clip(clip: &AnimationClip) -> Result<(), ConfigError> {
    positive("clip.duration", clip.duration)?;

    if let Some((open, close)) = clip.hit_window {
        if open < 0.0 || close < open || close > clip.duration {
            return Err(ConfigError::InvalidHitWindow {
                clip: clip.name.clone(),
                duration: clip.duration,
            });
        }
    }

    if let Some((at, _)) = clip.timed_notify {
        if !(0.0..=clip.duration).contains(&at) {
            return Err(ConfigError::InvalidNotifyTime {
                clip: clip.name.clone(),
                at,
                duration: clip.duration,
            });
        }
    }

    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
