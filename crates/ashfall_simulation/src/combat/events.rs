//! Combat events: intents (input side), hits, notifications (output side).

use bevy::prelude::*;

use super::components::Stat;
use super::damage::HitEffect;

// ============================================================================
// Intents (player input → simulation)
// ============================================================================

/// Player pressed attack.
#[derive(Event, Debug, Clone)]
pub struct ComboAttackIntent {
    pub entity: Entity,
}

/// Player pressed (`start = true`) or released block.
#[derive(Event, Debug, Clone)]
pub struct BlockIntent {
    pub entity: Entity,
    pub start: bool,
}

/// Sprint held. `moving` — есть ли ввод движения в этом тике.
#[derive(Event, Debug, Clone)]
pub struct SprintIntent {
    pub entity: Entity,
    pub moving: bool,
}

#[derive(Event, Debug, Clone)]
pub struct WalkIntent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct RollIntent {
    pub entity: Entity,
}

// ============================================================================
// Stamina / meter notifications
// ============================================================================

/// Combo attack started: attacker pays `cost` stamina.
#[derive(Event, Debug, Clone)]
pub struct AttackPerformed {
    pub entity: Entity,
    pub cost: f32,
}

/// Sprint/roll stamina cost.
#[derive(Event, Debug, Clone)]
pub struct StaminaSpent {
    pub entity: Entity,
    pub cost: f32,
}

/// Health/stamina percentage changed (UI bars).
#[derive(Event, Debug, Clone)]
pub struct StatPercentChanged {
    pub entity: Entity,
    pub stat: Stat,
    pub percent: f32,
}

/// Health reached zero (fires once per combatant).
#[derive(Event, Debug, Clone)]
pub struct HealthDepleted {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

// ============================================================================
// Hits and outcomes
// ============================================================================

/// Tracer found a new defender this activation.
#[derive(Event, Debug, Clone)]
pub struct MeleeHit {
    pub attacker: Entity,
    pub target: Entity,
    pub impact_point: Vec3,
}

/// Projectile reached a hurtbox (projectile already despawned).
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    pub shooter: Entity,
    pub target: Entity,
    pub damage: f32,
    pub impact_point: Vec3,
}

/// Damage applied through the generic damage entry point.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    /// Amount passed to take_damage (after block reduction)
    pub amount: f32,
    /// Health actually removed (0 when fully absorbed)
    pub applied: f32,
    pub effect: HitEffect,
}

/// Cosmetic hit effect (particles/sound, fire-and-forget).
#[derive(Event, Debug, Clone)]
pub struct HitEffectTriggered {
    pub target: Entity,
    pub effect: HitEffect,
    pub impact_point: Vec3,
}

/// Defender held the block (block reaction clip played).
#[derive(Event, Debug, Clone)]
pub struct BlockReaction {
    pub defender: Entity,
    pub attacker: Entity,
}

/// Defender parried: attacker gets stunned for `stun_duration`.
#[derive(Event, Debug, Clone)]
pub struct ParrySucceeded {
    pub defender: Entity,
    pub attacker: Entity,
    pub stun_duration: f32,
}
