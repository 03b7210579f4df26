//! Combat system module
//!
//! ECS ответственность:
//! - Game state: ResourceMeter, GuardState, ComboSequencer, HitVolumeTracer
//! - Combat rules: parry window, block check, hit dedup, stamina costs
//! - Projectiles: ranged атака босса (SpawnProjectile notify → полёт → take_damage)
//! - Events: intents на входе, DamageDealt / HealthDepleted / HitEffectTriggered на выходе
//!
//! Внешний движок (здесь — headless stand-ins):
//! - Animator: тайминг атак, hit window notifies
//! - Hurtbox sweep: геометрия попаданий

use bevy::prelude::*;

pub mod components;
pub mod damage;
pub mod events;
pub mod fighter;
pub mod systems;


// Re-export основных типов
pub use components::*;
pub use damage::{AppliedDamage, DamageResolver, HitEffect, HitResolution};
pub use events::*;
pub use fighter::{EnemyFighter, Fighter, PlayerFighter};

use crate::animation::{advance_animators, AnimationNotify};
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. Guard: block intents, parry window, stun timers
/// 2. Player intents: combo attack, sprint/walk/roll
/// 3. Meter: stamina costs, regen
/// 4. Animation: timeline → notifies → tracer/combo
/// 5. Hits: trace → resolve → damage, parry stun, block reaction; снаряды: spawn → полёт → damage
/// 6. Death, despawn, percent notifications
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ComboAttackIntent>()
            .add_event::<BlockIntent>()
            .add_event::<SprintIntent>()
            .add_event::<WalkIntent>()
            .add_event::<RollIntent>()
            .add_event::<AttackPerformed>()
            .add_event::<StaminaSpent>()
            .add_event::<StatPercentChanged>()
            .add_event::<HealthDepleted>()
            .add_event::<MeleeHit>()
            .add_event::<DamageDealt>()
            .add_event::<HitEffectTriggered>()
            .add_event::<BlockReaction>()
            .add_event::<ParrySucceeded>()
            .add_event::<ProjectileHit>()
            .add_event::<AnimationNotify>();

        app.add_systems(
            FixedUpdate,
            (
                (
                    // Фаза 1: Guard
                    systems::handle_block_intents,
                    systems::tick_guards,
                    systems::tick_stuns,
                    // Фаза 2: Player intents
                    systems::handle_combo_intents,
                    systems::tick_combos,
                    systems::handle_movement_intents,
                    systems::tick_player_actions,
                    // Фаза 3: Stamina
                    systems::apply_stamina_costs,
                    systems::regenerate_meters,
                    // Фаза 4: Animation notifies
                    advance_animators,
                    systems::apply_combat_notifies,
                )
                    .chain(),
                (
                    // Фаза 5: Hits (melee, потом снаряды)
                    systems::trace_hit_volumes,
                    systems::apply_melee_hits,
                    systems::apply_parry_stuns,
                    systems::play_block_reactions,
                    systems::spawn_projectiles,
                    systems::move_projectiles,
                    systems::apply_projectile_hits,
                    // Фаза 6: Death + UI notifications
                    systems::handle_health_depleted,
                    systems::despawn_after_timeout,
                    systems::publish_meter_changes,
                )
                    .chain(),
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Combat),
        );
    }
}
