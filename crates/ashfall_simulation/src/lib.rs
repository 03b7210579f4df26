//! Ashfall Simulation Core
//!
//! ECS-симуляция ближнего боя на Bevy 0.16: игрок против босса.
//!
//! Разделение ответственности:
//! - ECS = game state и правила (meters, guard/parry, hit volumes, combo, AI tasks)
//! - Внешний движок = анимации, навигация, геометрия. Здесь они заменены
//!   headless stand-ins (`Animator`, `Locomotion`, `HurtboxSweep`), чтобы весь
//!   цикл крутился в тестах.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, EnemyState, EnemyStateRegister, TargetDetected};
pub use combat::{
    CombatPlugin, DamageDealt, GuardState, HealthDepleted, HitEffect, ResourceMeter, Stat,
};
pub use components::*;
pub use config::{CombatTuning, ConfigError};
pub use logger::{init_logger, log, log_error, log_info, log_warning};

use ai::{AgentTimers, CombatTasks, RearGuard};
use animation::Animator;
use combat::{ComboSequencer, HitVolumeTracer, PlayerActions, SocketPair};
use movement::Locomotion;

/// Фазы fixed тика: сначала бой, потом AI
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Combat,
    Ai,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `CombatTuning` и `DeterministicRng`, вставленные до плагина, не перезаписываются.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<CombatTuning>()
            .configure_sets(FixedUpdate, (SimulationSet::Combat, SimulationSet::Ai).chain())
            // Подсистемы
            .add_plugins((CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогнать `ticks` fixed тиков без привязки к реальному времени.
///
/// `app.update()` запускает FixedUpdate столько раз, сколько накопилось
/// wall-clock времени. Для тестов и replay нужен ровно один шаг за вызов.
pub fn run_fixed_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        let world = app.world_mut();
        let timestep = world.resource::<Time<Fixed>>().timestep();
        world.resource_mut::<Time<Fixed>>().advance_by(timestep);
        world.run_schedule(FixedUpdate);
    }
}

/// Сдвинуть double-buffer всех событий симуляции.
///
/// `run_fixed_ticks` не трогает буферы (тесты читают всю историю). Долгий
/// прогон зовёт это раз в тик: событие живёт два вызова, потом выкидывается.
pub fn update_simulation_events(world: &mut World) {
    use ai::TargetDetected;
    use animation::AnimationNotify;
    use combat::{
        AttackPerformed, BlockIntent, BlockReaction, ComboAttackIntent, DamageDealt,
        HealthDepleted, HitEffectTriggered, MeleeHit, ParrySucceeded, ProjectileHit, RollIntent,
        SprintIntent, StaminaSpent, StatPercentChanged, WalkIntent,
    };
    use movement::MoveCompleted;

    update_events::<ComboAttackIntent>(world);
    update_events::<BlockIntent>(world);
    update_events::<SprintIntent>(world);
    update_events::<WalkIntent>(world);
    update_events::<RollIntent>(world);
    update_events::<AttackPerformed>(world);
    update_events::<StaminaSpent>(world);
    update_events::<StatPercentChanged>(world);
    update_events::<HealthDepleted>(world);
    update_events::<MeleeHit>(world);
    update_events::<DamageDealt>(world);
    update_events::<HitEffectTriggered>(world);
    update_events::<BlockReaction>(world);
    update_events::<ParrySucceeded>(world);
    update_events::<ProjectileHit>(world);
    update_events::<AnimationNotify>(world);
    update_events::<TargetDetected>(world);
    update_events::<MoveCompleted>(world);
}

fn update_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

fn tuning_of(world: &World) -> CombatTuning {
    world.get_resource::<CombatTuning>().cloned().unwrap_or_default()
}

/// Spawn игрока: meter, guard, combo, roll/sprint, клинок.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    let tuning = tuning_of(world);

    world
        .spawn((
            Combatant::new("Player"),
            Player,
            Transform::from_translation(position),
            ResourceMeter::new(&tuning.player_stats),
            GuardState::new(&tuning.guard),
            ComboSequencer::new(&tuning.combo),
            PlayerActions::new(&tuning.player),
            // Меч: от рукояти (0.5м) до острия (2.0м)
            HitVolumeTracer::new(&tuning.tracer, vec![SocketPair::blade(0.0, 0.5, 2.0)]),
            Animator::default(),
            Locomotion::new(tuning.player.walk_speed),
            CombatTarget::default(),
        ))
        .id()
}

/// Spawn босса под AI: register, tasks, таймеры, rear check.
///
/// Босс сразу разворачивается к цели (если она уже в мире).
pub fn spawn_boss(
    world: &mut World,
    position: Vec3,
    target: Option<Entity>,
    initial_state: EnemyState,
) -> Entity {
    let tuning = tuning_of(world);

    let mut transform = Transform::from_translation(position);
    if let Some(target_position) = target
        .and_then(|entity| world.get::<Transform>(entity))
        .map(|target_transform| target_transform.translation)
    {
        movement::face_towards(&mut transform, target_position);
    }

    world
        .spawn((
            Combatant::new("Boss"),
            Enemy,
            transform,
            ResourceMeter::new(&tuning.enemy_stats),
            ComboSequencer::with_variants(&tuning.combo, tuning.ai.attack_variants.clone()),
            // Две кромки тяжёлого оружия — одна цель за активацию всё равно получает один удар
            HitVolumeTracer::new(
                &tuning.tracer,
                vec![
                    SocketPair::blade(-0.2, 0.8, 2.4),
                    SocketPair::blade(0.2, 0.8, 2.4),
                ],
            ),
            Animator::default(),
            Locomotion::new(tuning.ai.walk_speed),
            CombatTarget(target),
            EnemyStateRegister::new(initial_state),
            CombatTasks::new(&tuning.ai),
            AgentTimers::default(),
            RearGuard::new(&tuning.rear),
        ))
        .id()
}
