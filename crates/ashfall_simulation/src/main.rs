//! Headless дуэль: игрок против босса
//!
//! Запуск: `ashfall_simulation [tuning.toml]`
//! Игрок скриптовый: держит блок, когда босс рядом, и отвечает комбо.

use bevy::prelude::*;

use ashfall_simulation::combat::{BlockIntent, ComboAttackIntent};
use ashfall_simulation::{
    create_headless_app, log_error, run_fixed_ticks, spawn_boss, spawn_player,
    update_simulation_events, CombatTarget, CombatTuning, Dead, EnemyState, EnemyStateRegister,
    ResourceMeter, SimulationPlugin, Stat, TargetDetected,
};

const SEED: u64 = 42;
const MAX_TICKS: u32 = 60 * 120;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)?;
            CombatTuning::from_toml_str(&source).inspect_err(|err| {
                log_error(&format!("Invalid tuning file {}: {}", path, err));
            })?
        }
        None => CombatTuning::default(),
    };

    println!("Starting Ashfall duel (seed: {})", SEED);

    let mut app = create_headless_app(SEED);
    app.insert_resource(tuning).add_plugins(SimulationPlugin);

    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let boss = spawn_boss(world, Vec3::new(0.0, 0.0, -12.0), Some(player), EnemyState::Idle);
    world.entity_mut(player).insert(CombatTarget::new(boss));

    world.send_event(TargetDetected {
        observer: boss,
        target: player,
    });

    for tick in 0..MAX_TICKS {
        drive_scripted_player(app.world_mut(), player, boss, tick);
        run_fixed_ticks(&mut app, 1);
        update_simulation_events(app.world_mut());

        let world = app.world();
        if tick % 60 == 0 {
            let player_health = world.get::<ResourceMeter>(player).map(|m| m.get(Stat::Health));
            let boss_health = world.get::<ResourceMeter>(boss).map(|m| m.get(Stat::Health));
            let boss_state = world.get::<EnemyStateRegister>(boss).map(|r| r.get_state());
            println!(
                "t={:>3}s player hp {:?} | boss hp {:?} | boss state {:?}",
                tick / 60,
                player_health,
                boss_health,
                boss_state
            );
        }

        if world.get::<Dead>(player).is_some() {
            println!("Player fell at tick {}", tick);
            break;
        }
        if world.get_entity(boss).is_err() || world.get::<Dead>(boss).is_some() {
            println!("Boss defeated at tick {}", tick);
            break;
        }
    }

    println!("Simulation complete!");
    Ok(())
}

/// Блок, пока босс ближе 4м; раз в секунду — удар.
fn drive_scripted_player(world: &mut World, player: Entity, boss: Entity, tick: u32) {
    let (Some(player_transform), Some(boss_transform)) =
        (world.get::<Transform>(player), world.get::<Transform>(boss))
    else {
        return;
    };
    let close = player_transform.translation.distance(boss_transform.translation) < 4.0;

    if tick % 60 == 0 && close {
        world.send_event(ComboAttackIntent { entity: player });
    } else if tick % 60 == 30 {
        world.send_event(BlockIntent {
            entity: player,
            start: close,
        });
    }
}
