//! Headless симуляция Slimy Savior
//!
//! Запускает полную симуляцию без движка. Простейший "хост" в этом файле:
//! мгновенно завершает загрузки уровней, детектит пересечения по дистанции
//! и стреляет в ближайшего врага.
//!
//! Usage: slime_simulation [config.json] [progress.json]

use anyhow::Context;
use bevy::prelude::*;
use slime_simulation::run::JsonFileProgressStore;
use slime_simulation::{
    create_headless_app, log_info, step_simulation, verify_wiring, BodyRef, ColliderCategory, HudSnapshot,
    LevelLoadComplete, LevelLoadRequested, Lifecycle, Overlap, PlayerBody, PlayerInput, PoolKind, Progress,
    ProjectilePools, RunCommand, RunCompleted, SimulationConfig, SimulationPlugin,
};

const TICKS: u32 = 60 * 60 * 5;
const STEP: f32 = 1.0 / 60.0;
/// Радиус "коллайдера" для дистанционной детекции
const HIT_RADIUS: f32 = 1.0;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::from_json_file(&path).with_context(|| format!("loading config {}", path))?,
        None => SimulationConfig::default(),
    };

    println!("Starting Slimy Savior headless simulation (seed: {})", config.seed);

    let mut app = create_headless_app(config.seed);
    if let Some(path) = args.next() {
        app.insert_resource(Progress::new(JsonFileProgressStore::new(path)));
    }
    app.insert_resource(config).add_plugins(SimulationPlugin);

    verify_wiring(app.world()).context("simulation wiring")?;
    app.world_mut().send_event(RunCommand::NewGame);

    for tick in 0..TICKS {
        complete_pending_loads(&mut app);
        drive_player(&mut app, tick);
        detect_overlaps(&mut app);

        step_simulation(&mut app, STEP);

        if app
            .world_mut()
            .resource_mut::<Events<RunCompleted>>()
            .drain()
            .next()
            .is_some()
        {
            log_info(&format!("Run complete at tick {}", tick));
            break;
        }

        if tick % 300 == 0 {
            let hud = app.world().resource::<HudSnapshot>();
            println!(
                "Tick {}: level {:?}, enemies {}, spawners {}, shields {:?}, player hp {:?}",
                tick, hud.level, hud.live_enemies, hud.live_spawners, hud.shields_remaining, hud.player_health
            );
        }
    }

    println!("Simulation complete!");
    Ok(())
}

/// Хост сцен: загрузка завершается сразу
fn complete_pending_loads(app: &mut App) {
    let requests: Vec<LevelLoadRequested> = app
        .world_mut()
        .resource_mut::<Events<LevelLoadRequested>>()
        .drain()
        .collect();
    for request in requests {
        app.world_mut().send_event(LevelLoadComplete {
            level_id: request.level_id,
        });
    }
}

/// Хост ввода: смотреть на ближайшую цель, стрелять по очереди
fn drive_player(app: &mut App, tick: u32) {
    let world = app.world_mut();

    let Ok((player_position, defeated)) = world
        .query::<(&Transform, &PlayerBody)>()
        .single(world)
        .map(|(transform, body)| (transform.translation, !body.can_move))
    else {
        return;
    };
    if defeated {
        world.send_event(RunCommand::Respawn);
        return;
    }

    let target = world
        .query::<(&Transform, &ColliderCategory, &Lifecycle)>()
        .iter(world)
        .filter(|(_, category, lifecycle)| {
            lifecycle.is_alive()
                && matches!(
                    category,
                    ColliderCategory::Enemy | ColliderCategory::EnemyShield | ColliderCategory::EnemySpawner
                )
        })
        .map(|(transform, _, _)| transform.translation)
        .min_by(|a, b| {
            a.distance_squared(player_position)
                .total_cmp(&b.distance_squared(player_position))
        });

    let mut inputs = world.query::<&mut PlayerInput>();
    let Ok(mut input) = inputs.single_mut(world) else {
        return;
    };
    *input = PlayerInput::default();
    if let Some(target) = target {
        input.aim = target - player_position;
        input.fire_primary = tick % 20 == 0;
        input.fire_secondary = tick % 20 == 10;
    }
}

/// Хост физики: пересечения снарядов с телами по дистанции
fn detect_overlaps(app: &mut App) {
    let world = app.world_mut();

    let bodies: Vec<(Entity, Vec3)> = world
        .query::<(Entity, &Transform, &ColliderCategory)>()
        .iter(world)
        .map(|(entity, transform, _)| (entity, transform.translation))
        .collect();

    let mut overlaps = Vec::new();
    let pools = world.resource::<ProjectilePools>();
    for kind in [PoolKind::Primary, PoolKind::Secondary, PoolKind::Enemy] {
        for (handle, projectile) in pools.pool(kind).iter_active() {
            for (entity, position) in &bodies {
                if projectile.position.distance(*position) < HIT_RADIUS {
                    overlaps.push(Overlap::new(BodyRef::Projectile(kind, handle), BodyRef::Entity(*entity)));
                }
            }
        }
    }

    for overlap in overlaps {
        world.send_event(overlap);
    }
}
