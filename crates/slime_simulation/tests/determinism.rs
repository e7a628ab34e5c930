//! Тесты детерминизма
//!
//! Одинаковый seed + одинаковый ввод хоста → идентичный мир

mod common;

use bevy::prelude::*;
use common::*;
use slime_simulation::{world_snapshot, EnemyKind, Health, PlayerInput, PoolKind, SimulationConfig};

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 600;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 300;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

/// Level1 (спавнеры выбирают точки через RNG) со скриптованным вводом и попаданиями
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<u8>) {
    let config = SimulationConfig {
        seed,
        ..Default::default()
    };
    let mut app = sim_app(config);
    load_level(&mut app, 0);
    let player = player(&mut app);

    for tick in 0..tick_count {
        {
            let mut input = app.world_mut().get_mut::<PlayerInput>(player).expect("input");
            input.aim = Vec3::new((tick as f32 * 0.05).sin(), 0.0, 1.0);
            input.forward = if tick % 120 < 60 { 1.0 } else { -1.0 };
            input.fire_primary = tick % 15 == 0;
            input.fire_secondary = tick % 15 == 7;
        }

        if tick % 90 == 45 {
            if let Some(minion) = enemies_of(&mut app, EnemyKind::Minion).first().copied() {
                hit_with(&mut app, PoolKind::Primary, minion);
            }
        }

        step(&mut app);
    }

    let world = app.world_mut();
    (world_snapshot::<Transform>(world), world_snapshot::<Health>(world))
}
