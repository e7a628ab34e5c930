//! Общие helpers для integration тестов (headless app, фейковый хост)

#![allow(dead_code)]

use bevy::prelude::*;
use slime_simulation::{
    create_simulation_app, step_simulation, BodyRef, Enemy, EnemyKind, LevelLoadComplete, LevelLoadRequested,
    Overlap, PlayerBody, PoolKind, ProjectilePools, RunCommand, SimulationConfig,
};

pub const STEP: f32 = 1.0 / 60.0;

pub fn sim_app(config: SimulationConfig) -> App {
    create_simulation_app(config)
}

pub fn step(app: &mut App) {
    step_simulation(app, STEP);
}

pub fn step_n(app: &mut App, steps: usize) {
    for _ in 0..steps {
        step(app);
    }
}

pub fn step_seconds(app: &mut App, seconds: f32) {
    step_n(app, (seconds / STEP).ceil() as usize);
}

/// Забрать все накопленные события типа E
pub fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

/// Хост сцен: ответить на все запросы загрузки
pub fn complete_loads(app: &mut App) -> Vec<String> {
    let requested: Vec<String> = drain::<LevelLoadRequested>(app)
        .into_iter()
        .map(|request| request.level_id)
        .collect();
    for level_id in &requested {
        app.world_mut().send_event(LevelLoadComplete {
            level_id: level_id.clone(),
        });
    }
    requested
}

/// Загрузить уровень по индексу и дождаться спавна
pub fn load_level(app: &mut App, index: usize) {
    app.world_mut().send_event(RunCommand::Load(index));
    step(app);
    let requested = complete_loads(app);
    assert_eq!(requested.len(), 1, "expected one load request");
    // LevelLoadComplete обрабатывается в Encounter фазе, спавн применяется в конце шага
    step(app);
}

pub fn enemies_of(app: &mut App, kind: EnemyKind) -> Vec<Entity> {
    let world = app.world_mut();
    let mut query = world.query::<(Entity, &Enemy)>();
    let mut found: Vec<Entity> = query
        .iter(world)
        .filter(|(_, enemy)| enemy.kind == kind)
        .map(|(entity, _)| entity)
        .collect();
    found.sort_by_key(|entity| entity.index());
    found
}

pub fn entities_with<C: Component>(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<C>>();
    let mut found: Vec<Entity> = query.iter(world).collect();
    found.sort_by_key(|entity| entity.index());
    found
}

pub fn player(app: &mut App) -> Entity {
    entities_with::<PlayerBody>(app)
        .first()
        .copied()
        .expect("player spawned on level load")
}

/// Хост физики: выпустить снаряд и сообщить о его пересечении с целью
pub fn hit_with(app: &mut App, kind: PoolKind, target: Entity) {
    let handle = app
        .world_mut()
        .resource_mut::<ProjectilePools>()
        .pool_mut(kind)
        .fire(Vec3::new(0.0, 100.0, 0.0), Vec3::Y, slime_simulation::projectile::LaunchParams {
            speed: 0.0,
            ttl: 10.0,
            motion: slime_simulation::projectile::Motion::Straight,
        });
    app.world_mut()
        .send_event(Overlap::new(BodyRef::Projectile(kind, handle), BodyRef::Entity(target)));
}

/// Несколько попаданий в одном шаге
pub fn hit_times(app: &mut App, kind: PoolKind, target: Entity, times: usize) {
    for _ in 0..times {
        hit_with(app, kind, target);
    }
}
