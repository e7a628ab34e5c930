//! Slimy Savior Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16: правила боя, враги, пулы снарядов,
//! encounter tracking и прохождение уровней.
//!
//! Разделение ответственности:
//! - ECS = game state, combat rules, AI, level flow
//! - Хост (движок) = physics overlaps, рендер, аудио, загрузка сцен, UI
//!
//! Хост общается с симуляцией только через события и ресурсы:
//! `Overlap`, `PlayerInput`, `RunCommand`, `LevelLoadComplete` → ECS,
//! `AudioCue`, `AudioStop`, `MixerCommand`, `LevelLoadRequested`, `HudSnapshot` ← ECS.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod audio;
pub mod combat;
pub mod components;
pub mod config;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod hud;
pub mod logger;
pub mod player;
pub mod projectile;
pub mod run;

pub use audio::{AudioCue, AudioPlugin, AudioStop, ClipId, LoopSource, MixerCommand, MixerGroup};
pub use combat::{CombatPlugin, DamageDealt, DamageOutcome, EntityDied, ShieldBarrier};
pub use components::*;
pub use config::SimulationConfig;
pub use encounter::{EncounterCleared, EncounterPlugin, EncounterRoster, SpawnerController};
pub use enemy::EnemyPlugin;
pub use error::{SimResult, SimulationError};
pub use hud::{HudPlugin, HudSnapshot};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use player::{PlayerBody, PlayerDefeated, PlayerInput, PlayerPlugin};
pub use projectile::{PoolKind, ProjectileHandle, ProjectilePlugin, ProjectilePools};
pub use run::{
    LevelLoadComplete, LevelLoadRequested, Progress, RunCommand, RunCompleted, RunController, RunPlugin,
};

/// Один шаг симуляции (запускается из FixedUpdate или вручную в тестах)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationStep;

/// Фазы шага, строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepSet {
    Input,
    Movement,
    Collision,
    Behavior,
    Lifecycle,
    /// Clear detection, переходы уровней, HUD (работает и во время загрузки)
    Encounter,
}

/// Время текущего шага (countdown таймеры читают только его)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StepTime {
    pub delta: f32,
    pub elapsed: f32,
    pub tick: u64,
}

impl StepTime {
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta;
        self.elapsed += delta;
        self.tick += 1;
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `SimulationConfig`, `Progress` и `DeterministicRng`, вставленные до плагина,
/// используются как есть; иначе берутся значения по умолчанию.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>();

        let seed = app.world().resource::<SimulationConfig>().seed;
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(seed));
        }

        app.init_schedule(SimulationStep)
            .init_resource::<StepTime>()
            .configure_sets(
                SimulationStep,
                (
                    StepSet::Input,
                    StepSet::Movement,
                    StepSet::Collision,
                    StepSet::Behavior,
                    StepSet::Lifecycle,
                    StepSet::Encounter,
                )
                    .chain(),
            );

        // Во время загрузки уровня и паузы геймплей заморожен
        for set in [
            StepSet::Input,
            StepSet::Movement,
            StepSet::Collision,
            StepSet::Behavior,
            StepSet::Lifecycle,
        ] {
            app.configure_sets(SimulationStep, set.run_if(run::gameplay_active));
        }

        app.add_plugins((
            ProjectilePlugin,
            AudioPlugin,
            CombatPlugin,
            EncounterPlugin,
            EnemyPlugin,
            PlayerPlugin,
            RunPlugin,
            HudPlugin,
        ))
        // Fixed timestep 60Hz
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_systems(FixedUpdate, run_simulation_step);
    }
}

/// Exclusive system: Time<Fixed> → StepTime → SimulationStep
pub fn run_simulation_step(world: &mut World) {
    let delta = world
        .get_resource::<Time<Fixed>>()
        .map(|time| time.delta_secs())
        .unwrap_or_default();
    world.resource_mut::<StepTime>().advance(delta);
    world.run_schedule(SimulationStep);
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

/// Создаёт minimal Bevy App для headless симуляции (без SimulationPlugin)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Headless app с полной симуляцией и заданным конфигом
pub fn create_simulation_app(config: SimulationConfig) -> App {
    let mut app = create_headless_app(config.seed);
    app.insert_resource(config).add_plugins(SimulationPlugin);
    app
}

/// Прогнать один шаг с фиксированным dt (детерминированно, без реального времени)
///
/// После шага буферы событий ротируются (как `First` в `app.update()`):
/// событие живёт два шага, хосту нужно читать их после каждого шага.
pub fn step_simulation(app: &mut App, delta: f32) {
    let world = app.world_mut();
    world.resource_mut::<StepTime>().advance(delta);
    world.run_schedule(SimulationStep);
    rotate_events(world);
}

/// Events<E>::update для всех зарегистрированных событий
pub fn rotate_events(world: &mut World) {
    if let Err(err) = world.run_system_cached(bevy::ecs::event::event_update_system) {
        logger::log_error(&format!("Event update failed: {}", err));
    }
}

/// Проверка, что все обязательные ресурсы на месте (до первого шага)
pub fn verify_wiring(world: &World) -> SimResult<()> {
    fn require<R: Resource>(world: &World, name: &'static str) -> SimResult<()> {
        if world.contains_resource::<R>() {
            Ok(())
        } else {
            Err(SimulationError::MissingReference(name))
        }
    }

    require::<SimulationConfig>(world, "SimulationConfig")?;
    require::<StepTime>(world, "StepTime")?;
    require::<DeterministicRng>(world, "DeterministicRng")?;
    require::<ProjectilePools>(world, "ProjectilePools")?;
    require::<EncounterRoster>(world, "EncounterRoster")?;
    require::<SpawnerController>(world, "SpawnerController")?;
    require::<RunController>(world, "RunController")?;
    require::<Progress>(world, "Progress")?;
    require::<HudSnapshot>(world, "HudSnapshot")?;
    require::<Events<Overlap>>(world, "Events<Overlap>")?;

    world.resource::<SimulationConfig>().validate()?;
    if !world.resource::<Schedules>().contains(SimulationStep) {
        return Err(SimulationError::MissingReference("SimulationStep schedule"));
    }
    Ok(())
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
