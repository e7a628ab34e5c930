//! Run module - прохождение уровней
//!
//! Загрузка двухфазная:
//! 1. `LevelLoadRequested` → хост грузит сцену (геймплей заморожен)
//! 2. `LevelLoadComplete` → сброс пулов, despawn старого уровня, спавн нового
//!
//! Хост управляет прохождением через `RunCommand` (меню, пауза, game over экран).

use bevy::prelude::*;

use crate::audio::{AudioStop, LoopSource, MixerCommand, MixerGroup};
use crate::components::{EncounterEntity, Facing, Health};
use crate::config::{vec3, SimulationConfig};
use crate::encounter::{detect_encounter_clear, EncounterCleared, EncounterRoster, SpawnerController};
use crate::player::{spawn_player, PlayerBody, PlayerInput};
use crate::projectile::ProjectilePools;
use crate::{DeterministicRng, StepSet};

pub mod controller;
pub mod level;
pub mod persistence;

pub use controller::{RunController, RunTransition};
pub use level::{spawn_level, LevelSpawn};
pub use persistence::{JsonFileProgressStore, MemoryProgressStore, Progress, ProgressStore, PROGRESS_KEY};

/// Команды хоста (UI кнопки)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    NewGame,
    Continue,
    Advance,
    RestartCurrent,
    Load(usize),
    /// "Play again" после поражения
    Respawn,
    /// Выход в меню: сброс игрока и пулов, загрузка сцены меню
    MainMenu,
    /// true = пауза (геймплей заморожен, paused snapshot микшера)
    Pause(bool),
}

/// Event: ECS → scene host
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelLoadRequested {
    pub level_id: String,
}

/// Event: scene host → ECS
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelLoadComplete {
    pub level_id: String,
}

/// Event: все уровни пройдены
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCompleted;

/// Run condition для геймплейных фаз шага
pub fn gameplay_active(run: Option<Res<RunController>>) -> bool {
    run.is_none_or(|run| run.gameplay_active())
}

/// Сброс игрока (respawn, меню, новый уровень). След слизи глушится.
fn reset_player(body: &mut PlayerBody, health: &mut Health, stops: &mut EventWriter<AudioStop>) {
    if body.is_moving() {
        stops.write(AudioStop {
            source: LoopSource::PlayerTrail,
        });
    }
    body.revive(health);
}

fn unmute(mixer: &mut EventWriter<MixerCommand>, group: MixerGroup) {
    mixer.write(MixerCommand { group, muted: false });
}

/// System: команды хоста + зачистка уровня → переходы
#[allow(clippy::too_many_arguments)]
pub fn handle_run_commands(
    mut commands_in: EventReader<RunCommand>,
    mut cleared: EventReader<EncounterCleared>,
    mut run: ResMut<RunController>,
    mut progress: ResMut<Progress>,
    mut roster: ResMut<EncounterRoster>,
    mut spawner: ResMut<SpawnerController>,
    mut pools: ResMut<ProjectilePools>,
    mut players: Query<(&mut PlayerBody, &mut Health)>,
    mut mixer: EventWriter<MixerCommand>,
    mut stops: EventWriter<AudioStop>,
    mut load_requests: EventWriter<LevelLoadRequested>,
    mut completed: EventWriter<RunCompleted>,
) {
    let mut transitions = Vec::new();

    for _ in cleared.read() {
        transitions.push(run.advance(progress.store_mut()));
    }

    for command in commands_in.read() {
        let result = match command {
            RunCommand::NewGame => run.start_new_game(progress.store_mut()),
            RunCommand::Continue => run.continue_game(),
            RunCommand::Advance => Ok(run.advance(progress.store_mut())),
            RunCommand::RestartCurrent => run.restart_current(),
            RunCommand::Load(index) => run.load(*index),
            RunCommand::Respawn => {
                for (mut body, mut health) in players.iter_mut() {
                    reset_player(&mut body, &mut health, &mut stops);
                }
                pools.reset_all();
                unmute(&mut mixer, MixerGroup::Enemies);
                run.restart_current()
            }
            RunCommand::MainMenu => {
                for (mut body, mut health) in players.iter_mut() {
                    reset_player(&mut body, &mut health, &mut stops);
                }
                pools.reset_all();
                unmute(&mut mixer, MixerGroup::Enemies);
                Ok(run.return_to_main_menu())
            }
            RunCommand::Pause(paused) => {
                if run.set_paused(*paused) {
                    // Повергнутый игрок остаётся неподвижным и после снятия паузы
                    for (mut body, health) in players.iter_mut() {
                        if health.is_alive() {
                            body.can_move = !*paused;
                        }
                    }
                    mixer.write(MixerCommand {
                        group: MixerGroup::Gameplay,
                        muted: *paused,
                    });
                    crate::logger::log_info(if *paused { "Paused" } else { "Resumed" });
                } else {
                    crate::logger::log(&format!("{:?} ignored (paused: {})", command, run.is_paused()));
                }
                continue;
            }
        };

        match result {
            Ok(transition) => transitions.push(transition),
            Err(err) => crate::logger::log_error(&format!("{:?} rejected: {}", command, err)),
        }
    }

    for transition in transitions {
        // Загрузка и победа закрывают меню паузы
        if run.set_paused(false) {
            unmute(&mut mixer, MixerGroup::Gameplay);
        }
        match transition {
            RunTransition::Load(level_id) => {
                crate::logger::log_info(&format!("Loading level '{}'", level_id));
                run.begin_load(&level_id);
                roster.end();
                spawner.disarm();
                load_requests.write(LevelLoadRequested { level_id });
            }
            RunTransition::Victory => {
                for (mut body, _) in players.iter_mut() {
                    body.can_move = false;
                }
                completed.write(RunCompleted);
            }
        }
    }
}

/// System: хост загрузил сцену → собрать уровень
#[allow(clippy::too_many_arguments)]
pub fn complete_level_loads(
    mut commands: Commands,
    mut completions: EventReader<LevelLoadComplete>,
    mut run: ResMut<RunController>,
    mut roster: ResMut<EncounterRoster>,
    mut spawner: ResMut<SpawnerController>,
    mut pools: ResMut<ProjectilePools>,
    mut rng: ResMut<DeterministicRng>,
    mut players: Query<(&mut PlayerBody, &mut Health, &mut Transform, &mut Facing, &mut PlayerInput)>,
    mut stops: EventWriter<AudioStop>,
    stale: Query<Entity, With<EncounterEntity>>,
    config: Res<SimulationConfig>,
) {
    for completion in completions.read() {
        if !run.finish_load(&completion.level_id) {
            crate::logger::log_warning(&format!("Unexpected load completion '{}' ignored", completion.level_id));
            continue;
        }

        for entity in stale.iter() {
            commands.entity(entity).despawn();
        }
        pools.reset_all();

        // Меню: без encounter, игрок сброшен и неподвижен
        if run.on_main_menu() {
            roster.end();
            spawner.disarm();
            for (mut body, mut health, _, mut facing, mut input) in players.iter_mut() {
                reset_player(&mut body, &mut health, &mut stops);
                body.can_move = false;
                *facing = Facing::default();
                *input = PlayerInput::default();
            }
            continue;
        }

        let Some(level) = config.level(&completion.level_id) else {
            crate::logger::log_error(&format!("Level '{}' has no layout", completion.level_id));
            roster.end();
            spawner.disarm();
            continue;
        };

        let start = vec3(level.player_start);
        match players.single_mut() {
            Ok((mut body, mut health, mut transform, mut facing, mut input)) => {
                reset_player(&mut body, &mut health, &mut stops);
                transform.translation = start;
                *facing = Facing::default();
                *input = PlayerInput::default();
            }
            Err(_) => {
                spawn_player(&mut commands, &config, start);
            }
        }

        let spawn = spawn_level(&mut commands, &config, &mut rng.rng, level);
        if spawn.is_hostile() {
            roster.begin();
            for (entity, kind) in &spawn.enemies {
                roster.register_enemy(*entity, *kind);
            }
            for point in &spawn.spawn_points {
                roster.register_spawner(*point);
            }
            spawner.arm(spawn.spawn_points, config.spawner.spawn_interval, config.spawner.max_minions);
        } else {
            roster.end();
            spawner.disarm();
        }
    }
}

pub struct RunPlugin;

impl Plugin for RunPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Progress>() {
            app.insert_resource(Progress::in_memory());
        }

        let levels = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| config.levels.iter().map(|level| level.id.clone()).collect())
            .unwrap_or_default();
        let main_menu = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| config.main_menu.clone())
            .unwrap_or_else(|| controller::DEFAULT_MAIN_MENU.to_owned());
        let mut run = RunController::new(levels).with_main_menu(main_menu);
        if let Some(progress) = app.world().get_resource::<Progress>() {
            if let Err(err) = run.load_saved_progress(progress.store()) {
                crate::logger::log_error(&format!("Failed to read saved progress: {}", err));
            }
        }

        app.insert_resource(run)
            .add_event::<RunCommand>()
            .add_event::<LevelLoadRequested>()
            .add_event::<LevelLoadComplete>()
            .add_event::<RunCompleted>()
            .add_systems(
                crate::SimulationStep,
                (handle_run_commands, complete_level_loads)
                    .chain()
                    .after(detect_encounter_clear)
                    .in_set(StepSet::Encounter),
            );
    }
}
