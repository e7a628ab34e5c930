//! Integration тесты прохождения: новая игра, continue, сохранения,
//! победа, устаревшие ответы хоста, wiring

mod common;

use bevy::prelude::*;
use common::*;
use slime_simulation::run::{MemoryProgressStore, ProgressStore, PROGRESS_KEY};
use slime_simulation::{
    create_headless_app, verify_wiring, EncounterCleared, EnemyKind, HudSnapshot, LevelLoadComplete,
    LevelLoadRequested, MixerCommand, MixerGroup, PlayerBody, PlayerInput, Progress, ProjectilePools,
    RunCommand, RunCompleted, RunController, SimulationConfig, SimulationError, SimulationPlugin,
};

fn app_with_saved(index: i32) -> App {
    let mut store = MemoryProgressStore::default();
    store.save(PROGRESS_KEY, index).expect("memory save");

    let config = SimulationConfig::default();
    let mut app = create_headless_app(config.seed);
    app.insert_resource(Progress::new(store))
        .insert_resource(config)
        .add_plugins(SimulationPlugin);
    app
}

fn saved_index(app: &App) -> Option<i32> {
    app.world()
        .resource::<Progress>()
        .store()
        .load(PROGRESS_KEY)
        .expect("memory load")
}

fn requested_levels(app: &mut App) -> Vec<String> {
    drain::<LevelLoadRequested>(app)
        .into_iter()
        .map(|request| request.level_id)
        .collect()
}

#[test]
fn test_new_game_loads_first_level_and_clears_save() {
    let mut app = app_with_saved(2);
    assert!(app.world().resource::<RunController>().has_save());

    app.world_mut().send_event(RunCommand::NewGame);
    step(&mut app);

    assert_eq!(requested_levels(&mut app), vec!["Level1".to_string()]);
    assert_eq!(saved_index(&app), None);
    assert!(!app.world().resource::<RunController>().has_save());
}

#[test]
fn test_continue_loads_saved_level() {
    let mut app = app_with_saved(1);

    app.world_mut().send_event(RunCommand::Continue);
    step(&mut app);

    assert_eq!(requested_levels(&mut app), vec!["Level2".to_string()]);
}

#[test]
fn test_out_of_range_save_resets_to_first_level() {
    let mut app = app_with_saved(3);
    let run = app.world().resource::<RunController>();
    assert_eq!(run.current_index(), 0);
    assert!(!run.has_save());

    app.world_mut().send_event(RunCommand::Continue);
    step(&mut app);
    assert_eq!(requested_levels(&mut app), vec!["Level1".to_string()]);
}

#[test]
fn test_advance_persists_progress() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 0);

    app.world_mut().send_event(RunCommand::Advance);
    step(&mut app);

    assert_eq!(requested_levels(&mut app), vec!["Level2".to_string()]);
    assert_eq!(saved_index(&app), Some(1));
    assert_eq!(app.world().resource::<RunController>().current_index(), 1);
}

#[test]
fn test_advance_past_last_level_is_victory() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 2);
    drain::<RunCompleted>(&mut app);

    app.world_mut().send_event(RunCommand::Advance);
    step(&mut app);

    assert_eq!(drain::<RunCompleted>(&mut app).len(), 1);
    assert!(requested_levels(&mut app).is_empty());
    assert_eq!(saved_index(&app), None);

    let player = player(&mut app);
    assert!(!app.world().get::<PlayerBody>(player).expect("player").can_move);
    assert!(app.world().resource::<HudSnapshot>().run_complete);
}

#[test]
fn test_invalid_level_index_is_rejected() {
    let mut app = sim_app(SimulationConfig::default());

    app.world_mut().send_event(RunCommand::Load(7));
    step(&mut app);

    assert!(requested_levels(&mut app).is_empty());
    assert!(app.world().resource::<RunController>().gameplay_active());
}

#[test]
fn test_restart_reloads_current_level() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 1);

    app.world_mut().send_event(RunCommand::RestartCurrent);
    step(&mut app);

    assert_eq!(requested_levels(&mut app), vec!["Level2".to_string()]);
    assert_eq!(app.world().resource::<RunController>().current_index(), 1);
}

#[test]
fn test_stale_load_completion_ignored() {
    let mut app = sim_app(SimulationConfig::default());

    app.world_mut().send_event(RunCommand::Load(0));
    step(&mut app);
    app.world_mut().send_event(RunCommand::Load(1));
    step(&mut app);
    drain::<LevelLoadRequested>(&mut app);

    // Хост отвечает на старый запрос - игнорируется
    app.world_mut().send_event(LevelLoadComplete {
        level_id: "Level1".into(),
    });
    step(&mut app);
    assert_eq!(app.world().resource::<RunController>().loading(), Some("Level2"));
    assert!(entities_with::<PlayerBody>(&mut app).is_empty());

    app.world_mut().send_event(LevelLoadComplete {
        level_id: "Level2".into(),
    });
    step(&mut app);
    assert!(app.world().resource::<RunController>().gameplay_active());
    assert_eq!(entities_with::<PlayerBody>(&mut app).len(), 1);
    assert_eq!(
        app.world().resource::<HudSnapshot>().level.as_deref(),
        Some("Level2")
    );
}

#[test]
fn test_reload_replaces_level_entities() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 1);
    let first = enemies_of(&mut app, EnemyKind::Flyer);

    app.world_mut().send_event(RunCommand::RestartCurrent);
    step(&mut app);
    complete_loads(&mut app);
    step(&mut app);

    let second = enemies_of(&mut app, EnemyKind::Flyer);
    assert_eq!(second.len(), 3);
    assert!(first.iter().all(|flyer| app.world().get_entity(*flyer).is_err()));
    assert_eq!(entities_with::<PlayerBody>(&mut app).len(), 1);
}

#[test]
fn test_verify_wiring() {
    let app = sim_app(SimulationConfig::default());
    assert!(verify_wiring(app.world()).is_ok());

    let bare = create_headless_app(1);
    assert!(matches!(
        verify_wiring(bare.world()),
        Err(SimulationError::MissingReference("SimulationConfig"))
    ));
}

#[test]
fn test_config_from_json() {
    let config = SimulationConfig::from_json_str(
        r#"{
            "seed": 9,
            "levels": [
                { "id": "Solo", "minions": [[0.0, 0.0, 4.0]] }
            ]
        }"#,
    )
    .expect("valid config");

    let mut app = sim_app(config);
    load_level(&mut app, 0);

    assert_eq!(app.world().resource::<RunController>().current_level(), Some("Solo"));
    assert_eq!(enemies_of(&mut app, EnemyKind::Minion).len(), 1);
}

fn translations(app: &mut App, kind: EnemyKind) -> Vec<Vec3> {
    enemies_of(app, kind)
        .into_iter()
        .map(|entity| app.world().get::<Transform>(entity).expect("transform").translation)
        .collect()
}

fn gameplay_mixer(app: &mut App) -> Vec<bool> {
    drain::<MixerCommand>(app)
        .into_iter()
        .filter(|command| command.group == MixerGroup::Gameplay)
        .map(|command| command.muted)
        .collect()
}

#[test]
fn test_pause_freezes_gameplay() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 0);
    let player = player(&mut app);
    drain::<MixerCommand>(&mut app);

    app.world_mut().send_event(RunCommand::Pause(true));
    step(&mut app);

    assert_eq!(gameplay_mixer(&mut app), vec![true]);
    assert!(!app.world().get::<PlayerBody>(player).expect("player").can_move);
    assert!(app.world().resource::<HudSnapshot>().paused);
    assert!(!app.world().resource::<RunController>().gameplay_active());

    let minions = translations(&mut app, EnemyKind::Minion);
    let start = app.world().get::<Transform>(player).expect("transform").translation;
    app.world_mut().get_mut::<PlayerInput>(player).expect("input").forward = 1.0;
    step_n(&mut app, 30);

    assert_eq!(translations(&mut app, EnemyKind::Minion), minions);
    assert_eq!(app.world().get::<Transform>(player).expect("transform").translation, start);

    app.world_mut().send_event(RunCommand::Pause(false));
    step(&mut app);
    assert_eq!(gameplay_mixer(&mut app), vec![false]);
    assert!(app.world().get::<PlayerBody>(player).expect("player").can_move);

    step_n(&mut app, 10);
    assert_ne!(translations(&mut app, EnemyKind::Minion), minions);
    assert_ne!(app.world().get::<Transform>(player).expect("transform").translation, start);
}

#[test]
fn test_pause_rejected_while_loading() {
    let mut app = sim_app(SimulationConfig::default());

    app.world_mut().send_event(RunCommand::Load(0));
    step(&mut app);
    app.world_mut().send_event(RunCommand::Pause(true));
    step(&mut app);

    assert!(!app.world().resource::<RunController>().is_paused());
    assert!(gameplay_mixer(&mut app).is_empty());
}

#[test]
fn test_load_closes_pause() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 0);

    app.world_mut().send_event(RunCommand::Pause(true));
    step(&mut app);
    drain::<MixerCommand>(&mut app);

    app.world_mut().send_event(RunCommand::RestartCurrent);
    step(&mut app);

    assert!(!app.world().resource::<RunController>().is_paused());
    assert_eq!(gameplay_mixer(&mut app), vec![false]);
    assert_eq!(requested_levels(&mut app), vec!["Level1".to_string()]);
}

#[test]
fn test_main_menu_resets_player_and_keeps_save() {
    let mut app = sim_app(SimulationConfig::default());
    load_level(&mut app, 0);
    app.world_mut().send_event(RunCommand::Advance);
    step(&mut app);
    complete_loads(&mut app);
    step(&mut app);
    assert_eq!(enemies_of(&mut app, EnemyKind::Flyer).len(), 3);

    let player = player(&mut app);
    app.world_mut().get_mut::<PlayerInput>(player).expect("input").fire_primary = true;
    step(&mut app);
    assert_eq!(app.world().resource::<ProjectilePools>().primary.active_count(), 1);

    app.world_mut().send_event(RunCommand::MainMenu);
    step(&mut app);
    assert_eq!(app.world().resource::<ProjectilePools>().primary.active_count(), 0);
    assert_eq!(complete_loads(&mut app), vec!["MainMenu".to_string()]);
    step(&mut app);

    let hud = app.world().resource::<HudSnapshot>().clone();
    assert!(hud.main_menu);
    assert_eq!(hud.level.as_deref(), Some("MainMenu"));
    assert_eq!(hud.live_enemies, 0);
    assert!(enemies_of(&mut app, EnemyKind::Flyer).is_empty());
    assert!(!app.world().get::<PlayerBody>(player).expect("player").can_move);

    // Меню - не encounter: зачистки нет, пауза недоступна
    step_n(&mut app, 10);
    assert!(drain::<EncounterCleared>(&mut app).is_empty());
    app.world_mut().send_event(RunCommand::Pause(true));
    step(&mut app);
    assert!(!app.world().resource::<HudSnapshot>().paused);

    // Сохранение и индекс на месте - Continue продолжает со второго уровня
    assert_eq!(saved_index(&app), Some(1));
    app.world_mut().send_event(RunCommand::Continue);
    step(&mut app);
    assert_eq!(requested_levels(&mut app), vec!["Level2".to_string()]);
    complete_loads(&mut app);
    step(&mut app);
    assert!(app.world().get::<PlayerBody>(player).expect("player").can_move);
}
