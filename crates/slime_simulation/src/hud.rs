//! HUD snapshot - плоские данные для UI хоста, обновляются каждый шаг

use bevy::prelude::*;

use crate::combat::ShieldBarrier;
use crate::components::{Health, Lifecycle};
use crate::encounter::EncounterRoster;
use crate::player::PlayerBody;
use crate::run::RunController;
use crate::StepSet;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub level: Option<String>,
    pub loading: bool,
    pub paused: bool,
    pub main_menu: bool,
    pub run_complete: bool,
    pub live_enemies: usize,
    pub live_spawners: usize,
    /// None если на уровне нет босса
    pub shields_remaining: Option<usize>,
    pub boss_health: Option<f32>,
    pub player_health: Option<f32>,
    pub player_can_move: bool,
    pub player_moving: bool,
}

/// System: пересобрать snapshot (последняя система шага)
pub fn refresh_hud(
    mut hud: ResMut<HudSnapshot>,
    roster: Res<EncounterRoster>,
    run: Res<RunController>,
    bosses: Query<(&Health, &Lifecycle, &ShieldBarrier)>,
    players: Query<(&Health, &PlayerBody)>,
) {
    let boss = bosses.iter().find(|(_, lifecycle, _)| **lifecycle != Lifecycle::Removed);
    let player = players.iter().next();

    *hud = HudSnapshot {
        level: run.current_level().map(str::to_owned),
        loading: run.loading().is_some(),
        paused: run.is_paused(),
        main_menu: run.on_main_menu(),
        run_complete: run.is_complete(),
        live_enemies: roster.live_enemy_count(),
        live_spawners: roster.live_spawner_count(),
        shields_remaining: boss.map(|(_, _, barrier)| barrier.remaining_count()),
        boss_health: boss.map(|(health, _, _)| health.fraction()),
        player_health: player.map(|(health, _)| health.fraction()),
        player_can_move: player.is_some_and(|(_, body)| body.can_move),
        player_moving: player.is_some_and(|(_, body)| body.is_moving()),
    };
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudSnapshot>().add_systems(
            crate::SimulationStep,
            refresh_hud
                .after(crate::run::complete_level_loads)
                .in_set(StepSet::Encounter),
        );
    }
}
