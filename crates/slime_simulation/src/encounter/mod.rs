//! Encounter module - состав уровня и детекция зачистки
//!
//! - roster: живые враги и спавнеры текущего уровня
//! - spawner: периодический спавн миньонов
//! - detect_encounter_clear: один `EncounterCleared` на encounter

use bevy::prelude::*;

use crate::StepSet;

pub mod roster;
pub mod spawner;

pub use roster::EncounterRoster;
pub use spawner::{run_spawner, SpawnPoint, SpawnerController};

/// Событие: все враги и спавнеры уровня уничтожены
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterCleared {
    pub generation: u32,
}

/// System: polling после lifecycle обработки
pub fn detect_encounter_clear(mut roster: ResMut<EncounterRoster>, mut cleared: EventWriter<EncounterCleared>) {
    if roster.poll_cleared() {
        crate::logger::log_info("Encounter cleared");
        cleared.write(EncounterCleared {
            generation: roster.generation(),
        });
    }
}

pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EncounterRoster>()
            .init_resource::<SpawnerController>()
            .add_event::<EncounterCleared>()
            .add_systems(crate::SimulationStep, run_spawner.after(crate::enemy::flyer_fire).in_set(StepSet::Behavior))
            .add_systems(crate::SimulationStep, detect_encounter_clear.in_set(StepSet::Encounter));
    }
}
