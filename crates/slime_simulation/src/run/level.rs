//! Level layout spawning (после `LevelLoadComplete`)

use bevy::prelude::*;
use rand::Rng;

use crate::components::EnemyKind;
use crate::config::{vec3, LevelDefinition, SimulationConfig};
use crate::encounter::SpawnPoint;
use crate::enemy::{spawn_boss, spawn_flyer, spawn_minion};

/// Что заспавнено (для регистрации в roster и spawner controller)
#[derive(Debug, Clone, Default)]
pub struct LevelSpawn {
    pub enemies: Vec<(Entity, EnemyKind)>,
    pub spawn_points: Vec<Entity>,
}

impl LevelSpawn {
    /// Уровень без врагов и спавнеров - не encounter (меню, хаб)
    pub fn is_hostile(&self) -> bool {
        !self.enemies.is_empty() || !self.spawn_points.is_empty()
    }
}

pub fn spawn_level(
    commands: &mut Commands,
    config: &SimulationConfig,
    rng: &mut impl Rng,
    level: &LevelDefinition,
) -> LevelSpawn {
    let mut spawn = LevelSpawn::default();

    if let Some(layout) = &level.boss {
        let (boss, _shields) = spawn_boss(commands, config, rng, layout);
        spawn.enemies.push((boss, EnemyKind::Boss));
    }
    for position in &level.flyers {
        let flyer = spawn_flyer(commands, config, rng, vec3(*position));
        spawn.enemies.push((flyer, EnemyKind::Flyer));
    }
    for position in &level.minions {
        let minion = spawn_minion(commands, config, rng, vec3(*position));
        spawn.enemies.push((minion, EnemyKind::Minion));
    }
    for position in &level.spawners {
        let point = commands
            .spawn((
                SpawnPoint,
                crate::components::Health::new(config.spawner.lives),
                Transform::from_translation(vec3(*position)),
            ))
            .id();
        spawn.spawn_points.push(point);
    }

    crate::logger::log_info(&format!(
        "Level '{}' spawned: {} enemies, {} spawn points",
        level.id,
        spawn.enemies.len(),
        spawn.spawn_points.len()
    ));
    spawn
}
