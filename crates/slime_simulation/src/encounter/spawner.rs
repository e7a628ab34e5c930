//! Spawner controller - периодический спавн миньонов из живых точек

use bevy::prelude::*;
use rand::Rng;

use crate::components::{ColliderCategory, EncounterEntity, EnemyKind, Health, Lifecycle};
use crate::config::SimulationConfig;
use crate::encounter::EncounterRoster;
use crate::{DeterministicRng, StepTime};

/// Точка спавна (разрушается вторичным плевком)
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Health, Lifecycle, EncounterEntity, Transform, ColliderCategory = ColliderCategory::EnemySpawner)]
pub struct SpawnPoint;

#[derive(Resource, Debug, Clone)]
pub struct SpawnerController {
    points: Vec<Entity>,
    cooldown: f32,
    spawn_interval: f32,
    max_minions: usize,
    /// Навсегда остановлен (точек не осталось) или не вооружён (нет encounter)
    stopped: bool,
}

impl Default for SpawnerController {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            cooldown: 0.0,
            spawn_interval: 0.0,
            max_minions: 0,
            stopped: true,
        }
    }
}

impl SpawnerController {
    /// Вооружить для нового encounter. Первый спавн - сразу.
    pub fn arm(&mut self, points: Vec<Entity>, spawn_interval: f32, max_minions: usize) {
        self.stopped = points.is_empty();
        self.points = points;
        self.cooldown = 0.0;
        self.spawn_interval = spawn_interval;
        self.max_minions = max_minions;
    }

    pub fn disarm(&mut self) {
        self.points.clear();
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn points(&self) -> &[Entity] {
        &self.points
    }

    /// Idempotent
    pub fn remove_point(&mut self, point: Entity) -> bool {
        let before = self.points.len();
        self.points.retain(|p| *p != point);
        self.points.len() != before
    }

    /// Шаг таймера. Возвращает точку для спавна, если пора.
    pub fn tick(&mut self, delta: f32, live_minions: usize, rng: &mut impl Rng) -> Option<Entity> {
        if self.stopped {
            return None;
        }
        if self.points.is_empty() {
            self.stopped = true;
            crate::logger::log("No spawn points left, spawning stopped");
            return None;
        }

        self.cooldown = (self.cooldown - delta).max(0.0);
        if self.cooldown > 0.0 || live_minions >= self.max_minions {
            return None;
        }

        let point = self.points[rng.gen_range(0..self.points.len())];
        self.cooldown = self.spawn_interval;
        Some(point)
    }
}

/// System: спавн миньонов
pub fn run_spawner(
    mut commands: Commands,
    mut controller: ResMut<SpawnerController>,
    mut roster: ResMut<EncounterRoster>,
    mut rng: ResMut<DeterministicRng>,
    points: Query<&Transform, With<SpawnPoint>>,
    config: Res<SimulationConfig>,
    time: Res<StepTime>,
) {
    let live_minions = roster.live_count_of(EnemyKind::Minion);
    let Some(point) = controller.tick(time.delta, live_minions, &mut rng.rng) else {
        return;
    };

    let Ok(transform) = points.get(point) else {
        // Точка исчезла без удаления из контроллера
        controller.remove_point(point);
        crate::logger::log_warning(&format!("Spawn point {:?} missing, dropped", point));
        return;
    };

    let minion = crate::enemy::spawn_minion(&mut commands, &config, &mut rng.rng, transform.translation);
    roster.register_enemy(minion, EnemyKind::Minion);
    crate::logger::log(&format!("Minion {:?} spawned at {:?}", minion, point));
}
