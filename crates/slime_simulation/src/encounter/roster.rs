//! Encounter roster - кто ещё жив на уровне
//!
//! Враги и спавнеры регистрируются при спавне и удаляются в момент смерти
//! (не при despawn), поэтому level-clear виден в том же шаге.

use bevy::prelude::*;

use crate::components::EnemyKind;

#[derive(Resource, Debug, Default)]
pub struct EncounterRoster {
    enemies: Vec<(Entity, EnemyKind)>,
    spawners: Vec<Entity>,
    active: bool,
    /// Счётчик encounter'ов (растёт на каждом begin)
    generation: u32,
}

impl EncounterRoster {
    /// Новый encounter: очистить списки и включить polling
    pub fn begin(&mut self) {
        self.enemies.clear();
        self.spawners.clear();
        self.active = true;
        self.generation += 1;
    }

    /// Уровень выгружается: polling выключен до следующего begin
    pub fn end(&mut self) {
        self.enemies.clear();
        self.spawners.clear();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn register_enemy(&mut self, entity: Entity, kind: EnemyKind) {
        if !self.enemies.iter().any(|(e, _)| *e == entity) {
            self.enemies.push((entity, kind));
        }
    }

    /// Idempotent
    pub fn remove_enemy(&mut self, entity: Entity) -> bool {
        let before = self.enemies.len();
        self.enemies.retain(|(e, _)| *e != entity);
        self.enemies.len() != before
    }

    pub fn register_spawner(&mut self, entity: Entity) {
        if !self.spawners.contains(&entity) {
            self.spawners.push(entity);
        }
    }

    /// Idempotent
    pub fn remove_spawner(&mut self, entity: Entity) -> bool {
        let before = self.spawners.len();
        self.spawners.retain(|e| *e != entity);
        self.spawners.len() != before
    }

    pub fn contains_enemy(&self, entity: Entity) -> bool {
        self.enemies.iter().any(|(e, _)| *e == entity)
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn live_count_of(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn live_spawner_count(&self) -> usize {
        self.spawners.len()
    }

    pub fn is_clear(&self) -> bool {
        self.enemies.is_empty() && self.spawners.is_empty()
    }

    /// true ровно один раз на encounter: активен и пуст
    pub fn poll_cleared(&mut self) -> bool {
        if self.active && self.is_clear() {
            self.active = false;
            return true;
        }
        false
    }
}
