//! Shield barrier - щиты вокруг босса
//!
//! Пока жив хотя бы один щит, босс неуязвим. Щит ломается только
//! вторичным (навесным) плевком игрока.

use bevy::prelude::*;

use crate::components::{ColliderCategory, EncounterEntity, Health, Lifecycle};

/// Щит, принадлежащий барьеру босса
#[derive(Component, Debug, Clone, Copy)]
#[require(Health, Lifecycle, EncounterEntity, ColliderCategory = ColliderCategory::EnemyShield)]
pub struct Shield {
    pub owner: Entity,
}

/// Набор живых щитов босса (компонент на боссе)
#[derive(Component, Debug, Clone, Default)]
pub struct ShieldBarrier {
    members: Vec<Entity>,
    /// Число щитов на момент спавна босса (база для phase threshold)
    baseline: usize,
}

impl ShieldBarrier {
    pub fn new(members: Vec<Entity>) -> Self {
        let baseline = members.len();
        Self { members, baseline }
    }

    pub fn remaining_count(&self) -> usize {
        self.members.len()
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn is_up(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn contains(&self, shield: Entity) -> bool {
        self.members.contains(&shield)
    }

    /// Idempotent: false если щит уже не в барьере
    pub fn remove(&mut self, shield: Entity) -> bool {
        match self.members.iter().position(|member| *member == shield) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_remove_is_idempotent() {
        let shields: Vec<Entity> = (0..3).map(Entity::from_raw).collect();
        let mut barrier = ShieldBarrier::new(shields.clone());

        assert_eq!(barrier.baseline(), 3);
        assert!(barrier.remove(shields[1]));
        assert!(!barrier.remove(shields[1]));
        assert_eq!(barrier.remaining_count(), 2);
        assert!(barrier.is_up());

        barrier.remove(shields[0]);
        barrier.remove(shields[2]);
        assert!(!barrier.is_up());
        // baseline не меняется
        assert_eq!(barrier.baseline(), 3);
    }
}
