//! Категории коллайдеров и overlap-события от physics хоста
//!
//! Хост детектит пересечения (trigger colliders) и присылает `Overlap`.
//! Симуляция сама решает, что значит пара категорий (`combat::collision`).

use bevy::prelude::*;

use crate::projectile::{PoolKind, ProjectileHandle};

/// Закрытый набор категорий коллайдеров
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum ColliderCategory {
    Wall,
    Player,
    Enemy,
    EnemyProjectile,
    PlayerPrimary,
    PlayerSecondary,
    EnemyShield,
    EnemySpawner,
}

/// Ссылка на тело участвующее в overlap
///
/// Снаряды живут в пулах (не entities), поэтому адресуются слотом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Entity(Entity),
    Projectile(PoolKind, ProjectileHandle),
    /// Статическая геометрия уровня
    Wall,
}

/// Event: хост зарегистрировал пересечение двух тел (Host → ECS)
///
/// Порядок `a`/`b` не важен - dispatch применяется в обе стороны.
#[derive(Event, Debug, Clone, Copy)]
pub struct Overlap {
    pub a: BodyRef,
    pub b: BodyRef,
}

impl Overlap {
    pub fn new(a: BodyRef, b: BodyRef) -> Self {
        Self { a, b }
    }
}
