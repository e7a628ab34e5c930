//! Combat module
//!
//! ECS ответственность:
//! - Правила урона: Health, Lifecycle (Alive → Dying → Removed)
//! - Collision dispatch: Overlap события → эффекты по таблице категорий
//! - Щиты босса и фаза ускорения стрельбы
//!
//! Хост ответственность:
//! - Детекция пересечений (trigger colliders) → `Overlap`

use bevy::prelude::*;

use crate::StepSet;

pub mod collision;
pub mod damage;
pub mod phase;
pub mod shield;

#[cfg(test)]
mod damage_tests;

pub use collision::{dispatch, resolve_overlaps, CollisionEffect, DamagedBy};
pub use damage::{apply_damage, purge_removed, tick_dying, DamageDealt, DamageOutcome, EntityDied};
pub use phase::BossPhase;
pub use shield::{Shield, ShieldBarrier};

/// Combat Plugin
///
/// Порядок внутри шага:
/// 1. resolve_overlaps (Collision) - урон, деактивация снарядов, развороты
/// 2. tick_dying → purge_removed (Lifecycle) - countdown и despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<crate::components::Overlap>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_systems(crate::SimulationStep, resolve_overlaps.in_set(StepSet::Collision))
            .add_systems(
                crate::SimulationStep,
                (tick_dying, purge_removed).chain().in_set(StepSet::Lifecycle),
            );
    }
}
