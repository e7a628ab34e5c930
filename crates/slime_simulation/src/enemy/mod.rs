//! Enemy behaviours: boss, flyer, minion
//!
//! Спавн-функции вызываются при загрузке уровня (`run::level`) и спавнером.
//! Урон и смерть - в `combat`; здесь только движение и стрельба.

use bevy::prelude::*;

use crate::components::{Lifecycle, Patrol};
use crate::{StepSet, StepTime};

pub mod boss;
pub mod flyer;
pub mod minion;

pub use boss::{boss_fire, spawn_boss, BossBrain};
pub use flyer::{flyer_fire, spawn_flyer, FlyerBrain};
pub use minion::{minion_chase, spawn_minion};

/// System: патруль вдоль X (разворот приходит из collision dispatch)
pub fn patrol_movement(mut patrollers: Query<(&mut Transform, &Patrol, &Lifecycle)>, time: Res<StepTime>) {
    for (mut transform, patrol, lifecycle) in patrollers.iter_mut() {
        if lifecycle.is_alive() {
            transform.translation += patrol.step(time.delta);
        }
    }
}

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            crate::SimulationStep,
            (patrol_movement, minion_chase)
                .chain()
                .after(crate::player::player_move)
                .in_set(StepSet::Movement),
        )
        .add_systems(
            crate::SimulationStep,
            (boss_fire, flyer_fire).chain().in_set(StepSet::Behavior),
        );
    }
}
