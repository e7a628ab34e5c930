//! Projectile module - пулы снарядов и их интеграция
//!
//! Снаряды не entities: позиции читает хост-рендер через `ProjectilePools`,
//! overlap'ы приходят обратно как `BodyRef::Projectile(kind, handle)`.

use bevy::prelude::*;

use crate::config::{ProjectileTuning, SimulationConfig};
use crate::{StepSet, StepTime};

pub mod pool;

#[cfg(test)]
mod pool_tests;

pub use pool::{
    LaunchParams, Motion, PoolKind, Projectile, ProjectileHandle, ProjectilePool, ProjectilePools,
};

/// Параметры запуска для вида снаряда из tuning конфига
pub fn launch_params(tuning: &ProjectileTuning, kind: PoolKind) -> LaunchParams {
    match kind {
        PoolKind::Primary => LaunchParams {
            speed: tuning.primary_speed,
            ttl: tuning.primary_lifetime,
            motion: Motion::Straight,
        },
        PoolKind::Secondary => LaunchParams {
            speed: tuning.secondary_speed,
            ttl: tuning.secondary_lifetime,
            motion: Motion::Spinning {
                degrees_per_step: tuning.secondary_spin_degrees,
            },
        },
        PoolKind::Enemy => LaunchParams {
            speed: tuning.enemy_speed,
            ttl: tuning.enemy_lifetime,
            motion: Motion::Straight,
        },
    }
}

/// System: движение всех активных снарядов + истечение ttl
pub fn integrate_projectiles(mut pools: ResMut<ProjectilePools>, time: Res<StepTime>) {
    let delta = time.delta;

    for kind in [PoolKind::Primary, PoolKind::Secondary, PoolKind::Enemy] {
        let expired = pools.pool_mut(kind).step(delta);
        if expired > 0 {
            crate::logger::log(&format!("{} {:?} projectiles expired", expired, kind));
        }
    }
}

/// Projectile Plugin
///
/// Создаёт пулы из `SimulationConfig` (prewarm) и интегрирует их в Movement фазе.
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        let sizes = app
            .world()
            .get_resource::<SimulationConfig>()
            .map(|config| config.pools.clone())
            .unwrap_or_default();

        app.insert_resource(ProjectilePools::new(
            sizes.primary_size,
            sizes.secondary_size,
            sizes.enemy_size,
        ))
        .add_systems(crate::SimulationStep, integrate_projectiles.in_set(StepSet::Movement));
    }
}
