//! Minion - наземный враг из спавнеров, бежит к игроку

use bevy::prelude::*;
use rand::Rng;

use crate::audio::IdleVoice;
use crate::combat::DamagedBy;
use crate::components::{Chase, ColliderCategory, Enemy, EnemyKind, Facing, Health, Lifecycle};
use crate::config::SimulationConfig;
use crate::player::PlayerBody;
use crate::projectile::PoolKind;
use crate::StepTime;

pub fn spawn_minion(commands: &mut Commands, config: &SimulationConfig, rng: &mut impl Rng, position: Vec3) -> Entity {
    let tuning = &config.minion;
    commands
        .spawn((
            Enemy { kind: EnemyKind::Minion },
            Health::new(tuning.lives),
            ColliderCategory::Enemy,
            DamagedBy(PoolKind::Primary),
            Transform::from_translation(position),
            Facing::default(),
            Chase { speed: tuning.speed },
            // Один idle клип
            IdleVoice::new(rng, tuning.idle_min, tuning.idle_max, 1),
        ))
        .id()
}

/// System: движение к игроку по земле
pub fn minion_chase(
    mut minions: Query<(&mut Transform, &mut Facing, &Chase, &Lifecycle), Without<PlayerBody>>,
    player: Query<&Transform, With<PlayerBody>>,
    time: Res<StepTime>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let target = player_transform.translation;

    for (mut transform, mut facing, chase, lifecycle) in minions.iter_mut() {
        if !lifecycle.is_alive() {
            continue;
        }
        let flat_target = Vec3::new(target.x, transform.translation.y, target.z);
        facing.look_at(transform.translation, flat_target);

        let to_target = flat_target - transform.translation;
        let step = chase.speed * time.delta;
        // Не перепрыгивать через игрока
        transform.translation += facing.flat() * step.min(to_target.length());
    }
}
