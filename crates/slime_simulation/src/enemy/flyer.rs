//! Flyer - летающий враг, смотрит на игрока и плюётся прицельно

use bevy::prelude::*;
use rand::Rng;

use crate::audio::IdleVoice;
use crate::combat::DamagedBy;
use crate::components::{ColliderCategory, Enemy, EnemyKind, Facing, Health, Lifecycle, Patrol};
use crate::config::SimulationConfig;
use crate::player::PlayerBody;
use crate::projectile::{launch_params, PoolKind, ProjectilePools};
use crate::StepTime;

#[derive(Component, Debug, Clone, Copy)]
pub struct FlyerBrain {
    pub fire_timer: f32,
    pub mouth_distance: f32,
}

pub fn spawn_flyer(commands: &mut Commands, config: &SimulationConfig, rng: &mut impl Rng, position: Vec3) -> Entity {
    let tuning = &config.flyer;
    commands
        .spawn((
            Enemy { kind: EnemyKind::Flyer },
            Health::new(tuning.lives),
            ColliderCategory::Enemy,
            DamagedBy(PoolKind::Secondary),
            Transform::from_translation(position),
            Facing::default(),
            Patrol::new(tuning.move_speed),
            FlyerBrain {
                fire_timer: tuning.fire_interval,
                mouth_distance: tuning.mouth_distance,
            },
            IdleVoice::new(rng, tuning.idle_min, tuning.idle_max, tuning.idle_clips),
        ))
        .id()
}

/// System: поворот к игроку + прицельный плевок
pub fn flyer_fire(
    mut flyers: Query<(&Transform, &mut Facing, &Lifecycle, &mut FlyerBrain)>,
    player: Query<&Transform, With<PlayerBody>>,
    mut pools: ResMut<ProjectilePools>,
    config: Res<SimulationConfig>,
    time: Res<StepTime>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let target = player_transform.translation;

    for (transform, mut facing, lifecycle, mut brain) in flyers.iter_mut() {
        if !lifecycle.is_alive() {
            continue;
        }
        facing.look_at(transform.translation, target);

        brain.fire_timer -= time.delta;
        if brain.fire_timer > 0.0 {
            continue;
        }
        brain.fire_timer = config.flyer.fire_interval;

        let origin = transform.translation + facing.0 * brain.mouth_distance;
        pools
            .enemy
            .fire(origin, facing.0, launch_params(&config.projectiles, PoolKind::Enemy));
    }
}
