//! Boss - патрулирует, плюётся по таймеру, защищён кольцом щитов

use bevy::prelude::*;
use rand::Rng;

use crate::audio::{random_pitch, AudioCue, ClipId, IdleVoice};
use crate::combat::{BossPhase, DamagedBy, Shield, ShieldBarrier};
use crate::components::{ColliderCategory, Enemy, EnemyKind, Facing, Health, Lifecycle, Patrol};
use crate::config::{vec3, BossLayout, SimulationConfig};
use crate::projectile::{launch_params, PoolKind, ProjectilePools};
use crate::{DeterministicRng, StepTime};

#[derive(Component, Debug, Clone, Copy)]
pub struct BossBrain {
    /// До следующего плевка (секунды)
    pub fire_timer: f32,
    pub mouth_distance: f32,
}

/// Спавн босса и его щитов. Baseline барьера фиксируется здесь.
pub fn spawn_boss(
    commands: &mut Commands,
    config: &SimulationConfig,
    rng: &mut impl Rng,
    layout: &BossLayout,
) -> (Entity, Vec<Entity>) {
    let tuning = &config.boss;
    let boss = commands
        .spawn((
            Enemy { kind: EnemyKind::Boss },
            Health::new(tuning.lives),
            ColliderCategory::Enemy,
            DamagedBy(PoolKind::Primary),
            Transform::from_translation(vec3(layout.position)),
            Facing::new(vec3(layout.facing)),
            Patrol::new(tuning.move_speed),
            BossBrain {
                fire_timer: tuning.fire_interval,
                mouth_distance: tuning.mouth_distance,
            },
            BossPhase::new(tuning.fire_interval, tuning.phase_threshold, tuning.phase_fire_scale),
            IdleVoice::new(rng, tuning.idle_min, tuning.idle_max, tuning.idle_clips),
        ))
        .id();

    let shields: Vec<Entity> = layout
        .shields
        .iter()
        .map(|position| {
            commands
                .spawn((
                    Shield { owner: boss },
                    Health::new(config.shield.lives),
                    Transform::from_translation(vec3(*position)),
                ))
                .id()
        })
        .collect();

    commands.entity(boss).insert(ShieldBarrier::new(shields.clone()));
    crate::logger::log_info(&format!("Boss {:?} spawned with {} shields", boss, shields.len()));
    (boss, shields)
}

/// System: фаза + стрельба босса
pub fn boss_fire(
    mut bosses: Query<(&Transform, &Facing, &Lifecycle, &mut BossBrain, &mut BossPhase, &ShieldBarrier)>,
    mut pools: ResMut<ProjectilePools>,
    mut rng: ResMut<DeterministicRng>,
    mut cues: EventWriter<AudioCue>,
    config: Res<SimulationConfig>,
    time: Res<StepTime>,
) {
    for (transform, facing, lifecycle, mut brain, mut phase, barrier) in bosses.iter_mut() {
        if !lifecycle.is_alive() {
            continue;
        }

        let remaining = barrier.remaining_count();
        if phase.update(remaining, barrier.baseline()) {
            crate::logger::log_info(&format!(
                "Boss phase: fire interval now {:.2}s ({} shields left)",
                phase.fire_interval, remaining
            ));
        }

        brain.fire_timer -= time.delta;
        if brain.fire_timer > 0.0 {
            continue;
        }
        brain.fire_timer = phase.fire_interval;

        let direction = facing.flat();
        let origin = transform.translation + direction * brain.mouth_distance;
        pools
            .enemy
            .fire(origin, direction, launch_params(&config.projectiles, PoolKind::Enemy));

        // Пока щиты целы, босс "молчит" при стрельбе (звучит idle)
        if remaining == 0 {
            let pitch = random_pitch(&mut rng.rng, &config.audio);
            cues.write(AudioCue::play(ClipId::BossSpit, pitch));
        }
    }
}
