//! Player body - единственный entity, управляемый хостом через input
//!
//! Хост пишет `PlayerInput` перед каждым шагом; симуляция двигает тело,
//! выпускает плевки из пулов и отслеживает поражение.

use bevy::prelude::*;

use crate::audio::{pick_clip, random_pitch, AudioCue, AudioStop, ClipId, LoopSource};
use crate::components::{ColliderCategory, Facing, Health};
use crate::config::SimulationConfig;
use crate::projectile::{launch_params, PoolKind, ProjectilePools};
use crate::{DeterministicRng, StepSet, StepTime};

/// Тело игрока
#[derive(Component, Debug, Clone, Copy)]
#[require(Health, Facing, PlayerInput, Transform, ColliderCategory = ColliderCategory::Player)]
pub struct PlayerBody {
    /// false после поражения или победы (движение, стрельба и урон выключены)
    pub can_move: bool,
    pub move_speed: f32,
    pub mouth_distance: f32,
    moving: bool,
}

impl PlayerBody {
    pub fn new(move_speed: f32, mouth_distance: f32) -> Self {
        Self {
            can_move: true,
            move_speed,
            mouth_distance,
            moving: false,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Вернуть в исходное состояние (respawn / новый уровень)
    pub fn revive(&mut self, health: &mut Health) {
        health.restore();
        self.can_move = true;
        self.moving = false;
    }
}

/// Ввод на текущий шаг. Флаги выстрела сбрасываются после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// -1.0..=1.0 вдоль направления взгляда
    pub forward: f32,
    /// Куда смотрит игрок (мировое направление; ноль = без изменений)
    pub aim: Vec3,
    pub fire_primary: bool,
    pub fire_secondary: bool,
}

/// Событие: hp игрока дошло до 0
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDefeated {
    pub player: Entity,
}

pub fn spawn_player(commands: &mut Commands, config: &SimulationConfig, position: Vec3) -> Entity {
    let tuning = &config.player;
    commands
        .spawn((
            PlayerBody::new(tuning.move_speed, tuning.mouth_distance),
            Health::new(tuning.lives),
            Transform::from_translation(position),
        ))
        .id()
}

/// Направление вторичного (навесного) плевка: взгляд с подъёмом по Y
pub fn lobbed_direction(facing: &Facing, lift: f32) -> Vec3 {
    let flat = facing.flat();
    Vec3::new(flat.x, lift, flat.z).normalize_or_zero()
}

/// System: поворот по aim
pub fn player_aim(mut players: Query<(&PlayerBody, &PlayerInput, &mut Facing)>) {
    for (body, input, mut facing) in players.iter_mut() {
        if body.can_move && input.aim.length_squared() > 0.0 {
            *facing = Facing::new(input.aim);
        }
    }
}

/// System: выстрелы (primary - прямо, secondary - навесом)
pub fn player_fire(
    mut players: Query<(&PlayerBody, &mut PlayerInput, &Facing, &Transform)>,
    mut pools: ResMut<ProjectilePools>,
    mut rng: ResMut<DeterministicRng>,
    mut cues: EventWriter<AudioCue>,
    config: Res<SimulationConfig>,
) {
    for (body, mut input, facing, transform) in players.iter_mut() {
        let fire_primary = std::mem::take(&mut input.fire_primary);
        let fire_secondary = std::mem::take(&mut input.fire_secondary);
        if !body.can_move {
            continue;
        }

        let mouth = transform.translation + facing.flat() * body.mouth_distance;
        let shots = [
            (fire_primary, PoolKind::Primary, facing.flat()),
            (
                fire_secondary,
                PoolKind::Secondary,
                lobbed_direction(facing, config.projectiles.secondary_lift),
            ),
        ];

        for (pressed, kind, direction) in shots {
            if !pressed {
                continue;
            }
            pools
                .pool_mut(kind)
                .fire(mouth, direction, launch_params(&config.projectiles, kind));

            let pitch = random_pitch(&mut rng.rng, &config.audio);
            if let Some(clip) = pick_clip(&mut rng.rng, config.audio.player_spit_clips) {
                cues.write(AudioCue::play(ClipId::PlayerSpit(clip), pitch));
            }
        }
    }
}

/// System: движение вдоль взгляда
///
/// След слизи звучит пока игрок движется: старт на переходе в движение,
/// `AudioStop` на переходе в покой.
pub fn player_move(
    mut players: Query<(&mut PlayerBody, &PlayerInput, &Facing, &mut Transform)>,
    mut rng: ResMut<DeterministicRng>,
    mut cues: EventWriter<AudioCue>,
    mut stops: EventWriter<AudioStop>,
    config: Res<SimulationConfig>,
    time: Res<StepTime>,
) {
    for (mut body, input, facing, mut transform) in players.iter_mut() {
        let forward = input.forward.clamp(-1.0, 1.0);
        let moving = body.can_move && forward != 0.0;

        if moving {
            transform.translation += facing.flat() * forward * body.move_speed * time.delta;
            if !body.moving {
                let pitch = random_pitch(&mut rng.rng, &config.audio);
                if let Some(clip) = pick_clip(&mut rng.rng, config.audio.player_move_clips) {
                    cues.write(AudioCue::play(ClipId::PlayerMove(clip), pitch));
                }
            }
        } else if body.moving {
            stops.write(AudioStop {
                source: LoopSource::PlayerTrail,
            });
        }
        body.moving = moving;
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerDefeated>()
            .add_systems(
                crate::SimulationStep,
                (player_aim, player_fire).chain().in_set(StepSet::Input),
            )
            .add_systems(crate::SimulationStep, player_move.in_set(StepSet::Movement));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobbed_direction_lifts_and_normalises() {
        let facing = Facing::new(Vec3::Z);
        let direction = lobbed_direction(&facing, 0.6);

        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!(direction.y > 0.0);
        let expected = Vec3::new(0.0, 0.6, 1.0).normalize();
        assert!((direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_revive_restores_state() {
        let mut body = PlayerBody::new(15.0, 1.0);
        let mut health = Health::new(3);
        health.take_damage(3);
        body.can_move = false;

        body.revive(&mut health);

        assert!(body.can_move);
        assert_eq!(health.current, 3);
        assert!(!body.is_moving());
    }
}
