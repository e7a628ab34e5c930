//! Audio cues - fire-and-forget события для audio хоста
//!
//! Симуляция решает ЧТО и КОГДА звучит (клип, pitch); воспроизведение,
//! микшер и DSP остаются на стороне хоста.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{EnemyKind, Lifecycle};
use crate::config::{AudioTuning, SimulationConfig};
use crate::combat::ShieldBarrier;
use crate::{DeterministicRng, StepSet, StepTime};

/// Идентификатор клипа (индекс внутри банка, где банков несколько)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipId {
    BossIdle(usize),
    BossDamage(usize),
    BossDeath,
    BossSpit,
    FlyerIdle(usize),
    FlyerDamage,
    FlyerDeath,
    MinionIdle,
    MinionDeath,
    PlayerSpit(usize),
    PlayerMove(usize),
    PlayerDamage,
    PlayerDeath,
    GameOver,
}

/// Event: проиграть клип (ECS → audio host)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub clip: ClipId,
    pub pitch: f32,
    /// true = PlayOneShot (не прерывает текущий клип источника)
    pub one_shot: bool,
}

impl AudioCue {
    pub fn play(clip: ClipId, pitch: f32) -> Self {
        Self { clip, pitch, one_shot: false }
    }

    pub fn one_shot(clip: ClipId) -> Self {
        Self { clip, pitch: 1.0, one_shot: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixerGroup {
    Enemies,
    /// Весь игровой звук (paused snapshot: muted = пауза)
    Gameplay,
}

/// Event: остановить зацикленный звук источника
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStop {
    pub source: LoopSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopSource {
    /// След слизи игрока (PlayerMove клипы)
    PlayerTrail,
}

/// Event: заглушить/вернуть группу микшера (snapshot на стороне хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerCommand {
    pub group: MixerGroup,
    pub muted: bool,
}

/// Случайный pitch в [pitch_min, pitch_max)
pub fn random_pitch(rng: &mut impl Rng, tuning: &AudioTuning) -> f32 {
    random_range(rng, tuning.pitch_min, tuning.pitch_max)
}

/// gen_range с защитой от пустого/перевёрнутого диапазона
pub fn random_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..max)
    }
}

/// Случайный индекс клипа; пустой банк - None
pub fn pick_clip(rng: &mut impl Rng, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Случайный индекс, не совпадающий с `last` (если в банке больше одного клипа)
pub fn pick_distinct(rng: &mut impl Rng, len: usize, last: Option<usize>) -> Option<usize> {
    match (len, last) {
        (0, _) => None,
        (1, _) => Some(0),
        (_, Some(last)) if last < len => {
            let index = rng.gen_range(0..len - 1);
            Some(if index >= last { index + 1 } else { index })
        }
        _ => pick_clip(rng, len),
    }
}

/// Периодические idle-звуки врага (случайный интервал)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct IdleVoice {
    pub timer: f32,
    pub min_interval: f32,
    pub max_interval: f32,
    /// Размер банка idle клипов (0 = молчит)
    pub clip_count: usize,
    pub last_clip: Option<usize>,
}

impl IdleVoice {
    pub fn new(rng: &mut impl Rng, min_interval: f32, max_interval: f32, clip_count: usize) -> Self {
        Self {
            timer: random_range(rng, min_interval, max_interval),
            min_interval,
            max_interval,
            clip_count,
            last_clip: None,
        }
    }
}

/// System: idle звуки врагов
///
/// - Boss: только пока есть щиты, pitch 1.0, клип не повторяет предыдущий
/// - Flyer: случайный pitch, клип не повторяет предыдущий
/// - Minion: один клип, случайный pitch, one-shot
pub fn tick_idle_voices(
    mut voices: Query<(&mut IdleVoice, &crate::components::Enemy, &Lifecycle, Option<&ShieldBarrier>)>,
    mut rng: ResMut<DeterministicRng>,
    mut cues: EventWriter<AudioCue>,
    config: Res<SimulationConfig>,
    time: Res<StepTime>,
) {
    for (mut voice, enemy, lifecycle, barrier) in voices.iter_mut() {
        voice.timer -= time.delta;
        if voice.timer > 0.0 {
            continue;
        }
        let next = random_range(&mut rng.rng, voice.min_interval, voice.max_interval);
        // Нулевой интервал превратил бы idle в звук каждый шаг
        voice.timer = next.max(f32::EPSILON);

        if !lifecycle.is_alive() {
            continue;
        }

        match enemy.kind {
            EnemyKind::Boss => {
                if barrier.map_or(0, |b| b.remaining_count()) == 0 {
                    continue;
                }
                if let Some(clip) = pick_distinct(&mut rng.rng, voice.clip_count, voice.last_clip) {
                    voice.last_clip = Some(clip);
                    cues.write(AudioCue::play(ClipId::BossIdle(clip), 1.0));
                }
            }
            EnemyKind::Flyer => {
                let pitch = random_pitch(&mut rng.rng, &config.audio);
                if let Some(clip) = pick_distinct(&mut rng.rng, voice.clip_count, voice.last_clip) {
                    voice.last_clip = Some(clip);
                    cues.write(AudioCue::play(ClipId::FlyerIdle(clip), pitch));
                }
            }
            EnemyKind::Minion => {
                let pitch = random_pitch(&mut rng.rng, &config.audio);
                cues.write(AudioCue {
                    clip: ClipId::MinionIdle,
                    pitch,
                    one_shot: true,
                });
            }
        }
    }
}

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioCue>()
            .add_event::<MixerCommand>()
            .add_event::<AudioStop>()
            .add_systems(
                crate::SimulationStep,
                tick_idle_voices
                    .after(crate::encounter::run_spawner)
                    .in_set(StepSet::Behavior),
            );
    }
}
