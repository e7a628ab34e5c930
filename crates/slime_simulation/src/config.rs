//! Tuning конфиг симуляции
//!
//! Значения по умолчанию повторяют inspector-значения оригинальной игры.
//! Хост может загрузить JSON (`SimulationConfig::from_json_str`), все поля
//! опциональны (`#[serde(default)]`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Задержка между смертью и удалением entity (длина death-звука)
    pub removal_delay: f32,
    pub pools: PoolConfig,
    pub projectiles: ProjectileTuning,
    pub player: PlayerTuning,
    pub boss: BossTuning,
    pub flyer: FlyerTuning,
    pub minion: MinionTuning,
    pub spawner: SpawnerTuning,
    pub shield: ShieldTuning,
    pub audio: AudioTuning,
    /// Id сцены меню (хост грузит её как обычный уровень, без layout)
    pub main_menu: String,
    pub levels: Vec<LevelDefinition>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            removal_delay: 1.0,
            pools: PoolConfig::default(),
            projectiles: ProjectileTuning::default(),
            player: PlayerTuning::default(),
            boss: BossTuning::default(),
            flyer: FlyerTuning::default(),
            minion: MinionTuning::default(),
            spawner: SpawnerTuning::default(),
            shield: ShieldTuning::default(),
            audio: AudioTuning::default(),
            main_menu: crate::run::controller::DEFAULT_MAIN_MENU.to_owned(),
            levels: default_levels(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Проверка диапазонов (вызывается при загрузке и в `verify_wiring`)
    pub fn validate(&self) -> SimResult<()> {
        if self.levels.is_empty() {
            return Err(SimulationError::InvalidConfig("at least one level is required".into()));
        }
        if self.removal_delay < 0.0 {
            return Err(SimulationError::InvalidConfig("removal_delay must be >= 0".into()));
        }
        if self.boss.fire_interval <= 0.0 || self.flyer.fire_interval <= 0.0 {
            return Err(SimulationError::InvalidConfig("fire intervals must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.boss.phase_threshold) {
            return Err(SimulationError::InvalidConfig("boss.phase_threshold must be in [0, 1]".into()));
        }
        if self.spawner.spawn_interval < 0.0 {
            return Err(SimulationError::InvalidConfig("spawner.spawn_interval must be >= 0".into()));
        }
        if self.audio.pitch_min > self.audio.pitch_max {
            return Err(SimulationError::InvalidConfig("audio pitch range is inverted".into()));
        }
        for (name, min, max) in [
            ("boss", self.boss.idle_min, self.boss.idle_max),
            ("flyer", self.flyer.idle_min, self.flyer.idle_max),
            ("minion", self.minion.idle_min, self.minion.idle_max),
        ] {
            if min > max || min < 0.0 {
                return Err(SimulationError::InvalidConfig(format!("{name} idle range is invalid")));
            }
        }
        if self.main_menu.is_empty() {
            return Err(SimulationError::InvalidConfig("main_menu id must not be empty".into()));
        }
        let mut ids = std::collections::HashSet::new();
        ids.insert(self.main_menu.as_str());
        for level in &self.levels {
            if !ids.insert(level.id.as_str()) {
                return Err(SimulationError::InvalidConfig(format!("duplicate level id '{}'", level.id)));
            }
        }
        Ok(())
    }

    pub fn level(&self, id: &str) -> Option<&LevelDefinition> {
        self.levels.iter().find(|level| level.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub primary_size: usize,
    pub secondary_size: usize,
    pub enemy_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            primary_size: 20,
            secondary_size: 20,
            enemy_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub primary_speed: f32,
    pub primary_lifetime: f32,
    pub secondary_speed: f32,
    pub secondary_lifetime: f32,
    /// Вертикальная компонента направления secondary выстрела (до нормализации)
    pub secondary_lift: f32,
    /// Косметическое вращение secondary снаряда (градусы за шаг)
    pub secondary_spin_degrees: f32,
    pub enemy_speed: f32,
    pub enemy_lifetime: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            primary_speed: 20.0,
            primary_lifetime: 1.0,
            secondary_speed: 20.0,
            secondary_lifetime: 1.0,
            secondary_lift: 0.6,
            secondary_spin_degrees: 5.0,
            enemy_speed: 15.0,
            enemy_lifetime: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub lives: u32,
    pub move_speed: f32,
    /// Расстояние от центра тела до "рта" (точка спавна снарядов)
    pub mouth_distance: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            move_speed: 15.0,
            mouth_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub lives: u32,
    pub move_speed: f32,
    pub fire_interval: f32,
    /// Доля baseline щитов, при которой включается вторая фаза
    pub phase_threshold: f32,
    pub phase_fire_scale: f32,
    pub mouth_distance: f32,
    pub idle_min: f32,
    pub idle_max: f32,
    pub idle_clips: usize,
    pub damage_clips: usize,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            lives: 20,
            move_speed: 5.0,
            fire_interval: 1.0,
            phase_threshold: 0.5,
            phase_fire_scale: 0.75,
            mouth_distance: 2.0,
            idle_min: 10.0,
            idle_max: 20.0,
            idle_clips: 3,
            damage_clips: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyerTuning {
    pub lives: u32,
    pub move_speed: f32,
    pub fire_interval: f32,
    pub mouth_distance: f32,
    pub idle_min: f32,
    pub idle_max: f32,
    pub idle_clips: usize,
}

impl Default for FlyerTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            move_speed: 5.0,
            fire_interval: 1.0,
            mouth_distance: 1.0,
            idle_min: 15.0,
            idle_max: 30.0,
            idle_clips: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinionTuning {
    pub lives: u32,
    pub speed: f32,
    pub idle_min: f32,
    pub idle_max: f32,
}

impl Default for MinionTuning {
    fn default() -> Self {
        Self {
            lives: 1,
            speed: 5.0,
            idle_min: 5.0,
            idle_max: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    pub spawn_interval: f32,
    pub max_minions: usize,
    pub lives: u32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 3.0,
            max_minions: 20,
            lives: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    pub lives: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self { lives: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTuning {
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub player_spit_clips: usize,
    pub player_move_clips: usize,
}

impl Default for AudioTuning {
    fn default() -> Self {
        Self {
            pitch_min: 0.7,
            pitch_max: 1.0,
            player_spit_clips: 3,
            player_move_clips: 2,
        }
    }
}

/// Описание уровня: что спавнится после `LevelLoadComplete`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDefinition {
    pub id: String,
    pub player_start: [f32; 3],
    pub boss: Option<BossLayout>,
    pub flyers: Vec<[f32; 3]>,
    pub minions: Vec<[f32; 3]>,
    pub spawners: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossLayout {
    pub position: [f32; 3],
    /// Направление "рта" босса (плевки летят сюда)
    pub facing: [f32; 3],
    pub shields: Vec<[f32; 3]>,
}

impl Default for BossLayout {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            facing: [0.0, 0.0, -1.0],
            shields: Vec::new(),
        }
    }
}

pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

fn default_levels() -> Vec<LevelDefinition> {
    vec![
        LevelDefinition {
            id: "Level1".into(),
            player_start: [0.0, 0.0, -10.0],
            minions: vec![[-5.0, 0.0, 5.0], [5.0, 0.0, 5.0]],
            spawners: vec![[-8.0, 0.0, 12.0], [8.0, 0.0, 12.0]],
            ..default()
        },
        LevelDefinition {
            id: "Level2".into(),
            player_start: [0.0, 0.0, -10.0],
            flyers: vec![[-4.0, 2.0, 8.0], [4.0, 2.0, 8.0], [0.0, 2.0, 12.0]],
            ..default()
        },
        LevelDefinition {
            id: "BossLevel".into(),
            player_start: [0.0, 0.0, -10.0],
            boss: Some(BossLayout {
                shields: (0..10)
                    .map(|i| {
                        let angle = i as f32 / 10.0 * std::f32::consts::TAU;
                        [angle.cos() * 3.0, 1.0, 10.0 + angle.sin() * 3.0]
                    })
                    .collect(),
                ..default()
            }),
            ..default()
        },
    ]
}
