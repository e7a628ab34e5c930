//! Movement компоненты: патруль между стенами, преследование, направление взгляда

use bevy::prelude::*;

/// Патруль вдоль оси X; направление меняется при касании стены
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Patrol {
    /// +1.0 или -1.0
    pub direction: f32,
    /// Скорость (м/с), босс ускоряется с каждым попаданием
    pub speed: f32,
}

impl Patrol {
    pub fn new(speed: f32) -> Self {
        // Оригинальные враги стартуют влево
        Self { direction: -1.0, speed }
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }

    pub fn step(&self, delta: f32) -> Vec3 {
        Vec3::new(self.direction * self.speed * delta, 0.0, 0.0)
    }
}

/// Преследование игрока по прямой
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Chase {
    pub speed: f32,
}

/// Направление "вперёд" (куда смотрит рот, откуда летят плевки)
///
/// Всегда нормализовано; нулевой вектор заменяется на -Z.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::NEG_Z)
    }
}

impl Facing {
    pub fn new(direction: Vec3) -> Self {
        Self(direction.try_normalize().unwrap_or(Vec3::NEG_Z))
    }

    /// Повернуться к точке (как LookAt)
    pub fn look_at(&mut self, from: Vec3, target: Vec3) {
        if let Some(dir) = (target - from).try_normalize() {
            self.0 = dir;
        }
    }

    /// Горизонтальное направление (y = 0) для прямого плевка
    pub fn flat(&self) -> Vec3 {
        Vec3::new(self.0.x, 0.0, self.0.z)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }
}
