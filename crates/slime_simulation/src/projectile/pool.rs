//! Projectile pool - переиспользуемые слоты снарядов
//!
//! Снаряды не создаются/удаляются на каждый выстрел: слот переключается
//! между Active и Inactive. Пул только растёт (никогда не сжимается).

use bevy::prelude::*;

use crate::components::{ColliderCategory, Faction};

/// Какой пул (и, следовательно, какая категория коллайдера)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PoolKind {
    /// Прямой плевок игрока (ЛКМ)
    Primary,
    /// Навесной вращающийся плевок игрока (ПКМ) - ломает щиты и спавнеры
    Secondary,
    /// Плевки врагов
    Enemy,
}

impl PoolKind {
    pub fn category(&self) -> ColliderCategory {
        match self {
            PoolKind::Primary => ColliderCategory::PlayerPrimary,
            PoolKind::Secondary => ColliderCategory::PlayerSecondary,
            PoolKind::Enemy => ColliderCategory::EnemyProjectile,
        }
    }

    pub fn faction(&self) -> Faction {
        match self {
            PoolKind::Primary | PoolKind::Secondary => Faction::Player,
            PoolKind::Enemy => Faction::Enemy,
        }
    }
}

/// Индекс слота в пуле (стабилен всё время жизни пула)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct ProjectileHandle(pub usize);

/// Характер движения снаряда
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum Motion {
    Straight,
    /// Косметическое вращение вокруг Y каждый шаг
    Spinning { degrees_per_step: f32 },
}

/// Параметры запуска (фиксируются на всё время активности)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub speed: f32,
    pub ttl: f32,
    pub motion: Motion,
}

/// Один слот пула
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Projectile {
    pub position: Vec3,
    pub rotation: Quat,
    pub direction: Vec3,
    pub speed: f32,
    /// Оставшееся время жизни (секунды)
    pub ttl: f32,
    pub faction: Faction,
    pub motion: Motion,
    active: bool,
}

impl Projectile {
    fn inactive(faction: Faction) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            direction: Vec3::ZERO,
            speed: 0.0,
            ttl: 0.0,
            faction,
            motion: Motion::Straight,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Задать траекторию. Direction нормализуется.
    pub fn launch(&mut self, origin: Vec3, direction: Vec3, params: LaunchParams) {
        self.position = origin;
        self.rotation = Quat::IDENTITY;
        self.direction = direction.normalize_or_zero();
        self.speed = params.speed;
        self.ttl = params.ttl;
        self.motion = params.motion;
        self.active = true;
    }

    /// Один шаг интеграции. Возвращает true если снаряд истёк на этом шаге.
    pub fn step(&mut self, delta: f32) -> bool {
        if !self.active {
            return false;
        }

        self.position += self.direction * self.speed * delta;

        if let Motion::Spinning { degrees_per_step } = self.motion {
            self.rotation *= Quat::from_rotation_y(degrees_per_step.to_radians());
        }

        self.ttl -= delta;
        if self.ttl <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Idempotent: повторная деактивация ничего не делает
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        was_active
    }
}

/// Пул снарядов одного вида
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    kind: PoolKind,
    slots: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(kind: PoolKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
        }
    }

    /// Пул с `count` заранее созданными неактивными слотами
    pub fn with_prewarm(kind: PoolKind, count: usize) -> Self {
        let mut pool = Self::new(kind);
        pool.prewarm(count);
        pool
    }

    pub fn prewarm(&mut self, count: usize) {
        let faction = self.kind.faction();
        self.slots.extend((0..count).map(|_| Projectile::inactive(faction)));
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Первый неактивный слот (наименьший индекс) или новый. Никогда не падает.
    ///
    /// Слот сразу помечается активным (неподвижный, ttl = 0 до `launch`).
    pub fn acquire(&mut self) -> ProjectileHandle {
        let index = match self.slots.iter().position(|slot| !slot.active) {
            Some(index) => index,
            None => {
                self.slots.push(Projectile::inactive(self.kind.faction()));
                crate::logger::log(&format!(
                    "{:?} pool grew to {} slots",
                    self.kind,
                    self.slots.len()
                ));
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        *slot = Projectile::inactive(self.kind.faction());
        slot.active = true;
        ProjectileHandle(index)
    }

    /// acquire + launch
    pub fn fire(&mut self, origin: Vec3, direction: Vec3, params: LaunchParams) -> ProjectileHandle {
        let handle = self.acquire();
        self.slots[handle.0].launch(origin, direction, params);
        handle
    }

    /// Вернуть слот в пул. false если слот уже был неактивен или не существует.
    pub fn release(&mut self, handle: ProjectileHandle) -> bool {
        match self.slots.get_mut(handle.0) {
            Some(slot) => slot.deactivate(),
            None => false,
        }
    }

    /// Деактивировать всё (перезагрузка уровня / смерть игрока), без освобождения памяти
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.active = false;
        }
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slots.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.slots.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (ProjectileHandle(index), slot))
    }

    /// Шаг всех активных слотов. Возвращает число истёкших.
    pub fn step(&mut self, delta: f32) -> usize {
        self.slots.iter_mut().filter(|slot| slot.active).fold(0, |expired, slot| {
            expired + usize::from(slot.step(delta))
        })
    }
}

/// Все пулы симуляции (process-wide, передаются системам через Res/ResMut)
#[derive(Resource, Debug, Clone)]
pub struct ProjectilePools {
    pub primary: ProjectilePool,
    pub secondary: ProjectilePool,
    pub enemy: ProjectilePool,
}

impl ProjectilePools {
    pub fn new(primary: usize, secondary: usize, enemy: usize) -> Self {
        Self {
            primary: ProjectilePool::with_prewarm(PoolKind::Primary, primary),
            secondary: ProjectilePool::with_prewarm(PoolKind::Secondary, secondary),
            enemy: ProjectilePool::with_prewarm(PoolKind::Enemy, enemy),
        }
    }

    pub fn pool(&self, kind: PoolKind) -> &ProjectilePool {
        match kind {
            PoolKind::Primary => &self.primary,
            PoolKind::Secondary => &self.secondary,
            PoolKind::Enemy => &self.enemy,
        }
    }

    pub fn pool_mut(&mut self, kind: PoolKind) -> &mut ProjectilePool {
        match kind {
            PoolKind::Primary => &mut self.primary,
            PoolKind::Secondary => &mut self.secondary,
            PoolKind::Enemy => &mut self.enemy,
        }
    }

    pub fn reset_all(&mut self) {
        self.primary.reset();
        self.secondary.reset();
        self.enemy.reset();
    }
}
