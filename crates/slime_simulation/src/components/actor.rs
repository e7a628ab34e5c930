//! Базовые компоненты бойцов: Health, Lifecycle, Faction, Enemy

use bevy::prelude::*;

/// Здоровье (количество попаданий до смерти)
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// Доля здоровья для HUD (0.0..=1.0); max == 0 считается пустым
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// Жизненный цикл бойца: Alive → Dying → Removed
///
/// Dying держит entity в мире пока играет death-фидбек,
/// Removed собирается в конце шага (`purge_removed`).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum Lifecycle {
    #[default]
    Alive,
    Dying {
        /// Сколько секунд осталось до Removed
        remaining: f32,
    },
    Removed,
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    /// Продвигает Dying countdown. Возвращает true ровно один раз - на переходе в Removed.
    pub fn tick(&mut self, delta: f32) -> bool {
        if let Lifecycle::Dying { remaining } = self {
            *remaining -= delta;
            if *remaining <= 0.0 {
                *self = Lifecycle::Removed;
                return true;
            }
        }
        false
    }
}

/// Сторона конфликта (владелец снаряда / цель)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Faction {
    Player,
    Enemy,
}

/// Тип врага (для roster и HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EnemyKind {
    Boss,
    Flyer,
    Minion,
}

/// Враг, участвующий в encounter
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Health, Lifecycle, EncounterEntity)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// Маркер: entity принадлежит текущему уровню (удаляется при перезагрузке уровня)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct EncounterEntity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(3);
        assert_eq!(health.current, 3);

        health.take_damage(1);
        assert_eq!(health.current, 2);
        assert!(health.is_alive());

        health.take_damage(10); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());

        health.restore();
        assert_eq!(health.current, 3);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(20);
        health.take_damage(5);
        assert_eq!(health.fraction(), 0.75);

        let empty = Health { current: 0, max: 0 };
        assert_eq!(empty.fraction(), 0.0);
    }

    #[test]
    fn test_lifecycle_removed_once() {
        let mut lifecycle = Lifecycle::Dying { remaining: 1.0 };

        assert!(!lifecycle.tick(0.5));
        assert!(lifecycle.tick(0.5));
        assert_eq!(lifecycle, Lifecycle::Removed);

        // Повторные тики ничего не делают
        assert!(!lifecycle.tick(0.5));
        assert!(!lifecycle.tick(10.0));
        assert_eq!(lifecycle, Lifecycle::Removed);
    }

    #[test]
    fn test_alive_does_not_tick() {
        let mut lifecycle = Lifecycle::Alive;
        assert!(!lifecycle.tick(100.0));
        assert!(lifecycle.is_alive());
    }
}
