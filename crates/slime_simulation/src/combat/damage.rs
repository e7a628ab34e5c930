//! Damage rules: попадание → Health → Lifecycle
//!
//! Один вызов `apply_damage` = одно попадание. Смерть не удаляет entity сразу:
//! Dying держит её пока играет death-фидбек, потом Removed → despawn в конце шага.

use bevy::prelude::*;

use crate::components::{ColliderCategory, Health, Lifecycle};
use crate::StepTime;

/// Результат одного попадания
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Урон прошёл, entity жива
    Damaged { remaining: u32 },
    /// Урон довёл hp до 0 (Alive → Dying)
    Killed,
    /// Щиты подняты, hp не изменилось
    Blocked,
    /// Entity уже умирает или удалена
    Ignored,
}

/// Событие: урон нанесён (для HUD, звуков)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub remaining: u32,
}

/// Событие: entity умерла (hp = 0)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub category: ColliderCategory,
}

/// Применить `amount` урона.
///
/// `removal_delay <= 0` переводит сразу в Removed.
pub fn apply_damage(
    health: &mut Health,
    lifecycle: &mut Lifecycle,
    amount: u32,
    shields_up: bool,
    removal_delay: f32,
) -> DamageOutcome {
    if !lifecycle.is_alive() || !health.is_alive() {
        return DamageOutcome::Ignored;
    }
    if shields_up {
        return DamageOutcome::Blocked;
    }

    health.take_damage(amount);
    if health.is_alive() {
        return DamageOutcome::Damaged {
            remaining: health.current,
        };
    }

    *lifecycle = if removal_delay > 0.0 {
        Lifecycle::Dying {
            remaining: removal_delay,
        }
    } else {
        Lifecycle::Removed
    };
    DamageOutcome::Killed
}

/// System: Dying countdown
pub fn tick_dying(mut lifecycles: Query<(Entity, &mut Lifecycle)>, time: Res<StepTime>) {
    for (entity, mut lifecycle) in lifecycles.iter_mut() {
        if lifecycle.tick(time.delta) {
            crate::logger::log(&format!("{:?} removed", entity));
        }
    }
}

/// System: despawn Removed entities (последняя точка шага перед encounter polling)
pub fn purge_removed(mut commands: Commands, lifecycles: Query<(Entity, &Lifecycle)>) {
    for (entity, lifecycle) in lifecycles.iter() {
        if *lifecycle == Lifecycle::Removed {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}
