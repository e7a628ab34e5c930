//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье, жизненный цикл, фракция, тип врага
//! - collider: категории коллайдеров, overlap события от хоста
//! - movement: патруль, преследование, направление взгляда

pub mod actor;
pub mod collider;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use collider::*;
pub use movement::*;
