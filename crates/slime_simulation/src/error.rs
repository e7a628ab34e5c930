//! Ошибки симуляции
//!
//! Фатальные только на инициализации (wiring, config, persistence).
//! Невалидные переходы во время шага (урон по удалённому, повторный clear)
//! не поднимаются как ошибки - игнорируются и логируются.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Обязательный collaborator не подключён (resource/plugin)
    #[error("missing reference: {0} is not wired into the simulation")]
    MissingReference(&'static str),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("level index {index} is out of range ({count} levels)")]
    InvalidLevel { index: usize, count: usize },

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimulationError::MissingReference("EncounterRoster");
        assert_eq!(
            err.to_string(),
            "missing reference: EncounterRoster is not wired into the simulation"
        );

        let err = SimulationError::InvalidLevel { index: 4, count: 3 };
        assert_eq!(err.to_string(), "level index 4 is out of range (3 levels)");
    }
}
