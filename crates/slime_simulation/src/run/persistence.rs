//! Progress persistence - одно целое значение (индекс уровня) по ключу
//!
//! Хост выбирает хранилище: в памяти (тесты, headless) или JSON файл.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::error::{SimResult, SimulationError};

/// Ключ сохранённого индекса уровня
pub const PROGRESS_KEY: &str = "currentLevel";

pub trait ProgressStore: Send + Sync {
    fn save(&mut self, key: &str, value: i32) -> SimResult<()>;
    fn load(&self, key: &str) -> SimResult<Option<i32>>;
    /// Удаление отсутствующего ключа - не ошибка
    fn delete(&mut self, key: &str) -> SimResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    values: BTreeMap<String, i32>,
}

impl ProgressStore for MemoryProgressStore {
    fn save(&mut self, key: &str, value: i32) -> SimResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn load(&self, key: &str) -> SimResult<Option<i32>> {
        Ok(self.values.get(key).copied())
    }

    fn delete(&mut self, key: &str) -> SimResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Ключи хранятся одним JSON объектом `{ "currentLevel": 2 }`
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SimResult<BTreeMap<String, i32>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(SimulationError::Persistence(format!(
                "cannot read {}: {}",
                self.path.display(),
                err
            ))),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, i32>) -> SimResult<()> {
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn save(&mut self, key: &str, value: i32) -> SimResult<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_owned(), value);
        self.write_all(&values)
    }

    fn load(&self, key: &str) -> SimResult<Option<i32>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn delete(&mut self, key: &str) -> SimResult<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// Resource-обёртка над выбранным хранилищем
#[derive(Resource)]
pub struct Progress(Box<dyn ProgressStore>);

impl Progress {
    pub fn new(store: impl ProgressStore + 'static) -> Self {
        Self(Box::new(store))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryProgressStore::default())
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.0.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn ProgressStore {
        self.0.as_mut()
    }
}
