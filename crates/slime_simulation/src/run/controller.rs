//! Run controller - порядок уровней, сохранение прогресса, переходы
//!
//! Чистая логика без ECS: методы возвращают `RunTransition`, системы
//! в `run::mod` превращают его в события для хоста.

use bevy::prelude::*;

use crate::error::{SimResult, SimulationError};
use crate::run::persistence::{ProgressStore, PROGRESS_KEY};

pub const DEFAULT_MAIN_MENU: &str = "MainMenu";

/// Что делать после операции
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTransition {
    /// Запросить у хоста загрузку уровня
    Load(String),
    /// Уровни кончились
    Victory,
}

#[derive(Resource, Debug, Clone)]
pub struct RunController {
    levels: Vec<String>,
    current_index: usize,
    current_level: Option<String>,
    /// Уровень, загрузку которого ждём от хоста
    loading: Option<String>,
    save_exists: bool,
    complete: bool,
    /// Сцена меню (не входит в последовательность уровней)
    main_menu: String,
    paused: bool,
}

impl RunController {
    pub fn new(levels: Vec<String>) -> Self {
        Self {
            levels,
            current_index: 0,
            current_level: None,
            loading: None,
            save_exists: false,
            complete: false,
            main_menu: DEFAULT_MAIN_MENU.to_owned(),
            paused: false,
        }
    }

    pub fn with_main_menu(mut self, main_menu: impl Into<String>) -> Self {
        self.main_menu = main_menu.into();
        self
    }

    pub fn main_menu(&self) -> &str {
        &self.main_menu
    }

    /// Загружено меню (игрок спрятан, encounter нет)
    pub fn on_main_menu(&self) -> bool {
        self.current_level.as_deref() == Some(self.main_menu.as_str())
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_level(&self) -> Option<&str> {
        self.current_level.as_deref()
    }

    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// Для меню: показывать ли "Continue"
    pub fn has_save(&self) -> bool {
        self.save_exists
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Пауза доступна только на загруженном игровом уровне до победы
    pub fn can_pause(&self) -> bool {
        self.loading.is_none() && !self.complete && self.current_level.is_some() && !self.on_main_menu()
    }

    /// Включить/выключить паузу. true если состояние изменилось.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if paused == self.paused || (paused && !self.can_pause()) {
            return false;
        }
        self.paused = paused;
        true
    }

    /// Во время загрузки и паузы геймплей (input, движение, урон) заморожен
    pub fn gameplay_active(&self) -> bool {
        self.loading.is_none() && !self.paused
    }

    /// Прочитать сохранённый индекс. Индекс вне диапазона сбрасывается в 0 ("нет сохранения").
    pub fn load_saved_progress(&mut self, store: &dyn ProgressStore) -> SimResult<()> {
        let saved = store.load(PROGRESS_KEY)?;
        match saved {
            Some(index) if index >= 0 && (index as usize) < self.levels.len() => {
                self.current_index = index as usize;
                self.save_exists = true;
            }
            Some(index) => {
                crate::logger::log_warning(&format!(
                    "Saved level index {} out of range ({} levels), starting over",
                    index,
                    self.levels.len()
                ));
                self.current_index = 0;
                self.save_exists = false;
            }
            None => {
                self.current_index = 0;
                self.save_exists = false;
            }
        }
        Ok(())
    }

    /// Новая игра: сохранение стирается, уровень 0
    pub fn start_new_game(&mut self, store: &mut dyn ProgressStore) -> SimResult<RunTransition> {
        if let Err(err) = store.delete(PROGRESS_KEY) {
            crate::logger::log_error(&format!("Failed to clear progress: {}", err));
        }
        self.save_exists = false;
        self.complete = false;
        self.load(0)
    }

    pub fn continue_game(&mut self) -> SimResult<RunTransition> {
        self.complete = false;
        self.load(self.current_index)
    }

    /// Следующий уровень (с сохранением) или победа
    pub fn advance(&mut self, store: &mut dyn ProgressStore) -> RunTransition {
        let next = self.current_index + 1;
        if next < self.levels.len() {
            self.current_index = next;
            match store.save(PROGRESS_KEY, next as i32) {
                Ok(()) => self.save_exists = true,
                Err(err) => crate::logger::log_error(&format!("Failed to save progress: {}", err)),
            }
            return RunTransition::Load(self.levels[next].clone());
        }

        self.complete = true;
        self.save_exists = false;
        if let Err(err) = store.delete(PROGRESS_KEY) {
            crate::logger::log_error(&format!("Failed to clear progress: {}", err));
        }
        crate::logger::log_info("All levels complete");
        RunTransition::Victory
    }

    /// Перезагрузить текущий уровень (индекс не меняется)
    pub fn restart_current(&self) -> SimResult<RunTransition> {
        match (&self.current_level, self.levels.get(self.current_index)) {
            (Some(level), _) => Ok(RunTransition::Load(level.clone())),
            (None, Some(level)) => Ok(RunTransition::Load(level.clone())),
            (None, None) => Err(SimulationError::InvalidLevel {
                index: self.current_index,
                count: self.levels.len(),
            }),
        }
    }

    pub fn load(&mut self, index: usize) -> SimResult<RunTransition> {
        let level = self.levels.get(index).ok_or(SimulationError::InvalidLevel {
            index,
            count: self.levels.len(),
        })?;
        let level = level.clone();
        self.current_index = index;
        Ok(RunTransition::Load(level))
    }

    /// Выход в меню: индекс и сохранение не меняются
    pub fn return_to_main_menu(&mut self) -> RunTransition {
        self.complete = false;
        RunTransition::Load(self.main_menu.clone())
    }

    /// Запрос отправлен хосту. Загрузка снимает паузу.
    pub fn begin_load(&mut self, level: &str) {
        self.paused = false;
        self.loading = Some(level.to_owned());
    }

    /// Хост закончил загрузку. false для устаревших/неожиданных ответов.
    pub fn finish_load(&mut self, level: &str) -> bool {
        if self.loading.as_deref() != Some(level) {
            return false;
        }
        self.loading = None;
        self.current_level = Some(level.to_owned());
        true
    }
}
