//! Boss phase - ускорение стрельбы после потери половины щитов

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BossPhase {
    /// Текущий интервал между плевками (секунды)
    pub fire_interval: f32,
    /// Доля baseline, при которой включается фаза
    pub threshold: f32,
    /// Множитель интервала (0.75 = на четверть быстрее)
    pub scale: f32,
    triggered: bool,
}

impl BossPhase {
    pub fn new(fire_interval: f32, threshold: f32, scale: f32) -> Self {
        Self {
            fire_interval,
            threshold,
            scale,
            triggered: false,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Проверка порога. Возвращает true только на шаге срабатывания.
    ///
    /// Срабатывает не более одного раза за encounter; baseline = 0 срабатывает сразу.
    pub fn update(&mut self, remaining: usize, baseline: usize) -> bool {
        if self.triggered {
            return false;
        }
        if remaining as f32 <= self.threshold * baseline as f32 {
            self.triggered = true;
            self.fire_interval *= self.scale;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_triggers_at_half() {
        let mut phase = BossPhase::new(1.0, 0.5, 0.75);

        for remaining in (6..=10).rev() {
            assert!(!phase.update(remaining, 10));
        }
        assert_eq!(phase.fire_interval, 1.0);

        assert!(phase.update(5, 10));
        assert_eq!(phase.fire_interval, 0.75);

        // Не мультипликативно: дальнейшие потери не ускоряют снова
        for remaining in (0..5).rev() {
            assert!(!phase.update(remaining, 10));
        }
        assert_eq!(phase.fire_interval, 0.75);
    }

    #[test]
    fn test_phase_ignores_threshold_recrossing() {
        let mut phase = BossPhase::new(1.0, 0.5, 0.75);

        // Счётчик пересекает порог вниз и вверх несколько раз
        let fired: Vec<bool> = [5, 6, 5, 4, 6]
            .into_iter()
            .map(|remaining| phase.update(remaining, 10))
            .collect();

        assert_eq!(fired, vec![true, false, false, false, false]);
        assert_eq!(phase.fire_interval, 0.75);
        assert!(phase.is_triggered());
    }

    #[test]
    fn test_zero_baseline_triggers_immediately() {
        let mut phase = BossPhase::new(2.0, 0.5, 0.75);
        assert!(phase.update(0, 0));
        assert_eq!(phase.fire_interval, 1.5);
        assert!(phase.is_triggered());
    }
}
