//! Tests for damage rules.

#[cfg(test)]
mod tests {
    use super::super::damage::*;
    use crate::components::{Health, Lifecycle};

    #[test]
    fn test_damage_until_death() {
        let mut health = Health::new(3);
        let mut lifecycle = Lifecycle::Alive;

        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 1.0),
            DamageOutcome::Damaged { remaining: 2 }
        );
        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 1.0),
            DamageOutcome::Damaged { remaining: 1 }
        );
        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 1.0),
            DamageOutcome::Killed
        );
        assert_eq!(lifecycle, Lifecycle::Dying { remaining: 1.0 });
    }

    #[test]
    fn test_shields_block_damage() {
        let mut health = Health::new(20);
        let mut lifecycle = Lifecycle::Alive;

        for _ in 0..5 {
            assert_eq!(
                apply_damage(&mut health, &mut lifecycle, 1, true, 1.0),
                DamageOutcome::Blocked
            );
        }
        assert_eq!(health.current, 20);
        assert!(lifecycle.is_alive());
    }

    #[test]
    fn test_dying_ignores_further_hits() {
        let mut health = Health::new(1);
        let mut lifecycle = Lifecycle::Alive;

        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 0.5),
            DamageOutcome::Killed
        );
        // Второй снаряд в том же шаге - не второе убийство
        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 0.5),
            DamageOutcome::Ignored
        );
        assert_eq!(lifecycle, Lifecycle::Dying { remaining: 0.5 });
    }

    #[test]
    fn test_zero_delay_removes_immediately() {
        let mut health = Health::new(1);
        let mut lifecycle = Lifecycle::Alive;

        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 1, false, 0.0),
            DamageOutcome::Killed
        );
        assert_eq!(lifecycle, Lifecycle::Removed);
    }

    #[test]
    fn test_overkill_saturates() {
        let mut health = Health::new(2);
        let mut lifecycle = Lifecycle::Alive;

        assert_eq!(
            apply_damage(&mut health, &mut lifecycle, 50, false, 1.0),
            DamageOutcome::Killed
        );
        assert_eq!(health.current, 0);
    }
}
