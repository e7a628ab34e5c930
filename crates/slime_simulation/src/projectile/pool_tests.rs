//! Tests for projectile pool.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use super::super::pool::*;
    use crate::config::ProjectileTuning;
    use crate::projectile::launch_params;

    fn straight(speed: f32, ttl: f32) -> LaunchParams {
        LaunchParams { speed, ttl, motion: Motion::Straight }
    }

    #[test]
    fn test_prewarmed_pool_grows_only_past_capacity() {
        // 20 слотов, 25 acquire без release
        let mut pool = ProjectilePool::with_prewarm(PoolKind::Primary, 20);
        let handles: Vec<_> = (0..25).map(|_| pool.acquire()).collect();

        // Первые 20 - разные prewarm слоты
        for (i, handle) in handles.iter().take(20).enumerate() {
            assert_eq!(*handle, ProjectileHandle(i));
        }
        // 21-25 - рост пула
        for (i, handle) in handles.iter().enumerate().skip(20) {
            assert_eq!(*handle, ProjectileHandle(i));
        }

        assert_eq!(pool.len(), 25);
        assert_eq!(pool.active_count(), 25);
    }

    #[test]
    fn test_acquire_reuses_lowest_inactive_slot() {
        let mut pool = ProjectilePool::with_prewarm(PoolKind::Enemy, 3);
        let a = pool.acquire();
        let b = pool.acquire();
        let _c = pool.acquire();

        assert!(pool.release(b));
        assert!(pool.release(a));

        // Минимальный индекс среди неактивных
        assert_eq!(pool.acquire(), a);
        assert_eq!(pool.acquire(), b);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = ProjectilePool::new(PoolKind::Secondary);
        let handle = pool.acquire();

        assert!(pool.release(handle));
        assert!(!pool.release(handle));
        assert!(!pool.release(ProjectileHandle(99)));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_reset_keeps_slots() {
        let mut pool = ProjectilePool::with_prewarm(PoolKind::Primary, 2);
        for _ in 0..5 {
            pool.fire(Vec3::ZERO, Vec3::X, straight(10.0, 1.0));
        }
        assert_eq!(pool.len(), 5);

        pool.reset();

        assert_eq!(pool.len(), 5);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_projectile_moves_and_expires() {
        let mut pool = ProjectilePool::new(PoolKind::Primary);
        let handle = pool.fire(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), straight(20.0, 1.0));

        assert_eq!(pool.step(0.5), 0);
        let projectile = pool.get(handle).expect("slot exists");
        // direction нормализован: 20 м/с × 0.5 с
        assert!((projectile.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert!(projectile.is_active());

        assert_eq!(pool.step(0.5), 1);
        assert!(!pool.get(handle).expect("slot exists").is_active());

        // Неактивный не двигается
        let before = pool.get(handle).expect("slot exists").position;
        pool.step(1.0);
        assert_eq!(pool.get(handle).expect("slot exists").position, before);
    }

    #[test]
    fn test_spinning_projectile_rotates() {
        let tuning = ProjectileTuning::default();
        let mut pool = ProjectilePool::new(PoolKind::Secondary);
        let handle = pool.fire(Vec3::ZERO, Vec3::Z, launch_params(&tuning, PoolKind::Secondary));

        pool.step(1.0 / 60.0);
        pool.step(1.0 / 60.0);

        let projectile = pool.get(handle).expect("slot exists");
        let expected = Quat::from_rotation_y(10f32.to_radians());
        assert!(projectile.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_pools_factions() {
        let pools = ProjectilePools::new(1, 1, 1);
        assert_eq!(pools.pool(PoolKind::Primary).get(ProjectileHandle(0)).map(|p| p.faction),
            Some(crate::components::Faction::Player));
        assert_eq!(pools.pool(PoolKind::Enemy).get(ProjectileHandle(0)).map(|p| p.faction),
            Some(crate::components::Faction::Enemy));
    }
}
