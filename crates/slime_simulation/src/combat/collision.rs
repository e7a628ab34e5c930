//! Collision dispatch: (категория, категория) → эффект
//!
//! Хост присылает `Overlap{a, b}`; таблица применяется в обе стороны,
//! эффекты обеих сторон вычисляются ДО применения (снаряд, который
//! деактивируется, всё равно наносит урон в том же overlap).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::audio::{pick_clip, random_pitch, AudioCue, ClipId, MixerCommand, MixerGroup};
use crate::combat::damage::{apply_damage, DamageDealt, DamageOutcome, EntityDied};
use crate::combat::shield::{Shield, ShieldBarrier};
use crate::components::{BodyRef, ColliderCategory, Enemy, EnemyKind, Health, Lifecycle, Overlap, Patrol};
use crate::config::SimulationConfig;
use crate::encounter::{EncounterRoster, SpawnerController};
use crate::player::{PlayerBody, PlayerDefeated};
use crate::projectile::{PoolKind, ProjectilePools};
use crate::DeterministicRng;

/// Эффект на subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEffect {
    /// Вернуть снаряд в пул
    Deactivate,
    /// 1 урона без условий
    Damage,
    /// 1 урона, если entity уязвима к этому виду снаряда (`DamagedBy`)
    HitBy(PoolKind),
    /// Развернуть патруль
    ReverseDirection,
}

/// Какой вид снаряда игрока ранит врага
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamagedBy(pub PoolKind);

/// Таблица взаимодействий. Пары вне таблицы ничего не делают.
pub fn dispatch(subject: ColliderCategory, other: ColliderCategory) -> Option<CollisionEffect> {
    use ColliderCategory::*;

    match (subject, other) {
        (PlayerPrimary, Wall | Enemy | EnemyShield) => Some(CollisionEffect::Deactivate),
        (PlayerSecondary, Wall | EnemyShield | EnemySpawner) => Some(CollisionEffect::Deactivate),
        (EnemyProjectile, Wall | Player) => Some(CollisionEffect::Deactivate),
        (Player, Enemy | EnemyProjectile) => Some(CollisionEffect::Damage),
        (Enemy, PlayerPrimary) => Some(CollisionEffect::HitBy(PoolKind::Primary)),
        (Enemy, PlayerSecondary) => Some(CollisionEffect::HitBy(PoolKind::Secondary)),
        (Enemy, Wall) => Some(CollisionEffect::ReverseDirection),
        (EnemyShield | EnemySpawner, PlayerSecondary) => Some(CollisionEffect::Damage),
        _ => None,
    }
}

type Combatants<'w, 's> = Query<
    'w,
    's,
    (
        &'static ColliderCategory,
        Option<&'static mut Health>,
        Option<&'static mut Lifecycle>,
        Option<&'static Enemy>,
        Option<&'static DamagedBy>,
        Option<&'static mut Patrol>,
        Option<&'static Shield>,
        Option<&'static mut PlayerBody>,
    ),
>;

/// Всё, что меняется при попадании помимо самого combatant
#[derive(SystemParam)]
pub struct HitContext<'w, 's> {
    barriers: Query<'w, 's, &'static mut ShieldBarrier>,
    roster: ResMut<'w, EncounterRoster>,
    spawner: ResMut<'w, SpawnerController>,
    config: Res<'w, SimulationConfig>,
    rng: ResMut<'w, DeterministicRng>,
    cues: EventWriter<'w, AudioCue>,
    mixer: EventWriter<'w, MixerCommand>,
    dealt: EventWriter<'w, DamageDealt>,
    died: EventWriter<'w, EntityDied>,
    defeated: EventWriter<'w, PlayerDefeated>,
}

/// Категория тела; None для неактивных снарядов и неживых entities
fn category_of(body: BodyRef, pools: &ProjectilePools, combatants: &Combatants) -> Option<ColliderCategory> {
    match body {
        BodyRef::Wall => Some(ColliderCategory::Wall),
        BodyRef::Projectile(kind, handle) => pools
            .pool(kind)
            .get(handle)
            .filter(|projectile| projectile.is_active())
            .map(|_| kind.category()),
        BodyRef::Entity(entity) => {
            let (category, _, lifecycle, ..) = combatants.get(entity).ok()?;
            lifecycle
                .map_or(true, |lifecycle| lifecycle.is_alive())
                .then_some(*category)
        }
    }
}

/// System: разбор overlap событий от хоста
pub fn resolve_overlaps(
    mut overlaps: EventReader<Overlap>,
    mut pools: ResMut<ProjectilePools>,
    mut combatants: Combatants,
    mut ctx: HitContext,
) {
    for overlap in overlaps.read() {
        let (Some(category_a), Some(category_b)) = (
            category_of(overlap.a, &pools, &combatants),
            category_of(overlap.b, &pools, &combatants),
        ) else {
            continue;
        };

        let effects = [
            (overlap.a, category_a, dispatch(category_a, category_b)),
            (overlap.b, category_b, dispatch(category_b, category_a)),
        ];

        for (body, category, effect) in effects {
            let Some(effect) = effect else {
                continue;
            };
            match (effect, body) {
                (CollisionEffect::Deactivate, BodyRef::Projectile(kind, handle)) => {
                    pools.pool_mut(kind).release(handle);
                }
                (CollisionEffect::ReverseDirection, BodyRef::Entity(entity)) => {
                    if let Ok((.., Some(mut patrol), _, _)) = combatants.get_mut(entity) {
                        patrol.reverse();
                    }
                }
                (CollisionEffect::HitBy(kind), BodyRef::Entity(entity)) => {
                    let vulnerable = matches!(
                        combatants.get(entity),
                        Ok((_, _, _, _, Some(damaged_by), ..)) if damaged_by.0 == kind
                    );
                    if vulnerable {
                        hit_enemy(entity, &mut combatants, &mut ctx);
                    }
                }
                (CollisionEffect::Damage, BodyRef::Entity(entity)) => {
                    match category {
                        ColliderCategory::Player => hit_player(entity, &mut combatants, &mut ctx),
                        ColliderCategory::EnemyShield | ColliderCategory::EnemySpawner => {
                            hit_structure(entity, &mut combatants, &mut ctx)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
}

fn hit_enemy(entity: Entity, combatants: &mut Combatants, ctx: &mut HitContext) {
    let Ok((_, Some(mut health), Some(mut lifecycle), Some(enemy), _, patrol, _, _)) = combatants.get_mut(entity)
    else {
        return;
    };
    let kind = enemy.kind;
    let shields_up = ctx.barriers.get(entity).is_ok_and(|barrier| barrier.is_up());

    match apply_damage(&mut health, &mut lifecycle, 1, shields_up, ctx.config.removal_delay) {
        DamageOutcome::Blocked => {
            crate::logger::log("Shields are still up!");
        }
        DamageOutcome::Ignored => {
            crate::logger::log(&format!("{:?} already dying, hit ignored", entity));
        }
        DamageOutcome::Damaged { remaining } => {
            ctx.dealt.write(DamageDealt { target: entity, remaining });
            if kind == EnemyKind::Boss {
                if let Some(mut patrol) = patrol {
                    patrol.speed += 1.0;
                }
            }
            let pitch = random_pitch(&mut ctx.rng.rng, &ctx.config.audio);
            let clip = match kind {
                EnemyKind::Boss => pick_clip(&mut ctx.rng.rng, ctx.config.boss.damage_clips).map(ClipId::BossDamage),
                EnemyKind::Flyer => Some(ClipId::FlyerDamage),
                EnemyKind::Minion => None,
            };
            if let Some(clip) = clip {
                ctx.cues.write(AudioCue::play(clip, pitch));
            }
        }
        DamageOutcome::Killed => {
            ctx.dealt.write(DamageDealt { target: entity, remaining: 0 });
            ctx.roster.remove_enemy(entity);
            ctx.died.write(EntityDied {
                entity,
                category: ColliderCategory::Enemy,
            });
            let clip = match kind {
                EnemyKind::Boss => ClipId::BossDeath,
                EnemyKind::Flyer => ClipId::FlyerDeath,
                EnemyKind::Minion => ClipId::MinionDeath,
            };
            ctx.cues.write(AudioCue::play(clip, 1.0));
            crate::logger::log_info(&format!("{:?} {:?} killed", kind, entity));
        }
    }
}

/// Щит или точка спавна: удаляются сразу при 0 hp
fn hit_structure(entity: Entity, combatants: &mut Combatants, ctx: &mut HitContext) {
    let Ok((category, Some(mut health), Some(mut lifecycle), _, _, _, shield, _)) = combatants.get_mut(entity) else {
        return;
    };
    let category = *category;
    let owner = shield.map(|shield| shield.owner);

    match apply_damage(&mut health, &mut lifecycle, 1, false, 0.0) {
        DamageOutcome::Damaged { remaining } => {
            ctx.dealt.write(DamageDealt { target: entity, remaining });
        }
        DamageOutcome::Killed => {
            ctx.dealt.write(DamageDealt { target: entity, remaining: 0 });
            match category {
                ColliderCategory::EnemyShield => {
                    if let Some(mut barrier) = owner.and_then(|owner| ctx.barriers.get_mut(owner).ok()) {
                        barrier.remove(entity);
                        crate::logger::log(&format!("Shield broken, {} remaining", barrier.remaining_count()));
                    }
                }
                ColliderCategory::EnemySpawner => {
                    ctx.roster.remove_spawner(entity);
                    ctx.spawner.remove_point(entity);
                    crate::logger::log(&format!("Spawner {:?} destroyed", entity));
                }
                _ => {}
            }
            ctx.died.write(EntityDied { entity, category });
        }
        DamageOutcome::Blocked | DamageOutcome::Ignored => {}
    }
}

fn hit_player(entity: Entity, combatants: &mut Combatants, ctx: &mut HitContext) {
    let Ok((_, Some(mut health), _, _, _, _, _, Some(mut body))) = combatants.get_mut(entity) else {
        return;
    };
    if !body.can_move || !health.is_alive() {
        return;
    }

    health.take_damage(1);
    ctx.dealt.write(DamageDealt {
        target: entity,
        remaining: health.current,
    });

    if health.is_alive() {
        let pitch = random_pitch(&mut ctx.rng.rng, &ctx.config.audio);
        ctx.cues.write(AudioCue::play(ClipId::PlayerDamage, pitch));
        return;
    }

    body.can_move = false;
    ctx.defeated.write(PlayerDefeated { player: entity });
    ctx.cues.write(AudioCue::play(ClipId::PlayerDeath, 1.0));
    ctx.cues.write(AudioCue::one_shot(ClipId::GameOver));
    ctx.mixer.write(MixerCommand {
        group: MixerGroup::Enemies,
        muted: true,
    });
    crate::logger::log_info("Player defeated");
}
