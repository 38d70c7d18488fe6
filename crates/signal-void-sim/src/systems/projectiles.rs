//! Projectile flight: range, walls and hits for both sides.
//!
//! Movement itself happens in the kinematics stage; these systems only
//! resolve what a projectile touched after it moved.

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{Knockback, Stunned};
use signal_void_core::constants::*;
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::EntityId;

use crate::config::ArenaBounds;
use crate::ecs::{ComponentKind as K, World};
use crate::systems::ai::{damage_player, player_protected};
use crate::vfx::{self, Burst};
use crate::weapons::weapon_spec;

/// Advance player projectiles: range, walls, then enemy hits.
pub fn player_projectiles(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    arena: &ArenaBounds,
    player: Option<EntityId>,
    feedback: &mut Vec<FeedbackEvent>,
) {
    let stats = player.and_then(|p| world.stats.get(p)).cloned();
    let (w, h) = (arena.width_f(), arena.height_f());

    for shot in world.query(&[K::Projectile, K::Position, K::Velocity]) {
        let (Some(&pos), Some(&vel)) = (world.positions.get(shot), world.velocities.get(shot)) else {
            continue;
        };
        let speed = vel.speed();
        let Some(proj) = world.projectiles.get_mut(shot) else {
            continue;
        };
        proj.distance_traveled += speed;
        let color = proj.color;

        if proj.distance_traveled >= proj.max_range {
            vfx::scatter(world, rng, pos, 3, 0.3, color, &['.', '*', '+'], (5, 10), 0.0);
            world.destroy(shot);
            continue;
        }
        if pos.x < 1.0 || pos.x > w - 2.0 || pos.y < 1.0 || pos.y > h - 2.0 {
            vfx::scatter(world, rng, pos, 4, 0.5, color, &['*', '+', 'x'], (6, 12), 0.05);
            world.destroy(shot);
            continue;
        }

        let heading = if speed > 0.0 { vel.as_vec() / speed } else { DVec2::ZERO };
        for enemy in world.query(&[K::Enemy, K::Position, K::Health]) {
            let Some(proj) = world.projectiles.get(shot) else {
                break;
            };
            if proj.hit_entities.contains(&enemy) {
                continue;
            }
            if world.invulnerables.get(enemy).is_some_and(|i| i.frames > 0) {
                continue;
            }
            let Some(&target) = world.positions.get(enemy) else {
                continue;
            };
            if pos.distance_to(&target) >= PROJECTILE_HIT_RADIUS {
                continue;
            }
            let (base, knockback, stun, piercing) =
                (proj.damage, proj.knockback, proj.stun_frames, proj.piercing);

            let mut damage = base;
            let mut crit = false;
            if let Some(stats) = &stats {
                damage = (damage as f64 * stats.damage_multiplier) as i32;
                if rng.gen::<f64>() < stats.crit_chance {
                    damage = (damage as f64 * stats.crit_damage_multiplier) as i32;
                    crit = true;
                }
            }

            if let Some(health) = world.healths.get_mut(enemy) {
                health.current -= damage;
            }
            if let Some(flash) = world.hit_flashes.get_mut(enemy) {
                flash.frames = HIT_FLASH_TICKS;
            }
            if stun > 0 {
                let frames = world.stuns.get(enemy).map_or(stun, |s| s.frames.max(stun));
                world.add(enemy, Stunned { frames });
            }
            world.add(enemy, Knockback::with_decay(heading * knockback, KNOCKBACK_DECAY));

            feedback.push(FeedbackEvent::HitStop { frames: 2 });
            feedback.push(FeedbackEvent::Shake {
                intensity: 1,
                frames: 3,
            });
            if speed > 0.0 {
                let (count, colors): (u32, &[u8]) = if crit {
                    (8, &[NEON_YELLOW, WHITE, NEON_RED])
                } else {
                    (5, &[color, WHITE, NEON_YELLOW])
                };
                vfx::directional_burst(world, rng, target, heading, count, 0.6, colors, &['*', '+', 'x', '.']);
            }

            if !piercing {
                world.destroy(shot);
                break;
            }
            if let Some(proj) = world.projectiles.get_mut(shot) {
                proj.hit_entities.push(enemy);
            }
        }
    }
}

/// Advance enemy projectiles: walls, deflection by an active swing, then
/// player hits.
pub fn enemy_projectiles(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    arena: &ArenaBounds,
    player: EntityId,
    feedback: &mut Vec<FeedbackEvent>,
) {
    let Some(&ppos) = world.positions.get(player) else {
        return;
    };
    let (w, h) = (arena.width_f(), arena.height_f());

    let swing = world.attacks.get(player).filter(|a| a.active && !a.is_beam).and_then(|a| {
        let melee = world
            .inventories
            .get(player)
            .and_then(|inv| inv.active())
            .is_some_and(|weapon| weapon_spec(weapon.kind).pattern.is_melee());
        melee.then(|| a.direction())
    });

    for bolt in world.query(&[K::EnemyProjectile, K::Position]) {
        let (Some(&pos), Some(&payload)) = (world.positions.get(bolt), world.enemy_projectiles.get(bolt))
        else {
            continue;
        };
        if pos.x < 1.0 || pos.x > w - 1.0 || pos.y < 1.0 || pos.y > h - 1.0 {
            world.destroy(bolt);
            continue;
        }

        let offset = pos.offset_to(&ppos);
        let dist = offset.length();

        if let Some(dir) = swing {
            let toward = -offset;
            if dist < SWING_DEFLECT_RANGE && dist > 0.0 && (toward / dist).dot(dir) > MELEE_CONE_DOT {
                world.destroy(bolt);
                let jitter = DVec2::new(rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3));
                vfx::spawn_particle(world, pos, jitter, '*', NEON_YELLOW, 6, 0.0);
                log::trace!("deflected {bolt}");
                continue;
            }
        }

        if dist < PROJECTILE_HIT_RADIUS && !player_protected(world, player) {
            let push = if dist > 0.0 {
                offset / dist * ENEMY_PROJECTILE_KNOCKBACK
            } else {
                DVec2::new(0.0, -ENEMY_PROJECTILE_KNOCKBACK)
            };
            damage_player(world, player, payload.damage, push);
            feedback.push(FeedbackEvent::Shake {
                intensity: 1,
                frames: 3,
            });
            let burst = Burst {
                count: 4,
                colors: &[NEON_RED, NEON_YELLOW],
                glyphs: &['!', '*'],
                speed: (0.2, 0.5),
                lifetime: (6, 12),
                gravity: 0.0,
            };
            vfx::explosion(world, rng, ppos, &burst);
            world.destroy(bolt);
        }
    }
}
