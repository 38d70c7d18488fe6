//! Hit resolution: player melee and beam attacks against enemies, and enemy
//! contact damage against the player.

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{Archetype, Knockback, Weapon};
use signal_void_core::constants::*;
use signal_void_core::enums::{AiState, EnemyKind, WeaponKind};
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::types::{EntityId, Position};

use crate::ecs::{ComponentKind as K, World};
use crate::systems::ai::{damage_player, player_protected};
use crate::vfx::{self, Burst};
use crate::weapons::{self, weapon_spec};
use crate::{mods, verbs};

/// How a single weapon hit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strike {
    Blocked,
    Clean,
    Backstab,
}

/// Resolve the player's active melee swing or beam against every enemy.
pub fn player_attacks(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
) {
    let (Some(&origin), Some(attack)) = (world.positions.get(player), world.attacks.get(player))
    else {
        return;
    };
    if !attack.active {
        return;
    }
    let dir = attack.direction();
    let continuous = attack.beam_continuous_frames;

    let weapon: Weapon = world
        .inventories
        .get(player)
        .and_then(|inv| inv.active())
        .cloned()
        .unwrap_or_else(|| weapons::create_weapon(WeaponKind::Slash));
    let spec = weapon_spec(weapon.kind);
    if !(spec.pattern.is_melee() || spec.pattern.is_beam()) {
        return;
    }
    let is_beam = spec.pattern.is_beam();
    let params = mods::attack_params(&weapon, spec);

    let stats = world.stats.get(player).cloned().unwrap_or_default();
    let size = stats.attack_size_multiplier;
    let beams = weapons::beam_directions(dir, spec);

    for enemy in world.query(&[K::Enemy, K::Position, K::Health]) {
        if world.invulnerables.get(enemy).is_some_and(|i| i.frames > 0) {
            continue;
        }
        let Some(&target) = world.positions.get(enemy) else {
            continue;
        };
        let reached = if is_beam {
            beams
                .iter()
                .any(|&d| weapons::beam_reaches(origin, d, target, spec.beam_range * size))
        } else {
            weapons::melee_reaches(origin, dir, target, spec.radius * size)
        };
        if !reached {
            continue;
        }

        let strike = shield_check(world, enemy, dir, is_beam || params.ignore_shield);
        if strike == Strike::Blocked {
            shield_block(world, rng, feedback, player, origin, enemy, target, dir);
            break;
        }

        let mut damage = (params.damage as f64 * stats.damage_multiplier) as i32;
        let crit = spec.auto_crit || rng.gen::<f64>() < stats.crit_chance;
        if crit {
            damage = (damage as f64 * stats.crit_damage_multiplier) as i32;
        }
        if let Some(mult) = world.attack_multipliers.get_mut(player) {
            damage = (damage as f64 * mult.damage_multiplier * mult.hits as f64) as i32;
            mult.uses_remaining = mult.uses_remaining.saturating_sub(1);
            if mult.uses_remaining == 0 {
                world.attack_multipliers.remove(player);
            }
        }

        land_hit(world, enemy, origin, target, dir, damage, params.knockback);
        if strike == Strike::Backstab {
            if let Some(drop) = world.drops.get_mut(enemy) {
                drop.backstabbed = true;
            }
        }
        mods::on_hit(world, rng, feedback, player, enemy, target, damage, dir);

        if is_beam {
            if spec.overcharge_frames > 0 && continuous >= spec.overcharge_frames {
                if let Some(health) = world.healths.get_mut(enemy) {
                    health.current -= damage;
                }
            }
            let jitter = DVec2::new(rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3));
            let glyph = *['*', '+', '~'].choose(rng).unwrap_or(&'*');
            let life = rng.gen_range(4..=8);
            vfx::spawn_particle(world, target, jitter, glyph, NEON_MAGENTA, life, 0.0);
            continue;
        }

        feedback.push(FeedbackEvent::HitStop {
            frames: 3 + spec.hit_stop_frames,
        });
        feedback.push(FeedbackEvent::Shake {
            intensity: if spec.screen_shake_on_hit { 3 } else { 2 },
            frames: 4,
        });
        let (count, colors, glyphs): (u32, &[u8], &[char]) = if crit {
            (10, &[NEON_YELLOW, WHITE, NEON_RED], &['!', '*', '+', 'x', '#'])
        } else if strike == Strike::Backstab {
            (8, &[NEON_RED, NEON_YELLOW, WHITE], &['*', '+', 'x'])
        } else {
            (6, &[WHITE, NEON_CYAN, NEON_YELLOW], &['*', '+', 'x'])
        };
        vfx::directional_burst(world, rng, target, dir, count, 0.6, colors, glyphs);
        if let Some(attack) = world.attacks.get_mut(player) {
            attack.active = false;
        }
        log::debug!("{enemy} took {damage}{}", if crit { " (crit)" } else { "" });
        break;
    }
}

/// Classify a hit against a possibly shielded enemy. Beams and `sudo`
/// pass straight through; a shield only blocks hits into its front face.
fn shield_check(world: &World, enemy: EntityId, dir: DVec2, bypass: bool) -> Strike {
    if bypass {
        return Strike::Clean;
    }
    let Some(shield) = world.shields.get(enemy) else {
        return Strike::Clean;
    };
    if !(shield.active && shield.blocks_damage) {
        return Strike::Clean;
    }
    let Some(ai) = world.ais.get(enemy) else {
        return Strike::Clean;
    };
    // A swing travelling against the facing lands on the shield.
    if dir.dot(ai.facing()) < SHIELD_BLOCK_DOT {
        Strike::Blocked
    } else {
        Strike::Backstab
    }
}

#[allow(clippy::too_many_arguments)]
fn shield_block(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
    origin: Position,
    enemy: EntityId,
    target: Position,
    dir: DVec2,
) {
    let force = world.shields.get(enemy).map_or(0.0, |s| {
        if s.causes_knockback {
            s.knockback_force
        } else {
            0.0
        }
    });
    let offset = origin.offset_to(&target);
    let dist = offset.length();
    if force > 0.0 && dist > 0.0 {
        world.add(player, Knockback::new(-offset / dist * force));
    }
    feedback.push(FeedbackEvent::Shake {
        intensity: 1,
        frames: 3,
    });
    feedback.push(FeedbackEvent::HitStop { frames: 2 });
    vfx::directional_burst(
        world,
        rng,
        target,
        -dir,
        4,
        0.5,
        &[NEON_YELLOW, WHITE],
        &['!', '*', 'x'],
    );
    if let Some(ai) = world.ais.get_mut(enemy) {
        ai.shield_stagger = SHIELD_STAGGER_TICKS;
    }
    if let Some(attack) = world.attacks.get_mut(player) {
        attack.active = false;
    }
    log::debug!("{enemy} blocked the swing");
}

fn land_hit(
    world: &mut World,
    enemy: EntityId,
    origin: Position,
    target: Position,
    dir: DVec2,
    damage: i32,
    knockback: f64,
) {
    if let Some(health) = world.healths.get_mut(enemy) {
        health.current -= damage;
    }
    if let Some(flash) = world.hit_flashes.get_mut(enemy) {
        flash.frames = HIT_FLASH_TICKS;
    }
    let offset = origin.offset_to(&target);
    let dist = offset.length();
    let push = if dist > 0.0 { offset / dist } else { dir };
    world.add(enemy, Knockback::with_decay(push * knockback, KNOCKBACK_DECAY));
}

/// Enemy bodies hurt the player on overlap. At most one contact lands per tick.
pub fn contact(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: EntityId,
    events: &mut Vec<SimEvent>,
    feedback: &mut Vec<FeedbackEvent>,
) {
    if player_protected(world, player) {
        return;
    }
    let (Some(&ppos), Some(&pbox)) = (world.positions.get(player), world.collision_boxes.get(player))
    else {
        return;
    };

    for enemy in world.query(&[K::Enemy, K::Position, K::CollisionBox, K::ContactDamage]) {
        let (Some(&epos), Some(&ebox), Some(&contact), Some(tag)) = (
            world.positions.get(enemy),
            world.collision_boxes.get(enemy),
            world.contact_damages.get(enemy),
            world.enemies.get(enemy),
        ) else {
            continue;
        };
        let overlap_x = (ppos.x + pbox.offset_x - epos.x - ebox.offset_x).abs()
            < (pbox.width + ebox.width) / 2.0;
        let overlap_y = (ppos.y + pbox.offset_y - epos.y - ebox.offset_y).abs()
            < (pbox.height + ebox.height) / 2.0;
        if !(overlap_x && overlap_y) {
            continue;
        }
        let kind = tag.kind;

        let offset = epos.offset_to(&ppos);
        let dist = offset.length();
        let push = if dist > 0.0 {
            offset / dist * contact.knockback_force
        } else {
            DVec2::new(0.0, -contact.knockback_force)
        };
        damage_player(world, player, contact.amount, push);
        feedback.push(FeedbackEvent::Shake {
            intensity: 2,
            frames: 5,
        });
        feedback.push(FeedbackEvent::HitStop { frames: 2 });
        let burst = Burst {
            count: 8,
            colors: &[NEON_RED, NEON_YELLOW, WHITE],
            glyphs: &['*', '+', 'x'],
            speed: (0.3, 0.8),
            lifetime: (10, 20),
            gravity: 0.05,
        };
        vfx::explosion(world, rng, ppos, &burst);

        if kind == EnemyKind::BufferLeak {
            if let Some(verb) = verbs::pop_verb(world, player) {
                events.push(SimEvent::VerbRemoved { verb });
                feedback.push(FeedbackEvent::Shake {
                    intensity: 1,
                    frames: 3,
                });
            }
        }
        if let Some(ai) = world.ais.get_mut(enemy) {
            if ai.state == AiState::Attack {
                if let Archetype::Charge(charge) = &mut ai.archetype {
                    charge.contact_this_dash = true;
                }
            }
        }
        log::debug!("{kind:?} {enemy} hit the player for {}", contact.amount);
        break;
    }
}
