//! Drives every enemy's behavior machine and carries out the side effects
//! it requests.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use glam::DVec2;
use signal_void_ai::fsm::{evaluate, stunned_velocity, AiAction, AiContext};
use signal_void_ai::profiles::get_profile;
use signal_void_core::components::{Invulnerable, Knockback};
use signal_void_core::constants::*;
use signal_void_core::types::{EntityId, Position};

use crate::ecs::{ComponentKind as K, World};
use crate::vfx::{self, Burst};
use crate::world_setup::spawn_enemy_projectile;

pub fn run(world: &mut World, rng: &mut ChaCha8Rng, player: EntityId) {
    let Some(&target) = world.positions.get(player) else {
        return;
    };
    let target_velocity = world.velocities.get(player).copied().unwrap_or_default();

    for id in world.query(&[K::Enemy, K::Position, K::Velocity, K::AiBehavior]) {
        let (Some(&position), Some(&velocity)) = (world.positions.get(id), world.velocities.get(id)) else {
            continue;
        };

        if let Some(stun) = world.stuns.get_mut(id) {
            if stun.frames > 0 {
                stun.frames -= 1;
                world.velocities.insert(id, stunned_velocity(velocity));
                continue;
            }
        }

        let ctx = AiContext {
            position,
            velocity,
            target,
            target_velocity,
        };
        let Some(ai) = world.ais.get_mut(id) else {
            continue;
        };
        let update = evaluate(ai, &ctx);
        world.velocities.insert(id, update.velocity);

        let base_color = world
            .enemies
            .get(id)
            .and_then(|e| get_profile(e.kind))
            .map(|p| p.color);
        if let (Some(rend), Some(base)) = (world.renderables.get_mut(id), base_color) {
            rend.color = update.tint.unwrap_or(base);
        }

        for action in update.actions {
            match action {
                AiAction::FireProjectile {
                    direction,
                    speed,
                    damage,
                } => {
                    spawn_enemy_projectile(world, position, direction, speed, damage, Some(id));
                }
                AiAction::SniperHitscan { aim, damage } => {
                    sniper_hitscan(world, rng, player, position, aim, damage);
                }
                AiAction::DashSpark => {
                    let vel = DVec2::new(rng.gen_range(-0.2..=0.2), rng.gen_range(-0.2..=0.2));
                    let glyph = ['>', '<', '*', '~'].choose(rng).copied().unwrap_or('*');
                    vfx::spawn_particle(world, position, vel, glyph, NEON_CYAN, 8, 0.0);
                }
            }
        }
    }
}

/// True while the player cannot take damage from enemy attacks.
pub fn player_protected(world: &World, player: EntityId) -> bool {
    let invulnerable = world.invulnerables.get(player).is_some_and(|i| i.frames > 0);
    let dashing = world.dashes.get(player).is_some_and(|d| d.is_dashing());
    invulnerable || dashing
}

/// Apply an enemy hit to the player: armor, health floor, i-frames and knockback.
pub fn damage_player(world: &mut World, player: EntityId, amount: i32, knockback: DVec2) {
    let (effective, iframes) = match world.stats.get(player) {
        Some(stats) => (stats.mitigate(amount), stats.invincibility_frames),
        None => (amount, DEFAULT_IFRAMES),
    };
    if let Some(health) = world.healths.get_mut(player) {
        health.current = (health.current - effective).max(0);
    }
    world.add(player, Invulnerable { frames: iframes });
    world.add(player, Knockback::new(knockback));
}

/// Resolve a sniper beam fired from `origin` along `aim`.
fn sniper_hitscan(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: EntityId,
    origin: Position,
    aim: DVec2,
    damage: i32,
) {
    if player_protected(world, player) {
        return;
    }
    let Some(&target) = world.positions.get(player) else {
        return;
    };
    if !signal_void_ai::ranged::beam_hits(origin, aim, target, SNIPER_BEAM_HALF_WIDTH) {
        return;
    }
    damage_player(world, player, damage, aim * SNIPER_KNOCKBACK);
    let burst = Burst {
        count: 8,
        colors: &[NEON_RED, WHITE],
        glyphs: &['!', '*', '+'],
        speed: (0.3, 0.8),
        lifetime: (6, 12),
        gravity: 0.0,
    };
    vfx::explosion(world, rng, target, &burst);
    log::debug!("sniper beam hit player for {damage}");
}
