//! Entity spawn factories.
//!
//! Each factory attaches a complete component bundle to a fresh id, so no
//! system ever observes a half-built player, enemy or telegraph.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_ai::profiles::{build_behavior, get_profile};
use signal_void_core::components::*;
use signal_void_core::constants::*;
use signal_void_core::enums::{EnemyKind, WeaponKind};
use signal_void_core::types::{EntityId, Position, Velocity};

use crate::ecs::World;
use crate::vfx;
use crate::weapons::create_weapon;

/// Spawn the player with a fresh run's stats and a Slash.
pub fn spawn_player(world: &mut World, pos: Position) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::default());
    world.add(id, Friction {
        factor: PLAYER_FRICTION,
    });
    world.add(id, MaxSpeed {
        value: PLAYER_MAX_SPEED,
    });
    world.add(id, CollisionBox::solid(1.0, 1.0));
    world.add(id, Renderable::new('@', NEON_CYAN, 10));
    world.add(id, GhostTrail::default());
    world.add(id, HitFlash::default());
    world.add(
        id,
        PlayerControlled {
            acceleration: PLAYER_ACCELERATION,
            last_move_x: 1.0,
            last_move_y: 0.0,
        },
    );
    world.add(id, DashState::default());
    world.add(id, AttackState::default());
    world.add(id, Health::new(PLAYER_HEALTH));
    world.add(id, SyntaxBuffer::new(PLAYER_BUFFER_SLOTS));
    world.add(id, PlayerStats::default());
    world.add(
        id,
        WeaponInventory {
            weapons: vec![create_weapon(WeaponKind::Slash)],
            active_index: 0,
        },
    );
    world.add(id, Player);
    log::debug!("player {id} spawned at ({:.1}, {:.1})", pos.x, pos.y);
    id
}

/// The first entity carrying the player tag.
pub fn find_player(world: &World) -> Option<EntityId> {
    world.players.keys().find(|id| world.is_alive(*id))
}

/// Spawn an enemy of `kind`. Types without a factory return `None`.
pub fn spawn_enemy(world: &mut World, rng: &mut ChaCha8Rng, kind: EnemyKind, pos: Position) -> Option<EntityId> {
    let profile = get_profile(kind)?;
    let initial_timer = profile
        .initial_timer
        .map(|(lo, hi)| rng.gen_range(lo..=hi))
        .unwrap_or(0.0);

    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::default());
    world.add(id, Friction {
        factor: profile.friction,
    });
    world.add(id, MaxSpeed {
        value: profile.max_speed,
    });
    world.add(id, CollisionBox::solid(1.0, 1.0));
    world.add(id, Renderable::new(profile.glyph, profile.color, 5));
    world.add(id, Health::new(profile.health));
    world.add(
        id,
        ContactDamage {
            amount: profile.contact_damage,
            knockback_force: profile.contact_knockback,
        },
    );
    if let Some(force) = profile.shield_knockback {
        world.add(
            id,
            Shield {
                active: true,
                blocks_damage: true,
                causes_knockback: true,
                knockback_force: force,
            },
        );
    }
    world.add(id, build_behavior(kind, &profile, initial_timer));
    world.add(id, SyntaxDrop::new(profile.drop_verb, profile.drop_condition));
    world.add(id, HitFlash::default());
    world.add(id, Enemy { kind });
    log::debug!("{kind:?} {id} spawned at ({:.1}, {:.1})", pos.x, pos.y);
    Some(id)
}

/// Scale a freshly spawned enemy for `depth`. Depth 1 is the baseline.
pub fn apply_depth_scaling(world: &mut World, id: EntityId, depth: u32) {
    if depth <= 1 {
        return;
    }
    let steps = (depth - 1) as f64;

    if depth > 10 {
        if let Some(health) = world.healths.get_mut(id) {
            let scaled = (health.maximum as f64 * 1.08f64.powi((depth - 10) as i32)) as i32;
            health.maximum = health.maximum.max(scaled);
            health.current = health.maximum;
        }
    }

    let damage_mult = 1.0 + steps * 0.08;
    if let Some(contact) = world.contact_damages.get_mut(id) {
        contact.amount = contact.amount.max((contact.amount as f64 * damage_mult) as i32);
    }

    let speed_mult = 1.0 + steps * 0.03;
    if let Some(ai) = world.ais.get_mut(id) {
        ai.move_speed *= speed_mult;
    }
    if let Some(max) = world.max_speeds.get_mut(id) {
        max.value *= speed_mult;
    }
}

/// Warning marker that becomes an enemy of `kind` after the telegraph countdown.
pub fn spawn_telegraph(world: &mut World, kind: EnemyKind, pos: Position, depth: u32) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(
        id,
        SpawnTelegraph {
            kind,
            frames_remaining: TELEGRAPH_TICKS,
            total_frames: TELEGRAPH_TICKS,
            depth,
        },
    );
    world.add(id, Renderable::new('×', NEON_RED, 3));
    id
}

/// Replace an expired telegraph with its enemy: depth scaling, spawn
/// invulnerability and a burst.
pub fn materialize(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    kind: EnemyKind,
    pos: Position,
    depth: u32,
) -> Option<EntityId> {
    let id = spawn_enemy(world, rng, kind, pos)?;
    apply_depth_scaling(world, id, depth);
    world.add(id, Invulnerable {
        frames: SPAWN_IFRAMES,
    });
    vfx::explosion(world, rng, pos, &vfx::SPAWN_BURST);
    Some(id)
}

pub fn spawn_enemy_projectile(
    world: &mut World,
    pos: Position,
    dir: DVec2,
    speed: f64,
    damage: i32,
    owner: Option<EntityId>,
) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::from_vec(dir * speed));
    world.add(id, Renderable::new('·', NEON_YELLOW, 6));
    world.add(id, Lifetime {
        frames: ENEMY_PROJECTILE_LIFETIME,
    });
    world.add(id, CollisionBox::trigger(0.8, 0.8));
    world.add(
        id,
        EnemyProjectile {
            damage,
            owner,
            speed,
        },
    );
    id
}
