//! Weapon mods: the static table, attack parameter hooks and the
//! per-tick passive systems (echoes, hazards, auto-fire, homing, shockwaves).

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{
    AutoFire, EchoStrike, GroundHazard, Knockback, Lifetime, Renderable, Shockwave, Weapon,
};
use signal_void_core::constants::*;
use signal_void_core::enums::{AttackPattern, ModKind, Rarity};
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::{rotate, EntityId, Position, Velocity};

use crate::ecs::{ComponentKind as K, World};
use crate::vfx::{self, Burst};
use crate::weapons::{self, WeaponSpec};

#[derive(Debug, Clone, Copy)]
pub struct ModSpec {
    pub kind: ModKind,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub color: u8,
}

pub static MODS: [ModSpec; 9] = [
    ModSpec {
        kind: ModKind::Recursive,
        name: "--recursive",
        description: "Hits echo once at 50% damage",
        rarity: Rarity::Common,
        color: NEON_CYAN,
    },
    ModSpec {
        kind: ModKind::Force,
        name: "--force",
        description: "3x knockback on attacks",
        rarity: Rarity::Common,
        color: NEON_RED,
    },
    ModSpec {
        kind: ModKind::Verbose,
        name: "--verbose",
        description: "Attacks leave damaging trail (2s)",
        rarity: Rarity::Common,
        color: NEON_ORANGE,
    },
    ModSpec {
        kind: ModKind::Async,
        name: "--async",
        description: "Auto-fires every 1.5s while moving",
        rarity: Rarity::Rare,
        color: NEON_GREEN,
    },
    ModSpec {
        kind: ModKind::Grep,
        name: "--grep",
        description: "Projectiles home toward enemies",
        rarity: Rarity::Common,
        color: NEON_YELLOW,
    },
    ModSpec {
        kind: ModKind::Tee,
        name: "| tee",
        description: "On kill, fires attack in random dir",
        rarity: Rarity::Rare,
        color: WHITE,
    },
    ModSpec {
        kind: ModKind::Parallel,
        name: "--parallel",
        description: "+1 projectile or +30 degree arc",
        rarity: Rarity::Common,
        color: NEON_MAGENTA,
    },
    ModSpec {
        kind: ModKind::Cron,
        name: "--cron",
        description: "Every 5th hit deals 3x damage",
        rarity: Rarity::Rare,
        color: NEON_YELLOW,
    },
    ModSpec {
        kind: ModKind::Sudo,
        name: "--sudo",
        description: "Attacks bypass shields",
        rarity: Rarity::Rare,
        color: NEON_RED,
    },
];

pub fn mod_spec(kind: ModKind) -> &'static ModSpec {
    MODS.iter().find(|m| m.kind == kind).unwrap_or(&MODS[0])
}

/// Random mod, commons weighted three to one.
pub fn offer_mod(rng: &mut ChaCha8Rng) -> ModKind {
    let mut pool = Vec::with_capacity(MODS.len() * 3);
    for spec in &MODS {
        let weight = if spec.rarity == Rarity::Common { 3 } else { 1 };
        pool.extend(std::iter::repeat(spec.kind).take(weight));
    }
    pool.choose(rng).copied().unwrap_or(ModKind::Recursive)
}

/// Attach `m`, replacing the first slot when the weapon is full.
pub fn attach(weapon: &mut Weapon, m: ModKind) {
    if weapon.mods.len() < weapon.mod_slots {
        weapon.mods.push(m);
    } else if let Some(first) = weapon.mods.first_mut() {
        *first = m;
    }
}

/// Per-attack numbers after mod parameter hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackParams {
    pub damage: i32,
    pub knockback: f64,
    pub projectile_count: u32,
    pub arc_angle: f64,
    pub ignore_shield: bool,
}

pub fn attack_params(weapon: &Weapon, spec: &WeaponSpec) -> AttackParams {
    let mut params = AttackParams {
        damage: spec.damage,
        knockback: spec.knockback,
        projectile_count: spec.projectile_count,
        arc_angle: spec.arc_angle,
        ignore_shield: false,
    };
    for m in &weapon.mods {
        match m {
            ModKind::Force => params.knockback *= 3.0,
            ModKind::Parallel => {
                if params.projectile_count > 0 {
                    params.projectile_count += 1;
                } else {
                    params.arc_angle += 30.0;
                }
            }
            ModKind::Sudo => params.ignore_shield = true,
            _ => {}
        }
    }
    params
}

fn active_mods(world: &World, player: EntityId) -> Vec<ModKind> {
    world
        .inventories
        .get(player)
        .and_then(|inv| inv.active())
        .map(|w| w.mods.clone())
        .unwrap_or_default()
}

fn flash(world: &mut World, id: EntityId, frames: u32) {
    if let Some(f) = world.hit_flashes.get_mut(id) {
        f.frames = frames;
    }
}

/// On-hit hooks for a direct weapon hit.
#[allow(clippy::too_many_arguments)]
pub fn on_hit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
    enemy: EntityId,
    hit_pos: Position,
    damage: i32,
    dir: DVec2,
) {
    for m in active_mods(world, player) {
        match m {
            ModKind::Recursive => {
                spawn_echo(world, hit_pos, (damage / 2).max(1), dir, ECHO_DELAY_TICKS, '*');
            }
            ModKind::Cron => {
                let Some(weapon) = world.inventories.get_mut(player).and_then(|i| i.active_mut())
                else {
                    continue;
                };
                weapon.hit_counter += 1;
                if weapon.hit_counter < CRON_HIT_INTERVAL {
                    continue;
                }
                weapon.hit_counter = 0;
                // The hit already landed once; two more make it triple.
                if let Some(health) = world.healths.get_mut(enemy) {
                    health.current -= damage * 2;
                }
                feedback.push(FeedbackEvent::Shake {
                    intensity: 3,
                    frames: 5,
                });
                if let Some(&pos) = world.positions.get(enemy) {
                    let burst = Burst {
                        count: 10,
                        colors: &[WHITE, NEON_YELLOW, NEON_RED],
                        glyphs: &['!', '*', '#', '+'],
                        speed: (0.5, 1.2),
                        lifetime: (10, 20),
                        gravity: 0.0,
                    };
                    vfx::explosion(world, rng, pos, &burst);
                }
            }
            _ => {}
        }
    }
}

/// On-kill hooks. `| tee` fires a half-damage cone from the kill point in a
/// random direction and chains through the kills it causes.
pub fn on_kill(world: &mut World, rng: &mut ChaCha8Rng, player: EntityId, kill_pos: Position, chain_depth: u32) {
    if chain_depth >= TEE_MAX_CHAIN || !active_mods(world, player).contains(&ModKind::Tee) {
        return;
    }
    let Some(kind) = world
        .inventories
        .get(player)
        .and_then(|i| i.active())
        .map(|w| w.kind)
    else {
        return;
    };
    let half = (weapons::weapon_spec(kind).damage / 2).max(1);
    let angle = rng.gen_range(0.0..TAU);
    let dir = DVec2::new(angle.cos(), angle.sin());

    let mut chained = Vec::new();
    for id in world.query(&[K::Enemy, K::Position, K::Health]) {
        let (Some(&e_pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
            continue;
        };
        if health.is_depleted() {
            continue;
        }
        let offset = kill_pos.offset_to(&e_pos);
        let dist = offset.length();
        if dist >= 3.0 || (dist > 0.0 && (offset / dist).dot(dir) < 0.0) {
            continue;
        }
        health.current -= half;
        if health.is_depleted() {
            chained.push(e_pos);
        }
        flash(world, id, HIT_FLASH_TICKS);
    }
    vfx::directional_burst(world, rng, kill_pos, dir, 5, 0.5, &[GRAY_MED, WHITE], &['.', '*', '+']);

    for pos in chained {
        on_kill(world, rng, player, pos, chain_depth + 1);
    }
}

/// Delayed strike marker that resolves on its last tick.
pub fn spawn_echo(world: &mut World, pos: Position, damage: i32, dir: DVec2, delay: u32, glyph: char) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::default());
    world.add(id, Lifetime { frames: delay });
    world.add(
        id,
        EchoStrike {
            damage,
            dir_x: dir.x,
            dir_y: dir.y,
            radius: ECHO_RADIUS,
        },
    );
    vfx::spawn_particle(world, pos, DVec2::ZERO, glyph, GRAY_MED, delay, 0.0);
    id
}

/// Resolve echo strikes whose lifetime is about to run out.
pub fn echo_system(world: &mut World, rng: &mut ChaCha8Rng, feedback: &mut Vec<FeedbackEvent>) {
    for echo_id in world.query(&[K::EchoStrike, K::Position, K::Lifetime]) {
        let (Some(&pos), Some(&echo), Some(life)) = (
            world.positions.get(echo_id),
            world.echo_strikes.get(echo_id),
            world.lifetimes.get(echo_id),
        ) else {
            continue;
        };
        if life.frames > 1 {
            continue;
        }
        let dir = DVec2::new(echo.dir_x, echo.dir_y);
        for id in world.query(&[K::Enemy, K::Position, K::Health]) {
            let (Some(&e_pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
                continue;
            };
            let offset = pos.offset_to(&e_pos);
            let dist = offset.length();
            if dist > echo.radius || (dist > 0.0 && (offset / dist).dot(dir) < 0.0) {
                continue;
            }
            health.current -= echo.damage;
            flash(world, id, 3);
            vfx::directional_burst(world, rng, e_pos, dir, 3, 0.5, &[GRAY_MED, GRAY_DARK], &['*', '+', '.']);
        }
        vfx::directional_burst(world, rng, pos, dir, 4, 0.5, &[GRAY_MED, NEON_CYAN], &['/', '\\', '*']);
        feedback.push(FeedbackEvent::Shake {
            intensity: 1,
            frames: 2,
        });
    }
}

/// `--verbose`: hazards along a melee swing, or one ahead of other attacks.
pub fn spawn_ground_trail(world: &mut World, origin: Position, dir: DVec2, spec: &WeaponSpec) {
    let cells = match spec.pattern {
        AttackPattern::MeleeArc | AttackPattern::MeleeSlam | AttackPattern::MeleeSweep => {
            (0..=spec.radius as u32).map(|i| i as f64).collect()
        }
        _ => vec![1.0],
    };
    for step in cells {
        let at = Position::from_vec(origin.as_vec() + dir * step);
        let id = world.create();
        world.add(id, at);
        world.add(id, Velocity::default());
        world.add(id, Renderable::new('.', spec.color, 1));
        world.add(id, Lifetime {
            frames: HAZARD_LIFETIME,
        });
        world.add(
            id,
            GroundHazard {
                damage: 1,
                tick_rate: HAZARD_TICK_RATE,
                tick_timer: 0,
            },
        );
    }
}

/// Hazards damage enemies standing on their cell once per `tick_rate`.
pub fn hazard_system(world: &mut World) {
    for hazard_id in world.query(&[K::GroundHazard, K::Position]) {
        let Some(&h_pos) = world.positions.get(hazard_id) else {
            continue;
        };
        let Some(hazard) = world.hazards.get_mut(hazard_id) else {
            continue;
        };
        hazard.tick_timer += 1;
        if hazard.tick_timer < hazard.tick_rate {
            continue;
        }
        hazard.tick_timer = 0;
        let damage = hazard.damage;
        for id in world.query(&[K::Enemy, K::Position, K::Health]) {
            let (Some(e_pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
                continue;
            };
            if (e_pos.x - h_pos.x).abs() < 1.0 && (e_pos.y - h_pos.y).abs() < 1.0 {
                health.current -= damage;
            }
        }
    }
}

/// `--async`: fire along the last move direction every 90 ticks of movement.
pub fn async_system(world: &mut World, rng: &mut ChaCha8Rng, feedback: &mut Vec<FeedbackEvent>) {
    for player in world.query(&[K::Player, K::PlayerControlled, K::WeaponInventory]) {
        let Some(weapon) = world.inventories.get(player).and_then(|i| i.active()) else {
            continue;
        };
        if !weapon.has_mod(ModKind::Async) || weapons::weapon_spec(weapon.kind).pattern.is_beam() {
            continue;
        }
        let moving = world
            .velocities
            .get(player)
            .is_some_and(|v| v.x.abs() >= 0.05 || v.y.abs() >= 0.05);
        if !moving {
            continue;
        }
        if !world.auto_fires.contains(player) {
            world.add(player, AutoFire::default());
        }
        let Some(timer) = world.auto_fires.get_mut(player) else {
            continue;
        };
        timer.timer += 1;
        if timer.timer < ASYNC_FIRE_INTERVAL {
            continue;
        }
        timer.timer = 0;
        let dir = world
            .controls
            .get(player)
            .map(|c| c.last_move())
            .unwrap_or(DVec2::X);
        weapons::execute_attack(world, rng, feedback, player, dir);
    }
}

/// `--grep`: steer player projectiles toward the nearest enemy.
pub fn grep_system(world: &mut World) {
    let has_grep = world.query(&[K::Player, K::WeaponInventory]).into_iter().any(|p| {
        world
            .inventories
            .get(p)
            .and_then(|i| i.active())
            .is_some_and(|w| w.has_mod(ModKind::Grep))
    });
    if !has_grep {
        return;
    }
    let max_turn = GREP_MAX_TURN_DEG.to_radians();
    let enemies: Vec<Position> = world
        .query(&[K::Enemy, K::Position])
        .into_iter()
        .filter_map(|id| world.positions.get(id).copied())
        .collect();

    for id in world.query(&[K::Projectile, K::Position, K::Velocity]) {
        let (Some(&pos), Some(vel)) = (world.positions.get(id), world.velocities.get_mut(id)) else {
            continue;
        };
        let nearest = enemies
            .iter()
            .map(|e| (pos.distance_to(e), *e))
            .filter(|(d, _)| *d < GREP_RANGE)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((_, target)) = nearest else {
            continue;
        };
        let speed = vel.speed();
        if speed < 0.01 {
            continue;
        }
        let current = vel.y.atan2(vel.x);
        let desired = (target.y - pos.y).atan2(target.x - pos.x);
        let mut diff = desired - current;
        while diff > PI {
            diff -= TAU;
        }
        while diff < -PI {
            diff += TAU;
        }
        let turn = diff.clamp(-max_turn, max_turn);
        vel.set(rotate(DVec2::X, current + turn) * speed);
    }
}

pub fn spawn_shockwave(world: &mut World, origin: Position, max_radius: f64, damage: i32) -> EntityId {
    let id = world.create();
    world.add(id, origin);
    world.add(id, Velocity::default());
    world.add(id, Lifetime {
        frames: max_radius as u32 + 2,
    });
    world.add(
        id,
        Shockwave {
            origin,
            current_radius: 0.0,
            max_radius,
            expand_speed: 1.0,
            damage,
            hit_entities: Vec::new(),
        },
    );
    id
}

/// Grow rings and damage each enemy once as the edge passes it.
pub fn shockwave_system(world: &mut World, rng: &mut ChaCha8Rng) {
    const GLYPHS: [char; 3] = ['░', '▒', '*'];
    for ring_id in world.query(&[K::Shockwave]) {
        let Some(ring) = world.shockwaves.get_mut(ring_id) else {
            continue;
        };
        ring.current_radius += ring.expand_speed;
        if ring.current_radius > ring.max_radius {
            continue;
        }
        let (origin, radius, damage) = (ring.origin, ring.current_radius, ring.damage);
        let mut already_hit = ring.hit_entities.clone();

        let points = ((radius * 6.0) as u32).max(8);
        for i in 0..points {
            let angle = TAU * i as f64 / points as f64;
            let unit = DVec2::new(angle.cos(), angle.sin());
            let at = Position::from_vec(origin.as_vec() + unit * radius);
            let glyph = GLYPHS.choose(rng).copied().unwrap_or('*');
            let life = rng.gen_range(4..=8);
            vfx::spawn_particle(world, at, unit * 0.1, glyph, NEON_RED, life, 0.0);
        }

        for id in world.query(&[K::Enemy, K::Position, K::Health]) {
            if already_hit.contains(&id) {
                continue;
            }
            let (Some(&e_pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
                continue;
            };
            let offset = origin.offset_to(&e_pos);
            let dist = offset.length();
            if (dist - radius).abs() >= 1.5 {
                continue;
            }
            health.current -= damage;
            already_hit.push(id);
            flash(world, id, HIT_FLASH_TICKS);
            if dist > 0.0 {
                world.add(id, Knockback::new(offset / dist * 1.5));
            }
        }
        if let Some(ring) = world.shockwaves.get_mut(ring_id) {
            ring.hit_entities = already_hit;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use signal_void_core::components::Health;
    use signal_void_core::enums::{EnemyKind, WeaponKind};

    use super::*;
    use crate::systems::{combat, timers};
    use crate::weapons::{create_weapon, execute_attack, spawn_projectile, weapon_spec, Shot};
    use crate::world_setup::{spawn_enemy, spawn_player};

    fn armed(kind: WeaponKind, mods: &[ModKind]) -> (World, ChaCha8Rng, EntityId) {
        let mut world = World::new();
        let rng = ChaCha8Rng::seed_from_u64(9);
        let player = spawn_player(&mut world, Position::new(30.0, 10.0));
        let mut weapon = create_weapon(kind);
        weapon.mods.extend_from_slice(mods);
        world.inventories.get_mut(player).unwrap().weapons = vec![weapon];
        world.stats.get_mut(player).unwrap().crit_chance = 0.0;
        (world, rng, player)
    }

    fn fodder(world: &mut World, rng: &mut ChaCha8Rng, pos: Position, hp: i32) -> EntityId {
        let id = spawn_enemy(world, rng, EnemyKind::BufferLeak, pos).unwrap();
        world.add(id, Health::new(hp));
        id
    }

    fn health(world: &World, id: EntityId) -> i32 {
        world.healths.get(id).unwrap().current
    }

    fn with_mods(kind: WeaponKind, mods: &[ModKind]) -> AttackParams {
        let mut weapon = create_weapon(kind);
        weapon.mods.extend_from_slice(mods);
        attack_params(&weapon, weapon_spec(kind))
    }

    #[test]
    fn test_parameter_hooks() {
        assert_eq!(with_mods(WeaponKind::Fork, &[ModKind::Parallel]).projectile_count, 4);
        let arc = with_mods(WeaponKind::Slash, &[ModKind::Parallel]);
        assert_eq!((arc.arc_angle, arc.projectile_count), (120.0, 0));
        assert!((with_mods(WeaponKind::Slash, &[ModKind::Force]).knockback - 3.6).abs() < 1e-9);
        assert!(with_mods(WeaponKind::Slash, &[ModKind::Sudo]).ignore_shield);
        assert!(!with_mods(WeaponKind::Slash, &[]).ignore_shield);
    }

    #[test]
    fn test_attach_replaces_first_slot_when_full() {
        let mut weapon = create_weapon(WeaponKind::Slash);
        for m in ModKind::ALL.iter().take(weapon.mod_slots) {
            attach(&mut weapon, *m);
        }
        let slots = weapon.mod_slots;
        attach(&mut weapon, ModKind::Sudo);
        assert_eq!(weapon.mods.len(), slots);
        assert_eq!(weapon.mods[0], ModKind::Sudo);
    }

    #[test]
    fn test_cron_fifth_hit_triples_damage() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[ModKind::Cron]);
        let target = fodder(&mut world, &mut rng, Position::new(32.0, 10.0), 1000);
        let mut feedback = Vec::new();

        for hit in 1..=5 {
            assert!(execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X));
            combat::player_attacks(&mut world, &mut rng, &mut feedback, player);
            world.inventories.get_mut(player).unwrap().active_mut().unwrap().attack_timer = 0;
            world.attacks.get_mut(player).unwrap().active = false;
            if hit == 4 {
                assert_eq!(health(&world, target), 900);
            }
        }

        assert_eq!(health(&world, target), 900 - 75);
        let weapon = world.inventories.get(player).unwrap().active().unwrap();
        assert_eq!(weapon.hit_counter, 0);
    }

    #[test]
    fn test_tee_chain_stops_at_depth_three() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[ModKind::Tee]);
        // Stacked on the kill point, so every cone catches all of them.
        let at = Position::new(10.0, 10.0);
        let stack: Vec<EntityId> = [12, 24, 36, 48]
            .into_iter()
            .map(|hp| fodder(&mut world, &mut rng, at, hp))
            .collect();

        on_kill(&mut world, &mut rng, player, at, 0);

        let left: Vec<i32> = stack.iter().map(|id| health(&world, *id)).collect();
        assert_eq!(left, vec![0, 0, 0, 12]);
    }

    #[test]
    fn test_tee_needs_the_mod() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[]);
        let at = Position::new(10.0, 10.0);
        let target = fodder(&mut world, &mut rng, at, 50);
        on_kill(&mut world, &mut rng, player, at, 0);
        assert_eq!(health(&world, target), 50);
    }

    #[test]
    fn test_recursive_echo_lands_after_delay() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[ModKind::Recursive]);
        let at = Position::new(32.0, 10.0);
        let target = fodder(&mut world, &mut rng, at, 100);
        let mut feedback = Vec::new();

        on_hit(&mut world, &mut rng, &mut feedback, player, target, at, 20, DVec2::X);
        let echo = world.query(&[K::EchoStrike])[0];
        assert_eq!(world.echo_strikes.get(echo).unwrap().damage, 10);
        assert_eq!(world.lifetimes.get(echo).unwrap().frames, ECHO_DELAY_TICKS);

        for _ in 0..ECHO_DELAY_TICKS - 1 {
            echo_system(&mut world, &mut rng, &mut feedback);
            timers::lifetimes(&mut world);
        }
        assert_eq!(health(&world, target), 100);

        echo_system(&mut world, &mut rng, &mut feedback);
        timers::lifetimes(&mut world);
        assert_eq!(health(&world, target), 90);
        assert!(world.query(&[K::EchoStrike]).is_empty());
    }

    #[test]
    fn test_verbose_hazard_ticks_once_per_second() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let origin = Position::new(30.0, 10.0);
        spawn_ground_trail(&mut world, origin, DVec2::X, weapon_spec(WeaponKind::Slash));
        assert_eq!(world.hazards.len(), 5);
        let hazard = world.query(&[K::GroundHazard])[0];
        assert_eq!(world.lifetimes.get(hazard).unwrap().frames, HAZARD_LIFETIME);

        let target = fodder(&mut world, &mut rng, Position::new(32.0, 10.0), 100);
        for _ in 0..HAZARD_TICK_RATE - 1 {
            hazard_system(&mut world);
        }
        assert_eq!(health(&world, target), 100);
        hazard_system(&mut world);
        assert_eq!(health(&world, target), 99, "Only the cell underneath bites");
    }

    #[test]
    fn test_async_fires_while_moving() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[ModKind::Async]);
        let mut feedback = Vec::new();

        for _ in 0..ASYNC_FIRE_INTERVAL {
            async_system(&mut world, &mut rng, &mut feedback);
        }
        assert!(!world.attacks.get(player).unwrap().active, "Standing still never fires");

        world.add(player, Velocity::new(0.5, 0.0));
        for _ in 0..ASYNC_FIRE_INTERVAL - 1 {
            async_system(&mut world, &mut rng, &mut feedback);
        }
        assert!(!world.attacks.get(player).unwrap().active);
        async_system(&mut world, &mut rng, &mut feedback);
        assert!(world.attacks.get(player).unwrap().active);
    }

    #[test]
    fn test_async_skips_beams() {
        let (mut world, mut rng, player) = armed(WeaponKind::Overflow, &[ModKind::Async]);
        world.add(player, Velocity::new(0.5, 0.0));
        let mut feedback = Vec::new();
        for _ in 0..ASYNC_FIRE_INTERVAL * 2 {
            async_system(&mut world, &mut rng, &mut feedback);
        }
        assert!(!world.attacks.get(player).unwrap().active);
        assert!(!world.auto_fires.contains(player));
    }

    #[test]
    fn test_grep_turn_is_capped() {
        let (mut world, mut rng, player) = armed(WeaponKind::Ping, &[ModKind::Grep]);
        let shot = Shot {
            damage: 10,
            knockback: 0.0,
            max_range: 30.0,
            glyph: '•',
            color: WHITE,
            owner: Some(player),
            piercing: false,
            stun_frames: 0,
        };
        let bolt = spawn_projectile(&mut world, Position::new(10.0, 10.0), DVec2::X, &shot);
        fodder(&mut world, &mut rng, Position::new(10.0, 15.0), 100);

        grep_system(&mut world);

        let vel = world.velocities.get(bolt).unwrap();
        let heading = vel.y.atan2(vel.x);
        assert!((heading - GREP_MAX_TURN_DEG.to_radians()).abs() < 1e-9);
        assert!((vel.speed() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_grep_ignores_targets_out_of_range() {
        let (mut world, mut rng, player) = armed(WeaponKind::Ping, &[ModKind::Grep]);
        let shot = Shot {
            damage: 10,
            knockback: 0.0,
            max_range: 30.0,
            glyph: '•',
            color: WHITE,
            owner: Some(player),
            piercing: false,
            stun_frames: 0,
        };
        let bolt = spawn_projectile(&mut world, Position::new(10.0, 10.0), DVec2::X, &shot);
        fodder(&mut world, &mut rng, Position::new(10.0, 10.0 + GREP_RANGE + 1.0), 100);

        grep_system(&mut world);

        let vel = world.velocities.get(bolt).unwrap();
        assert_eq!((vel.x, vel.y), (1.0, 0.0));
    }
}
