//! Weapon table and attack dispatch.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{
    CollisionBox, Knockback, Lifetime, Projectile, Renderable, Weapon, WeaponInventory,
};
use signal_void_core::constants::*;
use signal_void_core::enums::{AttackPattern, ModKind, WeaponKind};
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::{rotate, EntityId, Position, Velocity};

use crate::ecs::{ComponentKind as K, World};
use crate::mods;
use crate::vfx;

/// Static weapon definition.
#[derive(Debug, Clone, Copy)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Glyph used for projectiles.
    pub glyph: char,
    pub color: u8,
    pub damage: i32,
    pub attack_frames: u32,
    pub cooldown_frames: u32,
    pub pattern: AttackPattern,
    pub arc_angle: f64,
    pub radius: f64,
    pub projectile_count: u32,
    pub projectile_speed: f64,
    pub projectile_range: f64,
    /// Degrees across a projectile spread.
    pub spread_angle: f64,
    pub knockback: f64,
    pub mod_slots: usize,
    pub screen_shake_on_hit: bool,
    pub hit_stop_frames: u32,
    pub beam_range: f64,
    pub beam_count: u32,
    /// Degrees between the centre beam and each side beam.
    pub beam_spread_angle: f64,
    /// Continuous beam ticks after which damage doubles; zero disables.
    pub overcharge_frames: u32,
    pub piercing: bool,
    pub stun_frames: u32,
    /// Every Nth attack leaves an afterimage; zero disables.
    pub afterimage_interval: u32,
    pub shockwave_radius: f64,
    pub shockwave_damage: i32,
    pub auto_crit: bool,
    /// `(radius, force)` of the pre-swing pull.
    pub vacuum: Option<(f64, f64)>,
}

const BASE: WeaponSpec = WeaponSpec {
    kind: WeaponKind::Slash,
    name: "Slash",
    symbol: "/",
    glyph: '/',
    color: WHITE,
    damage: 25,
    attack_frames: 12,
    cooldown_frames: 3,
    pattern: AttackPattern::MeleeArc,
    arc_angle: 90.0,
    radius: 3.0,
    projectile_count: 0,
    projectile_speed: 1.5,
    projectile_range: 30.0,
    spread_angle: 30.0,
    knockback: 1.0,
    mod_slots: BASE_MOD_SLOTS,
    screen_shake_on_hit: false,
    hit_stop_frames: 0,
    beam_range: 0.0,
    beam_count: 1,
    beam_spread_angle: 0.0,
    overcharge_frames: 0,
    piercing: false,
    stun_frames: 0,
    afterimage_interval: 0,
    shockwave_radius: 0.0,
    shockwave_damage: 0,
    auto_crit: false,
    vacuum: None,
};

pub static WEAPONS: [WeaponSpec; 12] = [
    WeaponSpec {
        radius: 4.5,
        knockback: 1.2,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Ping,
        name: "Ping",
        symbol: "•",
        glyph: '•',
        color: NEON_CYAN,
        damage: 35,
        attack_frames: 8,
        cooldown_frames: 28,
        pattern: AttackPattern::ProjectileSingle,
        projectile_count: 1,
        projectile_speed: 1.5,
        projectile_range: 30.0,
        knockback: 0.6,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Fork,
        name: "Fork()",
        symbol: "⑂",
        glyph: '⑂',
        color: NEON_GREEN,
        damage: 12,
        attack_frames: 8,
        cooldown_frames: 22,
        pattern: AttackPattern::ProjectileSpread,
        projectile_count: 3,
        spread_angle: 30.0,
        projectile_speed: 1.2,
        projectile_range: 20.0,
        knockback: 0.4,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Kill9,
        name: "Kill -9",
        symbol: "█",
        glyph: '█',
        color: NEON_RED,
        damage: 100,
        attack_frames: 20,
        cooldown_frames: 52,
        pattern: AttackPattern::MeleeSlam,
        radius: 2.5,
        knockback: 4.0,
        screen_shake_on_hit: true,
        hit_stop_frames: 4,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Rmrf,
        name: "Rm -rf",
        symbol: "///",
        glyph: '/',
        color: NEON_ORANGE,
        damage: 25,
        attack_frames: 16,
        cooldown_frames: 38,
        pattern: AttackPattern::MeleeSweep,
        arc_angle: 180.0,
        radius: 5.0,
        knockback: 2.0,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Overflow,
        name: "Overflow",
        symbol: "∞",
        glyph: '∞',
        color: NEON_MAGENTA,
        damage: 12,
        attack_frames: 6,
        cooldown_frames: 3,
        pattern: AttackPattern::BeamContinuous,
        beam_range: 15.0,
        knockback: 0.0,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Quicksort,
        name: "Quicksort",
        symbol: "⚡/",
        glyph: '/',
        color: NEON_YELLOW,
        damage: 20,
        attack_frames: 6,
        cooldown_frames: 1,
        radius: 4.0,
        knockback: 0.5,
        mod_slots: EVOLVED_MOD_SLOTS,
        afterimage_interval: 3,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Segfault,
        name: "Segfault",
        symbol: "◉",
        glyph: '◉',
        color: NEON_RED,
        damage: 60,
        attack_frames: 8,
        cooldown_frames: 42,
        pattern: AttackPattern::ProjectileSingle,
        projectile_count: 1,
        projectile_speed: 2.5,
        projectile_range: 50.0,
        knockback: 1.5,
        mod_slots: EVOLVED_MOD_SLOTS,
        piercing: true,
        stun_frames: 48,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::Ddos,
        name: "DDoS",
        symbol: "⑂",
        glyph: '⑂',
        color: NEON_GREEN,
        damage: 10,
        attack_frames: 8,
        cooldown_frames: 30,
        pattern: AttackPattern::ProjectileRadial,
        projectile_count: 8,
        spread_angle: 360.0,
        projectile_speed: 1.0,
        projectile_range: 15.0,
        knockback: 0.3,
        mod_slots: EVOLVED_MOD_SLOTS,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::KernelPanic,
        name: "Kernel Panic",
        symbol: "▓█▓",
        glyph: '▓',
        color: NEON_RED,
        damage: 100,
        attack_frames: 20,
        cooldown_frames: 52,
        pattern: AttackPattern::MeleeSlamShockwave,
        radius: 1.5,
        shockwave_radius: 5.0,
        shockwave_damage: 30,
        knockback: 2.5,
        screen_shake_on_hit: true,
        hit_stop_frames: 6,
        mod_slots: EVOLVED_MOD_SLOTS,
        auto_crit: true,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::FormatC,
        name: "Format C:",
        symbol: "///*",
        glyph: '*',
        color: 220,
        damage: 30,
        attack_frames: 16,
        cooldown_frames: 100,
        pattern: AttackPattern::MeleeSweep,
        arc_angle: 360.0,
        radius: 5.0,
        vacuum: Some((8.0, 1.5)),
        knockback: 1.5,
        mod_slots: EVOLVED_MOD_SLOTS,
        ..BASE
    },
    WeaponSpec {
        kind: WeaponKind::StackOverflow,
        name: "Stack Overflow",
        symbol: "∞∞",
        glyph: '∞',
        color: NEON_MAGENTA,
        damage: 12,
        attack_frames: 6,
        cooldown_frames: 3,
        pattern: AttackPattern::BeamTriple,
        beam_range: 18.0,
        beam_count: 3,
        beam_spread_angle: 30.0,
        knockback: 0.1,
        overcharge_frames: 180,
        mod_slots: EVOLVED_MOD_SLOTS,
        ..BASE
    },
];

/// Definition for `kind`; every kind has an entry, Slash is the fallback.
pub fn weapon_spec(kind: WeaponKind) -> &'static WeaponSpec {
    WEAPONS.iter().find(|w| w.kind == kind).unwrap_or(&WEAPONS[0])
}

/// A fresh weapon with the slot count from its definition.
pub fn create_weapon(kind: WeaponKind) -> Weapon {
    let mut weapon = Weapon::new(kind);
    weapon.mod_slots = weapon_spec(kind).mod_slots;
    weapon
}

/// Toggle between two held weapons.
pub fn swap(inv: &mut WeaponInventory) {
    if inv.weapons.len() >= 2 {
        inv.active_index = 1 - inv.active_index.min(1);
    }
}

/// Put `kind` into `slot`, appending when the slot is past the end.
pub fn replace_weapon(inv: &mut WeaponInventory, slot: usize, kind: WeaponKind) {
    let weapon = create_weapon(kind);
    match inv.weapons.get_mut(slot) {
        Some(existing) => *existing = weapon,
        None => inv.weapons.push(weapon),
    }
    if inv.weapons.len() == 1 {
        inv.active_index = 0;
    }
}

/// A weapon kind the inventory does not hold yet.
pub fn offer_weapon(inv: &WeaponInventory, rng: &mut ChaCha8Rng) -> Option<WeaponKind> {
    let available: Vec<WeaponKind> = WeaponKind::ALL
        .iter()
        .copied()
        .filter(|k| inv.weapons.iter().all(|w| w.kind != *k))
        .collect();
    available.choose(rng).copied()
}

/// Payload copied into each player projectile.
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub damage: i32,
    pub knockback: f64,
    pub max_range: f64,
    pub glyph: char,
    pub color: u8,
    pub owner: Option<EntityId>,
    pub piercing: bool,
    pub stun_frames: u32,
}

pub fn spawn_projectile(world: &mut World, pos: Position, vel: DVec2, shot: &Shot) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::from_vec(vel));
    world.add(id, Renderable::new(shot.glyph, shot.color, 8));
    world.add(id, CollisionBox::trigger(0.5, 0.5));
    world.add(id, Lifetime {
        frames: PROJECTILE_LIFETIME,
    });
    world.add(
        id,
        Projectile {
            damage: shot.damage,
            knockback: shot.knockback,
            owner: shot.owner,
            max_range: shot.max_range,
            distance_traveled: 0.0,
            piercing: shot.piercing,
            stun_frames: shot.stun_frames,
            color: shot.color,
            hit_entities: Vec::new(),
        },
    );
    id
}

/// Start an attack with the player's active weapon along unit `dir`.
/// Returns false while the weapon cools down or a swing is still active.
pub fn execute_attack(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
    dir: DVec2,
) -> bool {
    let Some(weapon) = world.inventories.get(player).and_then(|inv| inv.active()).cloned() else {
        return false;
    };
    if weapon.attack_timer > 0 {
        return false;
    }
    let Some(&pos) = world.positions.get(player) else {
        return false;
    };
    let (speed_mult, bonus_shots) = world
        .stats
        .get(player)
        .map(|s| (s.attack_speed_multiplier, s.bonus_projectile_count))
        .unwrap_or((1.0, 0));

    let spec = weapon_spec(weapon.kind);
    let params = mods::attack_params(&weapon, spec);

    let mut frames = spec.attack_frames;
    let mut cooldown = spec.cooldown_frames;
    if speed_mult > 1.0 {
        frames = ((frames as f64 / speed_mult) as u32).max(4);
        cooldown = ((cooldown as f64 / speed_mult) as u32).max(1);
    }

    {
        let Some(attack) = world.attacks.get_mut(player) else {
            return false;
        };
        if attack.active {
            return false;
        }
        attack.active = true;
        attack.frames_remaining = frames;
        attack.dir_x = dir.x;
        attack.dir_y = dir.y;
        attack.radius = spec.radius;
        attack.is_beam = spec.pattern.is_beam();
        attack.beam_range = spec.beam_range;
        if !attack.is_beam {
            attack.beam_continuous_frames = 0;
        }
    }
    if let Some(active) = world.inventories.get_mut(player).and_then(|inv| inv.active_mut()) {
        active.attack_timer = frames + cooldown;
    }

    let shot = Shot {
        damage: params.damage,
        knockback: params.knockback,
        max_range: spec.projectile_range,
        glyph: spec.glyph,
        color: spec.color,
        owner: Some(player),
        piercing: spec.piercing,
        stun_frames: spec.stun_frames,
    };
    let muzzle = Position::from_vec(pos.as_vec() + dir * PROJECTILE_MUZZLE_OFFSET);

    match spec.pattern {
        AttackPattern::MeleeArc => melee_arc_visual(world, rng, pos, dir, spec),
        AttackPattern::MeleeSlam => slam_visual(world, rng, pos, dir, spec),
        AttackPattern::MeleeSlamShockwave => {
            slam_visual(world, rng, pos, dir, spec);
            let origin = Position::from_vec(pos.as_vec() + dir);
            mods::spawn_shockwave(world, origin, spec.shockwave_radius, spec.shockwave_damage);
        }
        AttackPattern::MeleeSweep => {
            if let Some((radius, force)) = spec.vacuum {
                vacuum_pull(world, pos, radius, force);
            }
            sweep_visual(world, rng, pos, dir, spec);
        }
        AttackPattern::ProjectileSingle => {
            let total = 1 + bonus_shots;
            if total == 1 {
                spawn_projectile(world, muzzle, dir * spec.projectile_speed, &shot);
            } else {
                let spread = 10f64.to_radians();
                for i in 0..total {
                    let offset = -spread / 2.0 + spread * i as f64 / (total - 1) as f64;
                    let heading = rotate(dir, offset);
                    spawn_projectile(world, muzzle, heading * spec.projectile_speed, &shot);
                }
            }
        }
        AttackPattern::ProjectileSpread => {
            let total = params.projectile_count + bonus_shots;
            let spread = spec.spread_angle.to_radians();
            for i in 0..total {
                let offset = if total == 1 {
                    0.0
                } else {
                    -spread / 2.0 + spread * i as f64 / (total - 1) as f64
                };
                let heading = rotate(dir, offset);
                spawn_projectile(world, muzzle, heading * spec.projectile_speed, &shot);
            }
        }
        AttackPattern::ProjectileRadial => {
            let total = (params.projectile_count + bonus_shots).max(1);
            let counter = bump_attack_counter(world, player);
            let phase = if counter % 2 == 0 {
                PI / total as f64
            } else {
                0.0
            };
            for i in 0..total {
                let angle = phase + TAU * i as f64 / total as f64;
                let unit = DVec2::new(angle.cos(), angle.sin());
                let origin = Position::from_vec(pos.as_vec() + unit * PROJECTILE_MUZZLE_OFFSET);
                spawn_projectile(world, origin, unit * spec.projectile_speed, &shot);
            }
        }
        // Beams resolve every tick in combat.
        AttackPattern::BeamContinuous | AttackPattern::BeamTriple => {}
    }

    if weapon.has_mod(ModKind::Verbose) {
        mods::spawn_ground_trail(world, pos, dir, spec);
    }

    if spec.afterimage_interval > 0 {
        let counter = bump_attack_counter(world, player);
        if counter >= spec.afterimage_interval {
            if let Some(active) = world.inventories.get_mut(player).and_then(|inv| inv.active_mut()) {
                active.attack_counter = 0;
            }
            let damage = ((spec.damage as f64 * 0.3) as i32).max(1);
            mods::spawn_echo(world, pos, damage, dir, 12, '@');
        }
    }

    if !spec.pattern.is_beam() {
        let intensity = if spec.screen_shake_on_hit { 2 } else { 1 };
        feedback.push(FeedbackEvent::Shake {
            intensity,
            frames: 2,
        });
    }
    log::trace!("{} attack toward ({:.1}, {:.1})", spec.name, dir.x, dir.y);
    true
}

fn bump_attack_counter(world: &mut World, player: EntityId) -> u32 {
    match world.inventories.get_mut(player).and_then(|inv| inv.active_mut()) {
        Some(active) => {
            active.attack_counter += 1;
            active.attack_counter
        }
        None => 0,
    }
}

/// Pull enemies inside `radius` toward `center`.
fn vacuum_pull(world: &mut World, center: Position, radius: f64, force: f64) {
    for id in world.query(&[K::Enemy, K::Position, K::Health]) {
        let Some(e_pos) = world.positions.get(id) else {
            continue;
        };
        let offset = center.offset_to(e_pos);
        let dist = offset.length();
        if dist > 0.0 && dist < radius {
            world.add(id, Knockback::with_decay(-offset / dist * force, 0.6));
        }
    }
}

/// Precomputed slash cells per cardinal direction.
fn arc_cells(dir: DVec2) -> [(f64, f64); 8] {
    let (fx, fy) = (dir.x.round(), dir.y.round());
    // Cells in the facing frame: far row of five, near row of three.
    let local = [
        (2.0, -2.0),
        (2.0, -1.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (2.0, 2.0),
        (1.0, -1.0),
        (1.0, 0.0),
        (1.0, 1.0),
    ];
    local.map(|(fwd, side)| {
        if fx != 0.0 {
            (fwd * fx, side)
        } else {
            (side, fwd * fy)
        }
    })
}

fn melee_arc_visual(world: &mut World, rng: &mut ChaCha8Rng, pos: Position, dir: DVec2, spec: &WeaponSpec) {
    const GLYPHS: [char; 7] = ['/', '\\', '|', '-', '*', 'x', '+'];
    const FADE: [u8; 6] = [WHITE, NEON_CYAN, NEON_MAGENTA, NEON_CYAN, GRAY_MED, GRAY_DARK];
    for (i, (ox, oy)) in arc_cells(dir).into_iter().enumerate() {
        let life = (12 - (i as u32 % 3) * 2).max(4);
        let color = if i < 3 {
            spec.color
        } else {
            FADE[(i - 3).min(FADE.len() - 1)]
        };
        let glyph = GLYPHS.choose(rng).copied().unwrap_or('/');
        let cell = Position::new(pos.x + ox, pos.y + oy);
        vfx::spawn_particle(world, cell, dir * 0.1, glyph, color, life, 0.0);
    }
}

fn slam_visual(world: &mut World, rng: &mut ChaCha8Rng, pos: Position, dir: DVec2, spec: &WeaponSpec) {
    const GLYPHS: [char; 5] = ['█', '#', '*', '!', 'x'];
    let impact = Position::from_vec(pos.as_vec() + dir);
    for i in 0..6 {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(0.3..=0.8);
        let vel = DVec2::new(angle.cos(), angle.sin()) * speed;
        let glyph = GLYPHS.choose(rng).copied().unwrap_or('#');
        let color = if i < 3 { spec.color } else { NEON_YELLOW };
        let life = rng.gen_range(8..=16);
        vfx::spawn_particle(world, impact, vel, glyph, color, life, 0.05);
    }
}

fn sweep_visual(world: &mut World, rng: &mut ChaCha8Rng, pos: Position, dir: DVec2, spec: &WeaponSpec) {
    const GLYPHS: [char; 5] = ['─', '│', '/', '\\', '*'];
    let base = dir.y.atan2(dir.x);
    for i in 0..12 {
        let angle = base - PI / 2.0 + PI * i as f64 / 11.0;
        let unit = DVec2::new(angle.cos(), angle.sin());
        let dist = rng.gen_range(1.5..=spec.radius.max(1.5));
        let cell = Position::from_vec(pos.as_vec() + unit * dist);
        let glyph = GLYPHS.choose(rng).copied().unwrap_or('*');
        let color = if i % 2 == 0 { spec.color } else { NEON_YELLOW };
        let life = rng.gen_range(8..=14);
        vfx::spawn_particle(world, cell, unit * 0.15, glyph, color, life, 0.0);
    }
}

/// Whether `target` is inside the melee reach of an attack along `dir`.
pub fn melee_reaches(origin: Position, dir: DVec2, target: Position, reach: f64) -> bool {
    let offset = origin.offset_to(&target);
    let dist = offset.length();
    if dist > reach {
        return false;
    }
    dist == 0.0 || (offset / dist).dot(dir) >= MELEE_CONE_DOT
}

/// Whether `target` lies on a beam of length `range` along `dir`.
pub fn beam_reaches(origin: Position, dir: DVec2, target: Position, range: f64) -> bool {
    let offset = origin.offset_to(&target);
    let along = offset.dot(dir);
    if !(0.0..=range).contains(&along) {
        return false;
    }
    (offset - dir * along).length() <= BEAM_HALF_WIDTH
}

/// Directions of every beam fired along `dir`.
pub fn beam_directions(dir: DVec2, spec: &WeaponSpec) -> Vec<DVec2> {
    let mut dirs = vec![dir];
    if spec.beam_count >= 3 {
        let spread = spec.beam_spread_angle.to_radians();
        dirs.push(rotate(dir, spread));
        dirs.push(rotate(dir, -spread));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use signal_void_core::components::Health;
    use signal_void_core::enums::EnemyKind;

    use super::*;
    use crate::systems::combat;
    use crate::world_setup::{spawn_enemy, spawn_player};

    /// A player at (30, 10) holding `kind` with `mods`, crits disabled.
    fn armed(kind: WeaponKind, mods: &[ModKind]) -> (World, ChaCha8Rng, EntityId) {
        let mut world = World::new();
        let rng = ChaCha8Rng::seed_from_u64(5);
        let player = spawn_player(&mut world, Position::new(30.0, 10.0));
        let mut weapon = create_weapon(kind);
        weapon.mods.extend_from_slice(mods);
        world.inventories.get_mut(player).unwrap().weapons = vec![weapon];
        world.stats.get_mut(player).unwrap().crit_chance = 0.0;
        (world, rng, player)
    }

    /// A 100 HP enemy at `offset` from the player, facing `facing`.
    fn enemy(world: &mut World, rng: &mut ChaCha8Rng, kind: EnemyKind, offset: DVec2, facing: DVec2) -> EntityId {
        let pos = Position::from_vec(DVec2::new(30.0, 10.0) + offset);
        let id = spawn_enemy(world, rng, kind, pos).unwrap();
        world.add(id, Health::new(100));
        world.ais.get_mut(id).unwrap().set_facing(facing);
        id
    }

    fn swing(world: &mut World, rng: &mut ChaCha8Rng, player: EntityId, dir: DVec2) -> Vec<FeedbackEvent> {
        let mut feedback = Vec::new();
        assert!(execute_attack(world, rng, &mut feedback, player, dir));
        combat::player_attacks(world, rng, &mut feedback, player);
        feedback
    }

    fn health(world: &World, id: EntityId) -> i32 {
        world.healths.get(id).unwrap().current
    }

    #[test]
    fn test_every_kind_has_its_own_entry() {
        for kind in WeaponKind::ALL {
            assert_eq!(weapon_spec(kind).kind, kind);
        }
        assert_eq!(create_weapon(WeaponKind::Quicksort).mod_slots, EVOLVED_MOD_SLOTS);
    }

    #[test]
    fn test_melee_stops_after_first_hit() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[]);
        let near = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(2.0, 0.0), DVec2::X);
        let far = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(3.0, 0.0), DVec2::X);

        swing(&mut world, &mut rng, player, DVec2::X);

        let hurt = [near, far].iter().filter(|id| health(&world, **id) < 100).count();
        assert_eq!(hurt, 1);
        assert!(!world.attacks.get(player).unwrap().active);
    }

    #[test]
    fn test_beam_hits_every_enemy_on_line_and_stays_active() {
        let (mut world, mut rng, player) = armed(WeaponKind::Overflow, &[]);
        // Shields face the player; beams pass through them anyway.
        let a = enemy(&mut world, &mut rng, EnemyKind::Firewall, DVec2::new(3.0, 0.0), -DVec2::X);
        let b = enemy(&mut world, &mut rng, EnemyKind::Firewall, DVec2::new(6.0, 0.0), -DVec2::X);

        swing(&mut world, &mut rng, player, DVec2::X);

        assert_eq!(health(&world, a), 88);
        assert_eq!(health(&world, b), 88);
        assert!(world.attacks.get(player).unwrap().active);
        assert!(!world.knockbacks.contains(player), "No shield recoil from a beam");
    }

    #[test]
    fn test_triple_beam_adds_side_lines() {
        let (mut world, mut rng, player) = armed(WeaponKind::StackOverflow, &[]);
        let side = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, rotate(DVec2::X, 30f64.to_radians()) * 8.0, DVec2::X);
        let wide = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, rotate(DVec2::X, 60f64.to_radians()) * 8.0, DVec2::X);

        swing(&mut world, &mut rng, player, DVec2::X);

        assert_eq!(health(&world, side), 88);
        assert_eq!(health(&world, wide), 100);
        assert_eq!(beam_directions(DVec2::X, weapon_spec(WeaponKind::Overflow)).len(), 1);
    }

    #[test]
    fn test_beam_overcharge_doubles_damage() {
        let (mut world, mut rng, player) = armed(WeaponKind::StackOverflow, &[]);
        let target = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(5.0, 0.0), DVec2::X);

        let mut feedback = Vec::new();
        assert!(execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X));
        world.attacks.get_mut(player).unwrap().beam_continuous_frames = 179;
        combat::player_attacks(&mut world, &mut rng, &mut feedback, player);
        assert_eq!(health(&world, target), 88, "One tick short of overcharge");

        world.attacks.get_mut(player).unwrap().beam_continuous_frames = 180;
        combat::player_attacks(&mut world, &mut rng, &mut feedback, player);
        assert_eq!(health(&world, target), 64);
    }

    #[test]
    fn test_frontal_shield_blocks_melee_without_sudo() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[]);
        let wall = enemy(&mut world, &mut rng, EnemyKind::Firewall, DVec2::new(2.0, 0.0), -DVec2::X);

        swing(&mut world, &mut rng, player, DVec2::X);

        assert_eq!(health(&world, wall), 100);
        assert!(world.knockbacks.get(player).unwrap().x < 0.0);
        assert_eq!(world.ais.get(wall).unwrap().shield_stagger, SHIELD_STAGGER_TICKS);
    }

    #[test]
    fn test_sudo_bypasses_frontal_shield() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[ModKind::Sudo]);
        let wall = enemy(&mut world, &mut rng, EnemyKind::Firewall, DVec2::new(2.0, 0.0), -DVec2::X);

        swing(&mut world, &mut rng, player, DVec2::X);

        assert_eq!(health(&world, wall), 75);
        assert!(!world.knockbacks.contains(player));
        assert_eq!(world.ais.get(wall).unwrap().shield_stagger, 0);
    }

    #[test]
    fn test_force_triples_knockback() {
        for (mods, expected) in [(vec![], 1.2), (vec![ModKind::Force], 3.6)] {
            let (mut world, mut rng, player) = armed(WeaponKind::Slash, &mods);
            let target = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(2.0, 0.0), DVec2::X);
            swing(&mut world, &mut rng, player, DVec2::X);
            let kb = world.knockbacks.get(target).unwrap();
            assert!((kb.x - expected).abs() < 1e-9, "{mods:?}: {}", kb.x);
        }
    }

    #[test]
    fn test_attack_speed_shortens_cooldown() {
        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[]);
        let mut feedback = Vec::new();
        execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X);
        let timer = world.inventories.get(player).unwrap().active().unwrap().attack_timer;
        assert_eq!(timer, 15);
        assert!(!execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X));

        let (mut world, mut rng, player) = armed(WeaponKind::Slash, &[]);
        world.stats.get_mut(player).unwrap().attack_speed_multiplier = 2.0;
        execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X);
        let timer = world.inventories.get(player).unwrap().active().unwrap().attack_timer;
        assert_eq!(timer, 6 + 1);
    }

    #[test]
    fn test_vacuum_pulls_enemies_inside_radius() {
        let (mut world, mut rng, player) = armed(WeaponKind::FormatC, &[]);
        let near = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(6.0, 0.0), DVec2::X);
        let far = enemy(&mut world, &mut rng, EnemyKind::BufferLeak, DVec2::new(9.0, 0.0), DVec2::X);

        let mut feedback = Vec::new();
        execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X);

        let pull = world.knockbacks.get(near).unwrap();
        assert!((pull.x + 1.5).abs() < 1e-9 && pull.y.abs() < 1e-9);
        assert!(!world.knockbacks.contains(far));
    }

    #[test]
    fn test_fork_spreads_projectiles() {
        let (mut world, mut rng, player) = armed(WeaponKind::Fork, &[]);
        let mut feedback = Vec::new();
        execute_attack(&mut world, &mut rng, &mut feedback, player, DVec2::X);
        assert_eq!(world.projectiles.len(), 3);
    }

    #[test]
    fn test_beam_reach_respects_width_and_range() {
        let origin = Position::new(0.0, 0.0);
        assert!(beam_reaches(origin, DVec2::X, Position::new(10.0, 1.0), 15.0));
        assert!(!beam_reaches(origin, DVec2::X, Position::new(10.0, 2.0), 15.0));
        assert!(!beam_reaches(origin, DVec2::X, Position::new(-1.0, 0.0), 15.0));
        assert!(!beam_reaches(origin, DVec2::X, Position::new(16.0, 0.0), 15.0));
    }
}
