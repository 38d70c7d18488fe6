//! Particle entities. They are simulation state the renderer reads; all
//! randomness comes from the engine RNG.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::{Gravity, Lifetime, Particle, Renderable};
use signal_void_core::constants::*;
use signal_void_core::enums::EnemyKind;
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::types::{EntityId, Position, Velocity};

use crate::ecs::World;

/// Parameters of a radial particle explosion.
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: u32,
    pub colors: &'static [u8],
    pub glyphs: &'static [char],
    pub speed: (f64, f64),
    pub lifetime: (u32, u32),
    pub gravity: f64,
}

impl Default for Burst {
    fn default() -> Self {
        Self {
            count: 15,
            colors: &[WHITE, NEON_YELLOW, GRAY_LIGHT],
            glyphs: &['.', '*', '!', '+', 'x', '\'', '`'],
            speed: (0.3, 1.2),
            lifetime: (15, 30),
            gravity: PARTICLE_GRAVITY,
        }
    }
}

pub const SPAWN_BURST: Burst = Burst {
    count: 6,
    colors: &[NEON_RED, NEON_YELLOW, WHITE],
    glyphs: &['*', '+', '.'],
    speed: (0.3, 0.8),
    lifetime: (8, 15),
    gravity: 0.0,
};

pub const HEAL_BURST: Burst = Burst {
    count: 12,
    colors: &[NEON_GREEN, NEON_CYAN, WHITE],
    glyphs: &['+', '*', '.'],
    speed: (0.3, 0.8),
    lifetime: (15, 25),
    gravity: -0.02,
};

pub const PLAYER_DEATH_BURST: Burst = Burst {
    count: 30,
    colors: &[NEON_RED, NEON_MAGENTA, NEON_YELLOW, WHITE],
    glyphs: &['@', '#', '*', '!', 'x', '+', '~'],
    speed: (0.5, 1.5),
    lifetime: (20, 40),
    gravity: 0.03,
};

pub const WALL_BUMP_BURST: Burst = Burst {
    count: 5,
    colors: &[GRAY_MED, GRAY_DARK, NEON_CYAN],
    glyphs: &['*', '.', '+'],
    speed: (0.2, 0.6),
    lifetime: (8, 15),
    gravity: 0.05,
};

pub fn spawn_particle(
    world: &mut World,
    pos: Position,
    vel: DVec2,
    glyph: char,
    color: u8,
    lifetime: u32,
    gravity: f64,
) -> EntityId {
    let id = world.create();
    world.add(id, pos);
    world.add(id, Velocity::from_vec(vel));
    world.add(id, Renderable::new(glyph, color, 5));
    world.add(id, Lifetime { frames: lifetime });
    world.add(id, Particle);
    if gravity != 0.0 {
        world.add(id, Gravity { strength: gravity });
    }
    id
}

fn pick<T: Copy>(rng: &mut ChaCha8Rng, items: &[T], fallback: T) -> T {
    items.choose(rng).copied().unwrap_or(fallback)
}

/// Radial burst with a slight upward bias.
pub fn explosion(world: &mut World, rng: &mut ChaCha8Rng, pos: Position, burst: &Burst) {
    for _ in 0..burst.count {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(burst.speed.0..=burst.speed.1);
        let vel = DVec2::new(angle.cos() * speed, angle.sin() * speed - 0.3);
        let glyph = pick(rng, burst.glyphs, '.');
        let color = pick(rng, burst.colors, WHITE);
        let lifetime = rng.gen_range(burst.lifetime.0..=burst.lifetime.1);
        spawn_particle(world, pos, vel, glyph, color, lifetime, burst.gravity);
    }
}

/// Cone of sparks around `dir`, `spread` radians either side.
pub fn directional_burst(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pos: Position,
    dir: DVec2,
    count: u32,
    spread: f64,
    colors: &[u8],
    glyphs: &[char],
) {
    let base = dir.y.atan2(dir.x);
    for _ in 0..count {
        let angle = base + rng.gen_range(-spread..=spread);
        let speed = rng.gen_range(0.5..=1.5);
        let vel = DVec2::new(angle.cos() * speed, angle.sin() * speed);
        let glyph = pick(rng, glyphs, '*');
        let color = pick(rng, colors, WHITE);
        let lifetime = rng.gen_range(10..=20);
        spawn_particle(world, pos, vel, glyph, color, lifetime, 0.0);
    }
}

/// Small jittered puff, used for fizzles and impacts.
pub fn scatter(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    pos: Position,
    count: u32,
    jitter: f64,
    color: u8,
    glyphs: &[char],
    lifetime: (u32, u32),
    gravity: f64,
) {
    for _ in 0..count {
        let vel = DVec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter));
        let glyph = pick(rng, glyphs, '.');
        let frames = rng.gen_range(lifetime.0..=lifetime.1);
        spawn_particle(world, pos, vel, glyph, color, frames, gravity);
    }
}

pub fn death_burst(world: &mut World, rng: &mut ChaCha8Rng, kind: EnemyKind, pos: Position) {
    let burst = match kind {
        EnemyKind::BufferLeak => Burst {
            count: 12,
            colors: &[NEON_GREEN, 48, 41, WHITE],
            glyphs: &['.', '*', '&', '+'],
            speed: (0.3, 1.0),
            gravity: 0.05,
            ..Default::default()
        },
        EnemyKind::Firewall => Burst {
            count: 20,
            colors: &[NEON_ORANGE, NEON_RED, NEON_YELLOW, WHITE],
            glyphs: &['#', '=', '[', ']', 'H', '*'],
            speed: (0.2, 0.8),
            lifetime: (20, 40),
            gravity: 0.15,
        },
        EnemyKind::Overclocker => Burst {
            count: 25,
            colors: &[NEON_CYAN, 39, 45, WHITE, NEON_MAGENTA],
            glyphs: &['>', '<', '*', '+', '~', '^'],
            speed: (0.5, 1.5),
            lifetime: (10, 25),
            gravity: 0.02,
        },
        EnemyKind::Spammer => Burst {
            count: 8,
            colors: &[NEON_YELLOW, WHITE],
            glyphs: &['!', '*', '.'],
            speed: (0.3, 1.0),
            gravity: 0.05,
            ..Default::default()
        },
        EnemyKind::Sniper => Burst {
            count: 12,
            colors: &[NEON_RED, WHITE],
            glyphs: &['¦', '*', '+', '.'],
            gravity: 0.03,
            ..Default::default()
        },
        _ => Burst {
            count: 10,
            ..Default::default()
        },
    };
    explosion(world, rng, pos, &burst);
}

/// Shake and sparks for the player's hard wall impacts among `hits`.
/// Other bodies' impacts are left to the renderer.
pub fn wall_bumps(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Option<EntityId>,
    hits: &[SimEvent],
    feedback: &mut Vec<FeedbackEvent>,
) {
    for hit in hits {
        let SimEvent::WallHit {
            entity,
            impact_speed,
        } = *hit
        else {
            continue;
        };
        if Some(entity) != player {
            continue;
        }
        let Some(&at) = world.positions.get(entity) else {
            continue;
        };
        feedback.push(FeedbackEvent::Shake {
            intensity: ((impact_speed * 2.0) as u8).clamp(1, 2),
            frames: 3,
        });
        explosion(world, rng, at, &WALL_BUMP_BURST);
    }
}

/// Expanding rings for the Logic Blast.
pub fn logic_blast_wave(world: &mut World, rng: &mut ChaCha8Rng, pos: Position) {
    const GLYPHS: [char; 7] = ['*', '+', 'x', '#', '!', '~', '.'];
    let rings: [(f64, u32, f64, [u8; 2], u32); 5] = [
        (1.0, 8, 0.8, [NEON_MAGENTA, WHITE], 18),
        (2.0, 12, 1.0, [NEON_MAGENTA, NEON_CYAN], 22),
        (3.5, 16, 1.2, [NEON_CYAN, NEON_MAGENTA], 26),
        (5.0, 20, 1.4, [NEON_CYAN, 39], 28),
        (7.0, 24, 1.5, [39, GRAY_MED], 30),
    ];
    for (radius, count, speed, colors, lifetime) in rings {
        for i in 0..count {
            let angle = TAU * i as f64 / count as f64 + rng.gen_range(-0.15..=0.15);
            let unit = DVec2::new(angle.cos(), angle.sin());
            let start = Position::from_vec(pos.as_vec() + unit * radius * 0.3);
            let glyph = pick(rng, &GLYPHS, '*');
            let color = pick(rng, &colors, WHITE);
            spawn_particle(world, start, unit * speed, glyph, color, lifetime, 0.0);
        }
    }
}
