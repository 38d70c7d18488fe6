//! Spawn-pattern geometry.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::constants::{RANDOM_SPAWN_ATTEMPTS, RANDOM_SPAWN_MIN_DISTANCE, SPAWN_MARGIN};
use signal_void_core::enums::SpawnPattern;
use signal_void_core::types::Position;

use crate::config::ArenaBounds;

/// Playable room extent used for spawn placement: one cell inside the arena.
fn room_extent(arena: &ArenaBounds) -> (f64, f64) {
    (arena.width_f() - 1.0, arena.height_f() - 1.0)
}

fn clamp(x: f64, y: f64, room: (f64, f64)) -> Position {
    let m = SPAWN_MARGIN;
    Position::new(
        x.clamp(m, (room.0 - m).max(m)),
        y.clamp(m, (room.1 - m).max(m)),
    )
}

/// Positions for `count` enemies laid out in `pattern` around `target`,
/// which faces unit-or-zero `facing`.
pub fn spawn_positions(
    pattern: SpawnPattern,
    count: u32,
    arena: &ArenaBounds,
    target: Position,
    facing: DVec2,
    rng: &mut ChaCha8Rng,
) -> Vec<Position> {
    let room = room_extent(arena);
    let m = SPAWN_MARGIN;
    let n = count as usize;
    let mut out = Vec::with_capacity(n);

    match pattern {
        SpawnPattern::Surround | SpawnPattern::Ring => {
            let (radius, jitter) = if pattern == SpawnPattern::Surround {
                (rng.gen_range(8.0..12.0), 0.2)
            } else {
                (rng.gen_range(4.0..5.0), 0.15)
            };
            for i in 0..n {
                let angle = TAU * i as f64 / n as f64 + rng.gen_range(-jitter..jitter);
                out.push(clamp(
                    target.x + angle.cos() * radius,
                    target.y + angle.sin() * radius,
                    room,
                ));
            }
        }
        SpawnPattern::LineTop | SpawnPattern::LineBottom => {
            let spacing = ((room.0 - m * 2.0) / count.max(1) as f64).max(2.0);
            let start = m + spacing / 2.0;
            for i in 0..n {
                let x = start + i as f64 * spacing;
                let y = if pattern == SpawnPattern::LineTop {
                    m + rng.gen_range(0.0..2.0)
                } else {
                    room.1 - m - rng.gen_range(0.0..2.0)
                };
                out.push(clamp(x, y, room));
            }
        }
        SpawnPattern::Corners => {
            let corners = [
                (m + 2.0, m + 2.0),
                (room.0 - m - 2.0, m + 2.0),
                (m + 2.0, room.1 - m - 2.0),
                (room.0 - m - 2.0, room.1 - m - 2.0),
            ];
            for i in 0..n {
                let (cx, cy) = corners[i % corners.len()];
                out.push(clamp(
                    cx + rng.gen_range(-1.0..1.0),
                    cy + rng.gen_range(-1.0..1.0),
                    room,
                ));
            }
        }
        SpawnPattern::BehindPlayer => {
            let mut behind = -facing;
            if behind.x.abs() < 0.1 && behind.y.abs() < 0.1 {
                behind = DVec2::new(-1.0, 0.0);
            }
            let perp = behind.perp();
            let base = rng.gen_range(6.0..10.0);
            for _ in 0..n {
                let spread = rng.gen_range(-2.0..2.0);
                let dist = base + rng.gen_range(-1.0..1.0);
                let p = target.as_vec() + behind * dist + perp * spread;
                out.push(clamp(p.x, p.y, room));
            }
        }
        SpawnPattern::Pincer => {
            let perp = facing.perp().try_normalize().unwrap_or(DVec2::new(0.0, -1.0));
            let half = n / 2;
            for i in 0..n {
                let side = if i < half { perp } else { -perp };
                let dist = rng.gen_range(6.0..10.0);
                let spread = rng.gen_range(-1.0..1.0);
                let p = target.as_vec() + side * dist + facing * spread;
                out.push(clamp(p.x, p.y, room));
            }
        }
        SpawnPattern::Random => {
            for _ in 0..n {
                let mut placed = None;
                for _ in 0..RANDOM_SPAWN_ATTEMPTS {
                    let candidate = Position::new(
                        rng.gen_range(m..room.0 - m),
                        rng.gen_range(m..room.1 - m),
                    );
                    if candidate.distance_to(&target) >= RANDOM_SPAWN_MIN_DISTANCE {
                        placed = Some(candidate);
                        break;
                    }
                }
                let pos = placed.unwrap_or_else(|| {
                    clamp(
                        rng.gen_range(m..room.0 - m),
                        rng.gen_range(m..room.1 - m),
                        room,
                    )
                });
                out.push(pos);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const ALL: [SpawnPattern; 8] = [
        SpawnPattern::Surround,
        SpawnPattern::Ring,
        SpawnPattern::Corners,
        SpawnPattern::LineTop,
        SpawnPattern::LineBottom,
        SpawnPattern::Pincer,
        SpawnPattern::BehindPlayer,
        SpawnPattern::Random,
    ];

    #[test]
    fn test_every_pattern_stays_inside_margin() {
        let arena = ArenaBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let corner = Position::new(2.0, 2.0);
        for pattern in ALL {
            for pos in spawn_positions(pattern, 6, &arena, corner, DVec2::X, &mut rng) {
                assert!(pos.x >= SPAWN_MARGIN && pos.x <= arena.width_f() - 1.0 - SPAWN_MARGIN);
                assert!(pos.y >= SPAWN_MARGIN && pos.y <= arena.height_f() - 1.0 - SPAWN_MARGIN);
            }
        }
    }

    #[test]
    fn test_counts_match() {
        let arena = ArenaBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Position::new(39.0, 11.0);
        for pattern in ALL {
            assert_eq!(spawn_positions(pattern, 5, &arena, center, DVec2::X, &mut rng).len(), 5);
        }
    }

    #[test]
    fn test_behind_spawns_opposite_facing() {
        let arena = ArenaBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Position::new(39.0, 11.0);
        for pos in spawn_positions(SpawnPattern::BehindPlayer, 4, &arena, center, DVec2::X, &mut rng) {
            assert!(pos.x < center.x - 4.0);
        }
    }

    #[test]
    fn test_pincer_splits_flanks() {
        let arena = ArenaBounds::new(120, 60);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Position::new(60.0, 30.0);
        let spots = spawn_positions(SpawnPattern::Pincer, 4, &arena, center, DVec2::X, &mut rng);
        assert_eq!(spots.iter().filter(|p| p.y > center.y).count(), 2);
        assert_eq!(spots.iter().filter(|p| p.y < center.y).count(), 2);
    }

    #[test]
    fn test_random_keeps_distance_when_room_allows() {
        let arena = ArenaBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Position::new(39.0, 11.0);
        let spots = spawn_positions(SpawnPattern::Random, 10, &arena, center, DVec2::X, &mut rng);
        assert!(spots
            .iter()
            .all(|p| p.distance_to(&center) >= RANDOM_SPAWN_MIN_DISTANCE));
    }
}
