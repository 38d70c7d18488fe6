//! Kinematics: knockback, friction, speed caps, integration and the arena walls.
//!
//! All rates are per tick; there is no `dt` scaling.

use signal_void_core::constants::*;
use signal_void_core::events::SimEvent;
use signal_void_core::types::EntityId;

use crate::config::ArenaBounds;
use crate::ecs::{ComponentKind as K, World};

/// Integrate every entity with a position and a velocity.
pub fn run(world: &mut World, player: Option<EntityId>) {
    let speed_mult = player
        .and_then(|p| world.stats.get(p))
        .map_or(1.0, |s| s.move_speed_multiplier);

    for id in world.query(&[K::Position, K::Velocity]) {
        let Some(mut vel) = world.velocities.get(id).copied() else {
            continue;
        };

        if let Some(kb) = world.knockbacks.get_mut(id) {
            vel.x += kb.x;
            vel.y += kb.y;
            kb.x *= kb.decay;
            kb.y *= kb.decay;
            if kb.x.abs() < KNOCKBACK_EPSILON && kb.y.abs() < KNOCKBACK_EPSILON {
                world.knockbacks.remove(id);
            }
        }

        if let Some(friction) = world.frictions.get(id) {
            vel.scale(friction.factor);
        }

        if let Some(max) = world.max_speeds.get(id) {
            let cap = if Some(id) == player {
                max.value * speed_mult
            } else {
                max.value
            };
            let speed = vel.speed();
            if speed > cap && speed > 0.0 {
                vel.scale(cap / speed);
            }
        }

        if let Some(pos) = world.positions.get_mut(id) {
            pos.x += vel.x;
            pos.y += vel.y;
        }

        if vel.x.abs() < VELOCITY_EPSILON {
            vel.x = 0.0;
        }
        if vel.y.abs() < VELOCITY_EPSILON {
            vel.y = 0.0;
        }
        world.velocities.insert(id, vel);
    }
}

pub fn gravity(world: &mut World) {
    for id in world.query(&[K::Gravity, K::Velocity]) {
        let Some(strength) = world.gravities.get(id).map(|g| g.strength) else {
            continue;
        };
        if let Some(vel) = world.velocities.get_mut(id) {
            vel.y += strength;
        }
    }
}

/// Keep bodies inside the arena. Particles and projectiles are exempt; their
/// own systems handle leaving the field. Hard impacts are only reported as
/// [`SimEvent::WallHit`]; reacting to them is left to the caller.
pub fn boundary(world: &mut World, arena: &ArenaBounds, events: &mut Vec<SimEvent>) {
    let m = arena.margin as f64;
    let max_x = arena.width_f() - m - 1.0;
    let max_y = arena.height_f() - m - 1.0;

    for id in world.query(&[K::Position, K::Velocity]) {
        if world.particles.contains(id)
            || world.projectiles.contains(id)
            || world.enemy_projectiles.contains(id)
        {
            continue;
        }
        let (Some(pos), Some(vel)) = (world.positions.get_mut(id), world.velocities.get_mut(id))
        else {
            continue;
        };

        let mut impact: f64 = 0.0;
        if pos.x < m {
            pos.x = m;
            impact = impact.max(vel.x.abs());
            vel.x = 0.0;
        } else if pos.x > max_x {
            pos.x = max_x;
            impact = impact.max(vel.x.abs());
            vel.x = 0.0;
        }
        if pos.y < m {
            pos.y = m;
            impact = impact.max(vel.y.abs());
            vel.y = 0.0;
        } else if pos.y > max_y {
            pos.y = max_y;
            impact = impact.max(vel.y.abs());
            vel.y = 0.0;
        }

        if impact > WALL_HIT_MIN_SPEED {
            events.push(SimEvent::WallHit {
                entity: id,
                impact_speed: impact,
            });
        }
    }
}
