//! Dash override and ghost trail recording.

use signal_void_core::types::Velocity;

use crate::ecs::{ComponentKind as K, World};

/// Tick dash cooldowns; an active dash replaces velocity outright.
pub fn run(world: &mut World) {
    for id in world.query(&[K::DashState, K::Velocity, K::PlayerControlled]) {
        let Some(dash) = world.dashes.get_mut(id) else {
            continue;
        };
        dash.cooldown_remaining = dash.cooldown_remaining.saturating_sub(1);
        if dash.frames_remaining == 0 {
            continue;
        }
        dash.frames_remaining -= 1;
        let vel = Velocity::new(dash.dir_x * dash.speed, dash.dir_y * dash.speed);
        world.velocities.insert(id, vel);
    }
}

/// Record pre-movement positions while dashing; shed one echo per tick otherwise.
pub fn record_trail(world: &mut World) {
    for id in world.query(&[K::GhostTrail, K::Position, K::DashState]) {
        let (Some(&pos), Some(dash), Some(trail)) = (
            world.positions.get(id),
            world.dashes.get(id),
            world.ghost_trails.get_mut(id),
        ) else {
            continue;
        };
        if dash.is_dashing() {
            trail.positions.push_back(pos);
            while trail.positions.len() > trail.max_echoes {
                trail.positions.pop_front();
            }
        } else {
            trail.positions.pop_front();
        }
    }
}
