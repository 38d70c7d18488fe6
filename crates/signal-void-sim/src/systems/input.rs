//! Input-intent application.
//!
//! Intents are collected from queued commands before the tick and applied
//! once here. Everything is edge-triggered: an intent not consumed this
//! tick is gone.

use glam::DVec2;
use rand_chacha::ChaCha8Rng;

use signal_void_core::commands::PlayerCommand;
use signal_void_core::constants::{DASH_COOLDOWN_MIN, DASH_VELOCITY_THRESHOLD};
use signal_void_core::enums::CardinalDir;
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::EntityId;

use crate::ecs::World;
use crate::{verbs, weapons};

/// Player intents for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intents {
    /// Normalized movement direction, zero when idle.
    pub movement: DVec2,
    pub attack: Option<CardinalDir>,
    pub dash: bool,
    pub execute: bool,
    pub swap: bool,
}

impl Intents {
    /// Fold a command into this tick's intents. Later moves and attacks
    /// replace earlier ones.
    pub fn absorb(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Move { x, y } => {
                self.movement = DVec2::new(x, y).normalize_or_zero();
            }
            PlayerCommand::Attack { direction } => self.attack = Some(direction),
            PlayerCommand::Dash => self.dash = true,
            PlayerCommand::ExecuteChain => self.execute = true,
            PlayerCommand::SwapWeapon => self.swap = true,
        }
    }
}

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
    intents: &Intents,
) {
    apply_movement(world, player, intents);

    if intents.swap {
        if let Some(inv) = world.inventories.get_mut(player) {
            weapons::swap(inv);
        }
    }
    if let Some(direction) = intents.attack {
        weapons::execute_attack(world, rng, feedback, player, direction.vector());
    }
    if intents.execute {
        verbs::execute_chain(world, rng, feedback, player);
    }
    hold_beam(world, player);
}

fn apply_movement(world: &mut World, player: EntityId, intents: &Intents) {
    let cooldown_mult = world
        .stats
        .get(player)
        .map(|s| s.dash_cooldown_multiplier)
        .unwrap_or(1.0);
    let (Some(vel), Some(ctrl), Some(dash)) = (
        world.velocities.get_mut(player),
        world.controls.get_mut(player),
        world.dashes.get_mut(player),
    ) else {
        return;
    };
    if dash.is_dashing() {
        return;
    }

    let input = intents.movement;
    if input != DVec2::ZERO {
        vel.add(input * ctrl.acceleration);
        ctrl.last_move_x = input.x;
        ctrl.last_move_y = input.y;
    }

    if !intents.dash || dash.cooldown_remaining > 0 {
        return;
    }
    let heading = if input != DVec2::ZERO {
        input
    } else if vel.x.abs() > DASH_VELOCITY_THRESHOLD || vel.y.abs() > DASH_VELOCITY_THRESHOLD {
        vel.as_vec()
    } else {
        ctrl.last_move()
    };
    let heading = heading.normalize_or_zero();
    dash.dir_x = heading.x;
    dash.dir_y = heading.y;
    dash.frames_remaining = dash.duration;
    dash.cooldown_remaining = ((dash.cooldown as f64 * cooldown_mult) as u32).max(DASH_COOLDOWN_MIN);
}

/// A held beam roots the player and accumulates continuous beam time.
fn hold_beam(world: &mut World, player: EntityId) {
    let Some(attack) = world.attacks.get_mut(player) else {
        return;
    };
    if attack.active && attack.is_beam {
        attack.beam_continuous_frames += 1;
        if let Some(vel) = world.velocities.get_mut(player) {
            vel.set(DVec2::ZERO);
        }
    } else if !attack.is_beam {
        attack.beam_continuous_frames = 0;
    }
}
