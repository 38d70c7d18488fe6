//! Enemy behavior finite state machine.
//!
//! Pure functions that advance an enemy's `AiBehavior` by one tick and
//! return the resulting velocity plus any side effects the simulation must
//! carry out (projectiles, hitscans, dash sparks). No store dependency;
//! everything operates on plain data.

use glam::DVec2;
use signal_void_core::components::{AiBehavior, Archetype};
use signal_void_core::constants::FACING_MIN_COMPONENT;
use signal_void_core::enums::AiState;
use signal_void_core::types::{Position, Velocity};

use crate::{charge, melee, ranged};

/// Input to the FSM for a single enemy.
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub position: Position,
    pub velocity: Velocity,
    pub target: Position,
    pub target_velocity: Velocity,
}

/// Side effects requested by a behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum AiAction {
    /// Spawn an enemy projectile from the enemy's position.
    FireProjectile {
        direction: DVec2,
        speed: f64,
        damage: i32,
    },
    /// Resolve an instant beam along `aim` from the enemy's position.
    SniperHitscan { aim: DVec2, damage: i32 },
    /// Cosmetic spark behind a dashing enemy.
    DashSpark,
}

/// Output from the FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct AiUpdate {
    pub velocity: Velocity,
    /// The enemy is visibly winding up an attack.
    pub telegraphing: bool,
    /// Colour override for this tick, if any.
    pub tint: Option<u8>,
    pub actions: Vec<AiAction>,
}

impl AiUpdate {
    fn hold(velocity: Velocity) -> Self {
        Self {
            velocity,
            telegraphing: false,
            tint: None,
            actions: Vec::new(),
        }
    }
}

/// Derived geometry shared by every behavior.
pub(crate) struct Sense {
    pub dist: f64,
    pub dir: DVec2,
    pub position: Position,
    pub target: Position,
    pub target_velocity: Velocity,
}

/// Advance one enemy by one tick.
pub fn evaluate(ai: &mut AiBehavior, ctx: &AiContext) -> AiUpdate {
    let offset = ctx.position.offset_to(&ctx.target);
    let sense = Sense {
        dist: offset.length(),
        dir: offset.normalize_or_zero(),
        position: ctx.position,
        target: ctx.target,
        target_velocity: ctx.target_velocity,
    };

    // A dashing Overclocker keeps its locked heading.
    let dashing = matches!(ai.archetype, Archetype::Charge(_)) && ai.state == AiState::Attack;
    if !dashing {
        update_facing(ai, sense.dir);
    }

    ai.state_timer += 1;
    if matches!(ai.state, AiState::Idle | AiState::Detect) {
        ai.enter(AiState::Chase);
    }

    let mut out = AiUpdate::hold(ctx.velocity);
    let mut archetype = ai.archetype;
    match &mut archetype {
        Archetype::Chase => melee::chase(ai, &sense, &mut out),
        Archetype::Guard => melee::guard(ai, &sense, &mut out),
        Archetype::Charge(charge) => charge::evaluate(ai, charge, &sense, &mut out),
        Archetype::Spammer(ranged) => ranged::spammer(ai, ranged, &sense, &mut out),
        Archetype::Sniper(sniper) => ranged::sniper(ai, sniper, &sense, &mut out),
    }
    ai.archetype = archetype;
    out
}

/// Velocity of a stunned enemy: no behavior runs and motion bleeds off.
pub fn stunned_velocity(velocity: Velocity) -> Velocity {
    Velocity::new(velocity.x * 0.5, velocity.y * 0.5)
}

/// Turn toward `dir`, instantly or at `turn_speed` radians per tick along
/// the shortest arc. A shield stagger freezes facing while it counts down.
pub fn update_facing(ai: &mut AiBehavior, dir: DVec2) {
    if ai.shield_stagger > 0 {
        ai.shield_stagger -= 1;
        return;
    }
    if dir.x.abs() <= FACING_MIN_COMPONENT && dir.y.abs() <= FACING_MIN_COMPONENT {
        return;
    }
    if ai.turn_speed <= 0.0 {
        ai.set_facing(dir);
        return;
    }

    let current = ai.facing_y.atan2(ai.facing_x);
    let target = dir.y.atan2(dir.x);
    let mut diff = target - current;
    while diff > std::f64::consts::PI {
        diff -= std::f64::consts::TAU;
    }
    while diff < -std::f64::consts::PI {
        diff += std::f64::consts::TAU;
    }

    if diff.abs() <= ai.turn_speed {
        ai.set_facing(dir);
    } else {
        let angle = current + diff.signum() * ai.turn_speed;
        ai.set_facing(DVec2::from_angle(angle));
    }
}

/// Perpendicular strafe direction, reversing every `period` ticks.
pub(crate) fn strafe(dir: DVec2, state_timer: u32, period: u32) -> DVec2 {
    let lateral = DVec2::new(-dir.y, dir.x);
    if (state_timer / period) % 2 == 0 {
        -lateral
    } else {
        lateral
    }
}
