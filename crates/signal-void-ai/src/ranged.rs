//! Ranged archetypes: the kiting Spammer and the hitscan Sniper.
//!
//! Ranged timers are in seconds and advance by one tick length per update.

use glam::DVec2;
use signal_void_core::components::{AiBehavior, RangedAttack, SniperState};
use signal_void_core::constants::*;
use signal_void_core::enums::{AiState, SniperPhase};
use signal_void_core::types::Position;

use crate::fsm::{strafe, AiAction, AiUpdate, Sense};

pub(crate) fn spammer(ai: &mut AiBehavior, ranged: &mut RangedAttack, s: &Sense, out: &mut AiUpdate) {
    match ai.state {
        AiState::Flee => {
            out.velocity.add(-s.dir * 0.5);
            if s.dist > SPAMMER_FLEE_RANGE + 3.0 || ai.state_timer > SPAMMER_FLEE_TICKS {
                ai.enter(AiState::Chase);
            }
        }
        AiState::Chase => {
            if s.dist < SPAMMER_FLEE_RANGE {
                ai.enter(AiState::Flee);
                return;
            }
            if s.dist < SPAMMER_PREFERRED_RANGE - 2.0 {
                out.velocity.add(-s.dir * ai.move_speed * 0.2);
            } else if s.dist > SPAMMER_PREFERRED_RANGE + 3.0 {
                out.velocity.add(s.dir * ai.move_speed * 0.2);
            }
            out.velocity
                .add(strafe(s.dir, ai.state_timer, SPAMMER_STRAFE_PERIOD) * ai.move_speed * 0.15);
        }
        _ => ai.enter(AiState::Chase),
    }

    if ai.state == AiState::Flee {
        return;
    }

    ranged.cooldown_timer -= TICK_SECS;
    if ranged.charging {
        ranged.charge_timer += TICK_SECS;
        out.telegraphing = true;
        out.tint = Some(if (ranged.charge_timer * 10.0) as i64 % 2 == 0 {
            WHITE
        } else {
            NEON_YELLOW
        });
        if ranged.charge_timer >= ranged.telegraph_secs {
            out.actions.push(AiAction::FireProjectile {
                direction: s.dir,
                speed: ranged.projectile_speed,
                damage: ranged.projectile_damage,
            });
            ranged.charging = false;
            ranged.charge_timer = 0.0;
            ranged.cooldown_timer = ranged.cooldown_secs;
        }
    } else if ranged.cooldown_timer <= 0.0 {
        ranged.charging = true;
        ranged.charge_timer = 0.0;
    }
}

pub(crate) fn sniper(ai: &mut AiBehavior, sniper: &mut SniperState, s: &Sense, out: &mut AiUpdate) {
    if matches!(sniper.phase, SniperPhase::Idle | SniperPhase::Cooldown) {
        if s.dist < SNIPER_PREFERRED_RANGE - 3.0 {
            out.velocity.add(-s.dir * ai.move_speed * 0.3);
        } else if s.dist > SNIPER_PREFERRED_RANGE + 5.0 {
            out.velocity.add(s.dir * ai.move_speed * 0.15);
        }
        out.velocity
            .add(strafe(s.dir, ai.state_timer, SNIPER_STRAFE_PERIOD) * ai.move_speed * 0.1);
    }

    match sniper.phase {
        SniperPhase::Idle => {
            sniper.fire_cooldown_timer -= TICK_SECS;
            if sniper.fire_cooldown_timer <= 0.0 {
                sniper.phase = SniperPhase::Tracking;
                sniper.charge_timer = 0.0;
                sniper.aim_x = s.dir.x;
                sniper.aim_y = s.dir.y;
            }
        }
        SniperPhase::Tracking => {
            out.velocity.scale(0.8);
            out.telegraphing = true;
            sniper.charge_timer += TICK_SECS;
            if sniper.charge_timer < sniper.charge_duration - sniper.lock_time {
                sniper.aim_x = s.dir.x;
                sniper.aim_y = s.dir.y;
            } else {
                sniper.phase = SniperPhase::Locked;
            }
            out.tint = Some(if (sniper.charge_timer * 8.0) as i64 % 2 == 0 {
                WHITE
            } else {
                NEON_RED
            });
        }
        SniperPhase::Locked => {
            out.velocity.scale(0.5);
            out.telegraphing = true;
            sniper.charge_timer += TICK_SECS;
            out.tint = Some(if (sniper.charge_timer * 15.0) as i64 % 2 == 0 {
                WHITE
            } else {
                NEON_RED
            });
            if sniper.charge_timer >= sniper.charge_duration {
                sniper.phase = SniperPhase::Firing;
                sniper.fire_frames = sniper.fire_duration;
                out.actions.push(AiAction::SniperHitscan {
                    aim: sniper.aim(),
                    damage: sniper.beam_damage,
                });
                log::trace!("sniper fired along ({:.2}, {:.2})", sniper.aim_x, sniper.aim_y);
            }
        }
        SniperPhase::Firing => {
            out.velocity.set(DVec2::ZERO);
            out.tint = Some(WHITE);
            sniper.fire_frames = sniper.fire_frames.saturating_sub(1);
            if sniper.fire_frames == 0 {
                sniper.phase = SniperPhase::Cooldown;
                sniper.cooldown_timer = sniper.cooldown_duration;
            }
        }
        SniperPhase::Cooldown => {
            sniper.cooldown_timer -= TICK_SECS;
            out.tint = Some(DIM_RED);
            if sniper.cooldown_timer <= 0.0 {
                sniper.phase = SniperPhase::Idle;
                sniper.fire_cooldown_timer = sniper.fire_cooldown;
            }
        }
    }
}

/// Whether `target` lies inside the beam from `origin` along unit `aim`:
/// ahead of the origin and within `half_width` of the line.
pub fn beam_hits(origin: Position, aim: DVec2, target: Position, half_width: f64) -> bool {
    let d = origin.offset_to(&target);
    let along = d.dot(aim);
    if along < 0.0 {
        return false;
    }
    let perp = d - aim * along;
    perp.length() < half_width
}
