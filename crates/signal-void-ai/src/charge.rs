//! Overclocker: orbit, wind up, dash through a locked point, recover.

use signal_void_core::components::{AiBehavior, ChargeAttack};
use signal_void_core::constants::*;
use signal_void_core::enums::{AiState, DashOutcome};

use crate::fsm::{strafe, AiAction, AiUpdate, Sense};

pub(crate) fn evaluate(ai: &mut AiBehavior, charge: &mut ChargeAttack, s: &Sense, out: &mut AiUpdate) {
    match ai.state {
        AiState::Chase => {
            if s.dist < CHARGE_ORBIT_RADIUS - 1.0 {
                out.velocity.add(-s.dir * ai.move_speed * 0.15);
            } else if s.dist > CHARGE_ORBIT_RADIUS + 2.0 {
                out.velocity.add(s.dir * ai.move_speed * 0.25);
            }
            out.velocity
                .add(strafe(s.dir, ai.state_timer, CHARGE_STRAFE_PERIOD) * ai.move_speed * 0.15);

            if ai.state_timer > CHARGE_ORBIT_DWELL {
                ai.enter(AiState::Charge);
                charge.charging = true;
                charge.charge_timer = 0;
                charge.target = s.target;
            }
        }
        AiState::Charge => {
            out.velocity.scale(0.7);
            charge.charge_timer += 1;
            out.telegraphing = true;
            out.tint = Some(if charge.charge_timer % 4 < 2 {
                NEON_RED
            } else {
                NEON_ORANGE
            });

            if (charge.charge_timer as f64) < charge.charge_time as f64 * CHARGE_TRACK_FRACTION {
                charge.target = s.target;
            }

            if charge.charge_timer >= charge.charge_time {
                let heading = s.position.direction_to(&charge.target);
                if heading.length_squared() > 0.0 {
                    ai.set_facing(heading);
                }
                ai.enter(AiState::Attack);
                charge.charging = false;
                charge.contact_this_dash = false;
                log::trace!("overclocker dash toward ({:.1}, {:.1})", charge.target.x, charge.target.y);
            }
        }
        AiState::Attack => {
            if ai.state_timer < CHARGE_DASH_TICKS {
                out.velocity.set(ai.facing() * charge.charge_speed);
                if ai.state_timer % 2 == 0 {
                    out.actions.push(AiAction::DashSpark);
                }
            } else {
                charge.last_dash = if charge.contact_this_dash {
                    DashOutcome::Connected
                } else {
                    DashOutcome::Dodged
                };
                ai.enter(AiState::Recover);
            }
        }
        AiState::Recover => {
            out.velocity.scale(0.85);
            if ai.state_timer > CHARGE_RECOVER_TICKS {
                ai.enter(AiState::Chase);
            }
        }
        _ => ai.enter(AiState::Chase),
    }
}
