//! Melee archetypes: the lunging chaser and the shielded guard.

use signal_void_core::components::AiBehavior;
use signal_void_core::constants::*;
use signal_void_core::enums::AiState;

use crate::fsm::{AiUpdate, Sense};

/// Chase → lunge → recover.
pub(crate) fn chase(ai: &mut AiBehavior, s: &Sense, out: &mut AiUpdate) {
    match ai.state {
        AiState::Chase => {
            out.velocity.add(s.dir * ai.move_speed * 0.3);
            if s.dist < CHASE_LUNGE_RANGE && ai.state_timer > CHASE_LUNGE_DWELL {
                ai.enter(AiState::Attack);
            }
        }
        AiState::Attack => {
            if ai.state_timer < CHASE_LUNGE_TICKS {
                out.velocity.add(s.dir * CHASE_LUNGE_IMPULSE);
            } else {
                ai.enter(AiState::Recover);
            }
        }
        AiState::Recover => {
            out.velocity.scale(0.85);
            if ai.state_timer > CHASE_RECOVER_TICKS {
                ai.enter(AiState::Chase);
            }
        }
        _ => ai.enter(AiState::Chase),
    }
}

/// Intercept the target's predicted position, bash when it is in front.
pub(crate) fn guard(ai: &mut AiBehavior, s: &Sense, out: &mut AiUpdate) {
    match ai.state {
        AiState::Chase => {
            let tv = s.target_velocity;
            let mut heading = s.dir;
            if tv.x.abs() > GUARD_PREDICT_MIN_SPEED || tv.y.abs() > GUARD_PREDICT_MIN_SPEED {
                let future = s.target.as_vec() + tv.as_vec() * GUARD_PREDICT_TICKS;
                let to_future = future - s.position.as_vec();
                if to_future.length() > 0.0 {
                    heading = to_future.normalize();
                }
            }
            out.velocity.add(heading * ai.move_speed * 0.2);

            if s.dist < ai.attack_range {
                let front = s.dir.dot(ai.facing());
                if front > GUARD_BASH_FRONT_DOT && ai.state_timer > GUARD_BASH_COOLDOWN {
                    ai.enter(AiState::Attack);
                }
            }
        }
        AiState::Attack => {
            if ai.state_timer < GUARD_BASH_TICKS {
                out.velocity.set(ai.facing() * GUARD_BASH_SPEED);
                out.telegraphing = true;
            } else {
                ai.enter(AiState::Recover);
            }
        }
        AiState::Recover => {
            out.velocity.scale(0.8);
            if ai.state_timer > GUARD_RECOVER_TICKS {
                ai.enter(AiState::Chase);
            }
        }
        _ => ai.enter(AiState::Chase),
    }
}
