//! Syntax chain: collected verbs and the Logic Blast.

use signal_void_core::components::{AttackMultiplier, Invulnerable, Knockback};
use signal_void_core::constants::*;
use signal_void_core::enums::Verb;
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::{EntityId, Position};

use rand_chacha::ChaCha8Rng;

use crate::ecs::{ComponentKind as K, World};
use crate::vfx;

pub fn describe(verb: Verb) -> &'static str {
    match verb {
        Verb::Recursive => "Next attack hits twice",
        Verb::Sudo => "Temporary invincibility",
        Verb::Dash => "Increased move speed",
        Verb::Slice => "Damage boost",
        Verb::Void => "Area damage",
        Verb::Null => "Reset cooldowns",
    }
}

/// Append `verb` if the buffer has room.
pub fn add_verb(world: &mut World, player: EntityId, verb: Verb) -> bool {
    match world.syntax_buffers.get_mut(player) {
        Some(buffer) if !buffer.is_full() => {
            buffer.verbs.push(verb);
            true
        }
        _ => false,
    }
}

/// Eject the newest verb.
pub fn pop_verb(world: &mut World, player: EntityId) -> Option<Verb> {
    world.syntax_buffers.get_mut(player)?.verbs.pop()
}

fn blast_radius(world: &World, player: EntityId) -> f64 {
    let mult = world
        .stats
        .get(player)
        .map(|s| s.logic_blast_radius_multiplier)
        .unwrap_or(1.0);
    LOGIC_BLAST_RADIUS * mult
}

fn apply_verb(world: &mut World, player: EntityId, verb: Verb) {
    match verb {
        Verb::Recursive => match world.attack_multipliers.get_mut(player) {
            Some(m) => {
                m.hits = 2;
                m.uses_remaining = 3;
            }
            None => world.add(
                player,
                AttackMultiplier {
                    hits: 2,
                    uses_remaining: 3,
                    ..Default::default()
                },
            ),
        },
        Verb::Sudo => world.add(
            player,
            Invulnerable {
                frames: SUDO_VERB_IFRAMES,
            },
        ),
        Verb::Dash => {
            if let Some(max) = world.max_speeds.get_mut(player) {
                max.value *= 1.5;
            }
        }
        Verb::Slice => match world.attack_multipliers.get_mut(player) {
            Some(m) => {
                m.damage_multiplier = 2.0;
                m.uses_remaining = m.uses_remaining.max(5);
            }
            None => world.add(
                player,
                AttackMultiplier {
                    damage_multiplier: 2.0,
                    uses_remaining: 5,
                    ..Default::default()
                },
            ),
        },
        Verb::Void => {
            let Some(&origin) = world.positions.get(player) else {
                return;
            };
            let radius = blast_radius(world, player);
            for id in world.query(&[K::Enemy, K::Position, K::Health]) {
                let (Some(pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
                    continue;
                };
                if origin.distance_to(pos) < radius {
                    health.current -= VOID_VERB_DAMAGE;
                }
            }
        }
        Verb::Null => {
            if let Some(dash) = world.dashes.get_mut(player) {
                dash.cooldown_remaining = 0;
            }
        }
    }
}

/// Run every buffered verb then the Logic Blast. Only a full buffer executes.
pub fn execute_chain(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
) -> bool {
    let verbs = match world.syntax_buffers.get(player) {
        Some(buffer) if buffer.is_full() => buffer.verbs.clone(),
        _ => return false,
    };
    for verb in &verbs {
        apply_verb(world, player, *verb);
    }
    if let Some(&origin) = world.positions.get(player) {
        logic_blast(world, rng, feedback, player, origin);
    }
    if let Some(buffer) = world.syntax_buffers.get_mut(player) {
        buffer.verbs.clear();
    }
    log::debug!("syntax chain executed: {verbs:?}");
    true
}

fn logic_blast(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    feedback: &mut Vec<FeedbackEvent>,
    player: EntityId,
    origin: Position,
) {
    feedback.push(FeedbackEvent::Shake {
        intensity: 3,
        frames: 10,
    });
    feedback.push(FeedbackEvent::HitStop { frames: 5 });

    let radius = blast_radius(world, player);
    for id in world.query(&[K::Enemy, K::Position, K::Health]) {
        let (Some(&pos), Some(health)) = (world.positions.get(id), world.healths.get_mut(id)) else {
            continue;
        };
        let offset = origin.offset_to(&pos);
        let dist = offset.length();
        if dist > radius {
            continue;
        }
        health.current -= LOGIC_BLAST_DAMAGE;
        if dist > 0.0 {
            world.add(id, Knockback::with_decay(offset / dist * LOGIC_BLAST_KNOCKBACK, 0.6));
        }
    }
    vfx::logic_blast_wave(world, rng, origin);
}
