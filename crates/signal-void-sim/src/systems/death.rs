//! Death resolution: enemy kills with their drops, then the player.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use signal_void_core::components::Archetype;
use signal_void_core::enums::{DashOutcome, DropCondition, GamePhase, Verb};
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::types::{EntityId, Position};

use crate::ecs::{ComponentKind as K, World};
use crate::{mods, verbs, vfx};

/// Reap every depleted enemy. Kills from this tick's first pass trigger the
/// weapon's on-kill hooks; enemies those hooks finish off are reaped too.
/// Returns the positions of everything killed.
pub fn enemies(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Option<EntityId>,
    events: &mut Vec<SimEvent>,
    feedback: &mut Vec<FeedbackEvent>,
) -> Vec<Position> {
    let mut killed = reap(world, rng, player, events, feedback);
    let Some(player) = player else {
        return killed;
    };
    for pos in killed.clone() {
        mods::on_kill(world, rng, player, pos, 0);
    }
    loop {
        let chained = reap(world, rng, Some(player), events, feedback);
        if chained.is_empty() {
            break;
        }
        killed.extend(chained);
    }
    killed
}

fn reap(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Option<EntityId>,
    events: &mut Vec<SimEvent>,
    feedback: &mut Vec<FeedbackEvent>,
) -> Vec<Position> {
    let mut killed = Vec::new();
    for id in world.query(&[K::Enemy, K::Health, K::Position]) {
        let (Some(health), Some(&pos), Some(tag)) =
            (world.healths.get(id), world.positions.get(id), world.enemies.get(id))
        else {
            continue;
        };
        if !health.is_depleted() {
            continue;
        }
        let kind = tag.kind;

        vfx::death_burst(world, rng, kind, pos);
        feedback.push(FeedbackEvent::Shake {
            intensity: 2,
            frames: 5,
        });
        events.push(SimEvent::EnemyKilled {
            kind,
            x: pos.x,
            y: pos.y,
        });
        if let Some(player) = player {
            drop_verbs(world, rng, player, id, pos, events);
        }
        world.destroy(id);
        killed.push(pos);
        log::debug!("{kind:?} {id} destroyed");
    }
    killed
}

fn drop_verbs(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: EntityId,
    enemy: EntityId,
    pos: Position,
    events: &mut Vec<SimEvent>,
) {
    if let Some(drop) = world.drops.get(enemy) {
        let earned = match drop.condition {
            DropCondition::Kill => true,
            DropCondition::Backstab => drop.backstabbed,
            DropCondition::Dodge => world.ais.get(enemy).is_some_and(|ai| {
                matches!(&ai.archetype, Archetype::Charge(c) if c.last_dash == DashOutcome::Dodged)
            }),
        };
        let verb = drop.verb;
        if earned && verbs::add_verb(world, player, verb) {
            events.push(SimEvent::VerbDropped {
                verb,
                x: pos.x,
                y: pos.y,
            });
        }
    }

    let bonus_rate = world.stats.get(player).map_or(0.0, |s| s.verb_drop_rate);
    if bonus_rate > 0.0 && rng.gen::<f64>() < bonus_rate {
        if let Some(&verb) = Verb::ALL.choose(rng) {
            if verbs::add_verb(world, player, verb) {
                events.push(SimEvent::VerbDropped {
                    verb,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }
    }
}

/// Check the player's health. Returns the new phase when the run just ended.
pub fn player(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: EntityId,
    phase: GamePhase,
    events: &mut Vec<SimEvent>,
) -> Option<GamePhase> {
    if phase != GamePhase::Playing {
        return None;
    }
    let depleted = world.healths.get(player).is_some_and(|h| h.is_depleted());
    if !depleted {
        return None;
    }
    if let Some(&pos) = world.positions.get(player) {
        vfx::explosion(world, rng, pos, &vfx::PLAYER_DEATH_BURST);
    }
    if let Some(render) = world.renderables.get_mut(player) {
        render.visible = false;
    }
    events.push(SimEvent::PlayerDied);
    log::info!("player {player} died");
    Some(GamePhase::GameOver)
}
