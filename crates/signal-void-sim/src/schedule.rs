//! Tick pipeline: the fixed order in which systems run.
//!
//! The scheduler owns no game state. Everything a stage needs is lent to it
//! through [`TickContext`] for the duration of one tick.

use glam::DVec2;
use rand_chacha::ChaCha8Rng;

use signal_void_core::enums::GamePhase;
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::types::EntityId;

use crate::config::ArenaBounds;
use crate::ecs::World;
use crate::{mods, vfx};
use crate::systems::input::Intents;
use crate::systems::streak::KillStreak;
use crate::systems::{ai, combat, dash, death, input, movement, projectiles, timers};
use crate::waves::{telegraph_system, SpawnAnchor, WaveDirector};

/// One step of the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Waves,
    Ai,
    Dash,
    Trail,
    Movement,
    Gravity,
    Boundary,
    Combat,
    Projectiles,
    ModPassives,
    KillStreak,
    Death,
    Cooldowns,
    VisualTimers,
    Lifetimes,
    Sweep,
}

/// Full pipeline for a room in play.
pub const PIPELINE: [Stage; 17] = [
    Stage::Input,
    Stage::Waves,
    Stage::Ai,
    Stage::Dash,
    Stage::Trail,
    Stage::Movement,
    Stage::Gravity,
    Stage::Boundary,
    Stage::Combat,
    Stage::Projectiles,
    Stage::ModPassives,
    Stage::KillStreak,
    Stage::Death,
    Stage::Cooldowns,
    Stage::VisualTimers,
    Stage::Lifetimes,
    Stage::Sweep,
];

/// After a room clears or the run ends, only leftover particles keep moving.
pub const RESIDUAL: [Stage; 4] = [Stage::Movement, Stage::Gravity, Stage::Lifetimes, Stage::Sweep];

/// Everything the stages of one tick may touch.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut ChaCha8Rng,
    pub arena: &'a ArenaBounds,
    pub director: &'a mut WaveDirector,
    pub streak: &'a mut KillStreak,
    pub phase: &'a mut GamePhase,
    pub player: Option<EntityId>,
    pub intents: &'a Intents,
    pub events: &'a mut Vec<SimEvent>,
    pub feedback: &'a mut Vec<FeedbackEvent>,
}

pub fn run_pipeline(stages: &[Stage], ctx: &mut TickContext<'_>) {
    for &stage in stages {
        run_stage(stage, ctx);
    }
}

pub fn run_stage(stage: Stage, ctx: &mut TickContext<'_>) {
    let player = ctx.player.filter(|&p| ctx.world.is_alive(p));
    match stage {
        Stage::Input => {
            if let Some(p) = player {
                input::run(ctx.world, ctx.rng, ctx.feedback, p, ctx.intents);
            }
        }
        Stage::Waves => {
            if let Some(anchor) = player.and_then(|p| spawn_anchor(ctx.world, p)) {
                ctx.director.update(ctx.world, ctx.rng, ctx.arena, anchor, ctx.events);
            }
            telegraph_system(ctx.world, ctx.rng);
        }
        Stage::Ai => {
            if let Some(p) = player {
                ai::run(ctx.world, ctx.rng, p);
            }
        }
        Stage::Dash => dash::run(ctx.world),
        Stage::Trail => dash::record_trail(ctx.world),
        Stage::Movement => movement::run(ctx.world, player),
        Stage::Gravity => movement::gravity(ctx.world),
        Stage::Boundary => {
            let first = ctx.events.len();
            movement::boundary(ctx.world, ctx.arena, ctx.events);
            vfx::wall_bumps(ctx.world, ctx.rng, player, &ctx.events[first..], ctx.feedback);
        }
        Stage::Combat => {
            if let Some(p) = player {
                combat::player_attacks(ctx.world, ctx.rng, ctx.feedback, p);
                combat::contact(ctx.world, ctx.rng, p, ctx.events, ctx.feedback);
            }
        }
        Stage::Projectiles => {
            projectiles::player_projectiles(ctx.world, ctx.rng, ctx.arena, player, ctx.feedback);
            if let Some(p) = player {
                projectiles::enemy_projectiles(ctx.world, ctx.rng, ctx.arena, p, ctx.feedback);
            }
        }
        Stage::ModPassives => {
            mods::echo_system(ctx.world, ctx.rng, ctx.feedback);
            mods::hazard_system(ctx.world);
            mods::async_system(ctx.world, ctx.rng, ctx.feedback);
            mods::grep_system(ctx.world);
            mods::shockwave_system(ctx.world, ctx.rng);
        }
        Stage::KillStreak => ctx.streak.tick(),
        Stage::Death => {
            let kills = death::enemies(ctx.world, ctx.rng, player, ctx.events, ctx.feedback);
            ctx.director.record_kills(kills.len() as u32);
            ctx.streak.record(ctx.world, ctx.rng, &kills, ctx.feedback);
            if let Some(p) = player {
                if let Some(next) = death::player(ctx.world, ctx.rng, p, *ctx.phase, ctx.events) {
                    *ctx.phase = next;
                }
            }
        }
        Stage::Cooldowns => timers::cooldowns(ctx.world),
        Stage::VisualTimers => timers::hit_flash(ctx.world),
        Stage::Lifetimes => timers::lifetimes(ctx.world),
        Stage::Sweep => {
            if *ctx.phase == GamePhase::Playing && ctx.director.is_room_cleared(ctx.world) {
                *ctx.phase = GamePhase::RoomCleared;
                let depth = ctx.director.depth();
                ctx.events.push(SimEvent::RoomCleared { depth });
                log::info!("room at depth {depth} cleared");
            }
            ctx.world.sweep();
        }
    }
}

fn spawn_anchor(world: &World, player: EntityId) -> Option<SpawnAnchor> {
    let position = *world.positions.get(player)?;
    let facing = world
        .controls
        .get(player)
        .map_or(DVec2::X, |c| c.last_move());
    Some(SpawnAnchor { position, facing })
}
