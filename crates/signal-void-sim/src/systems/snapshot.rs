//! Snapshot system: queries the world and builds a complete SimSnapshot.
//!
//! Read-only; it never modifies the world.

use signal_void_core::components::{AiBehavior, Archetype};
use signal_void_core::enums::{AiState, GamePhase, SniperPhase};
use signal_void_core::events::{FeedbackEvent, SimEvent};
use signal_void_core::state::*;
use signal_void_core::types::{EntityId, SimTime};

use crate::ecs::{ComponentKind as K, World};

/// Engine-side state that is not stored on entities.
pub struct SnapshotInput<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub depth: u32,
    pub player: Option<EntityId>,
    pub waves: WaveView,
    pub kill_streak: u32,
    pub events: &'a [SimEvent],
    pub feedback: &'a [FeedbackEvent],
}

pub fn build_snapshot(world: &World, input: SnapshotInput<'_>) -> SimSnapshot {
    SimSnapshot {
        time: input.time,
        phase: input.phase,
        depth: input.depth,
        player: input.player.and_then(|p| build_player(world, p)),
        enemies: build_enemies(world),
        projectile_count: world.query(&[K::Projectile]).len(),
        enemy_projectile_count: world.query(&[K::EnemyProjectile]).len(),
        telegraph_count: world.query(&[K::SpawnTelegraph]).len(),
        particle_count: world.query(&[K::Particle]).len(),
        waves: input.waves,
        kill_streak: input.kill_streak,
        events: input.events.to_vec(),
        feedback: input.feedback.to_vec(),
    }
}

fn build_player(world: &World, id: EntityId) -> Option<PlayerView> {
    let position = *world.positions.get(id)?;
    let health = world.healths.get(id)?;
    let dash = world.dashes.get(id);
    let buffer = world.syntax_buffers.get(id);
    let weapon = world.inventories.get(id).and_then(|inv| inv.active());

    Some(PlayerView {
        id,
        position,
        health: health.current,
        max_health: health.maximum,
        dashing: dash.is_some_and(|d| d.is_dashing()),
        dash_cooldown: dash.map_or(0, |d| d.cooldown_remaining),
        invulnerable_frames: world.invulnerables.get(id).map_or(0, |i| i.frames),
        verbs: buffer.map(|b| b.verbs.clone()).unwrap_or_default(),
        max_verbs: buffer.map_or(0, |b| b.max_verbs),
        weapon: weapon.map(|w| w.kind),
        mods: weapon.map(|w| w.mods.clone()).unwrap_or_default(),
    })
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    world
        .query(&[K::Enemy, K::Position, K::Health])
        .into_iter()
        .filter_map(|id| {
            let health = world.healths.get(id)?;
            let ai = world.ais.get(id);
            Some(EnemyView {
                id,
                kind: world.enemies.get(id)?.kind,
                position: *world.positions.get(id)?,
                health: health.current,
                max_health: health.maximum,
                state: ai.map_or(AiState::Idle, |a| a.state),
                telegraphing: ai.is_some_and(is_winding_up),
            })
        })
        .collect()
}

/// Whether the enemy is visibly charging an attack.
fn is_winding_up(ai: &AiBehavior) -> bool {
    match &ai.archetype {
        Archetype::Charge(c) => c.charging,
        Archetype::Spammer(r) => r.charging,
        Archetype::Sniper(s) => matches!(s.phase, SniperPhase::Tracking | SniperPhase::Locked),
        Archetype::Chase | Archetype::Guard => false,
    }
}
