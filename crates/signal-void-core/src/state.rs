//! Simulation snapshot: the read-only view handed to presentation after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{FeedbackEvent, SimEvent};
use crate::types::{EntityId, Position, SimTime};

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub depth: u32,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectile_count: usize,
    pub enemy_projectile_count: usize,
    pub telegraph_count: usize,
    pub particle_count: usize,
    pub waves: WaveView,
    pub kill_streak: u32,
    pub events: Vec<SimEvent>,
    pub feedback: Vec<FeedbackEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: EntityId,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub dashing: bool,
    pub dash_cooldown: u32,
    pub invulnerable_frames: u32,
    pub verbs: Vec<Verb>,
    pub max_verbs: usize,
    pub weapon: Option<WeaponKind>,
    pub mods: Vec<ModKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub state: AiState,
    /// Set while the enemy is winding up a visible attack.
    pub telegraphing: bool,
}

/// Wave director progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub template: String,
    pub current_wave: usize,
    pub total_waves: usize,
    pub total_spawned: u32,
    pub total_killed: u32,
    pub announcement: Option<String>,
    pub intro: Option<String>,
    pub room_cleared: bool,
}
