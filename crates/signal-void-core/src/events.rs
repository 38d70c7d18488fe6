//! Events emitted by the simulation for presentation and progression.

use serde::{Deserialize, Serialize};

use crate::enums::{EnemyKind, Verb};
use crate::types::EntityId;

/// Gameplay events. Consumers use these for stats, effects and pickups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    EnemyKilled { kind: EnemyKind, x: f64, y: f64 },
    VerbDropped { verb: Verb, x: f64, y: f64 },
    VerbRemoved { verb: Verb },
    WallHit { entity: EntityId, impact_speed: f64 },
    WaveTriggered { index: usize, announcement: Option<String> },
    RoomCleared { depth: u32 },
    PlayerDied,
}

/// Transient feedback with no gameplay effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackEvent {
    Shake { intensity: u8, frames: u32 },
    HitStop { frames: u32 },
}
