//! Player intents sent into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::CardinalDir;

/// Intents from the input collaborator. Each is consumed at most once,
/// on the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Movement direction for this tick. Normalized by the engine.
    Move { x: f64, y: f64 },
    Attack { direction: CardinalDir },
    Dash,
    /// Run the syntax chain if the buffer is full.
    ExecuteChain,
    SwapWeapon,
}
