//! Systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only
//! ones). They own no state; everything persistent lives in components or
//! on the engine.

pub mod ai;
pub mod combat;
pub mod dash;
pub mod death;
pub mod input;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod streak;
pub mod timers;
