//! Simulation core for SIGNAL//VOID.
//!
//! Owns the entity store, runs the system pipeline at a fixed tick rate
//! and produces `SimSnapshot`s for whatever renders the arena.

pub mod clock;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod mods;
pub mod schedule;
pub mod systems;
pub mod upgrades;
pub mod verbs;
pub mod vfx;
pub mod waves;
pub mod weapons;
pub mod world_setup;

pub use config::{ArenaBounds, SimConfig};
pub use engine::SimulationEngine;
pub use error::{ConfigError, ConfigResult};
pub use signal_void_core as core;

#[cfg(test)]
mod tests;
