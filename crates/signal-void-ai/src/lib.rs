//! Enemy AI for Signal Void.
//!
//! Implements the per-archetype behavior state machines and the static
//! enemy profile table.

mod charge;
pub mod fsm;
mod melee;
pub mod profiles;
pub mod ranged;

pub use signal_void_core as core;

#[cfg(test)]
mod tests;
