//! Core types and definitions for the Signal Void simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshots, events, and constants.
//! It has no dependency on the entity store or any runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
