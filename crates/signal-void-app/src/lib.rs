//! Headless SIGNAL//VOID runner.
//!
//! Drives the simulation on its own fixed-step loop thread, feeds it
//! scripted input and publishes snapshots for polling.

pub mod autopilot;
pub mod game_loop;
pub mod runner;
pub mod state;

pub use signal_void_core as core;
