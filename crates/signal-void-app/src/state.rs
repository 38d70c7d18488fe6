//! Application state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use signal_void_core::commands::PlayerCommand;
use signal_void_core::state::SimSnapshot;
use signal_void_sim::{SimConfig, SimulationEngine};
use thiserror::Error;

use crate::game_loop;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// A player command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Take an upgrade, evolve what qualifies and load the next room.
    NextRoom,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    #[error("game loop channel closed")]
    ChannelClosed,

    #[error("shared state lock poisoned")]
    Poisoned,

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] signal_void_sim::ConfigError),
}

/// Shared application state.
///
/// - `mpsc::Sender` sits behind a `Mutex` so the state stays `Sync`
/// - `Option`s are empty until `start` is called
/// - the latest snapshot is shared with the loop thread through an `Arc`
#[derive(Default)]
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Updated by the game loop thread after each rendered frame.
    pub latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex.lock().map_err(|_| AppError::Poisoned)
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop for a fresh run.
    pub fn start(&self, config: SimConfig) -> Result<(), AppError> {
        config.validate()?;
        let mut handle = lock(&self.loop_handle)?;
        if handle.is_some() {
            return Err(AppError::AlreadyRunning);
        }
        let engine = SimulationEngine::new(config);
        let (tx, join) = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone())?;
        *lock(&self.command_tx)? = Some(tx);
        *handle = Some(join);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.loop_handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    pub fn send(&self, command: LoopCommand) -> Result<(), AppError> {
        let tx = lock(&self.command_tx)?;
        match tx.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::ChannelClosed),
            None => Err(AppError::NotStarted),
        }
    }

    pub fn send_player(&self, command: PlayerCommand) -> Result<(), AppError> {
        self.send(LoopCommand::Player(command))
    }

    /// Latest published snapshot, if any frame has run yet.
    pub fn snapshot(&self) -> Result<Option<SimSnapshot>, AppError> {
        Ok(lock(&self.latest_snapshot)?.clone())
    }

    /// Ask the loop to stop and wait for it.
    pub fn stop(&self) -> Result<(), AppError> {
        let Some(join) = lock(&self.loop_handle)?.take() else {
            return Err(AppError::NotStarted);
        };
        if let Some(tx) = lock(&self.command_tx)?.take() {
            // A loop that already exited has dropped its receiver.
            let _ = tx.send(LoopCommand::Shutdown);
        }
        if join.join().is_err() {
            log::error!("game loop thread panicked");
        }
        Ok(())
    }
}
