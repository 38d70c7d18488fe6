//! Game loop thread: renders frames at display rate and lets the fixed-step
//! clock decide how many simulation ticks each frame runs.
//!
//! The engine is moved into the thread and owned there. Commands arrive via
//! an `mpsc` channel; each frame's snapshot is stored in shared state for
//! polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use signal_void_core::state::SimSnapshot;
use signal_void_sim::clock::FixedStepClock;
use signal_void_sim::SimulationEngine;

use crate::state::LoopCommand;

/// Display refresh the loop paces itself to.
pub const FRAME_RATE: u32 = 60;
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("signal-void-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// Apply one loop command. Returns false on shutdown.
pub fn handle_command(engine: &mut SimulationEngine, command: LoopCommand) -> bool {
    match command {
        LoopCommand::Player(cmd) => engine.queue_command(cmd),
        LoopCommand::NextRoom => next_room(engine),
        LoopCommand::Shutdown => return false,
    }
    true
}

/// Between-room progression: take the first offered upgrade, evolve what
/// qualifies and load the next room.
fn next_room(engine: &mut SimulationEngine) {
    if let Some(&upgrade) = engine.offer_upgrades(3).first() {
        engine.apply_upgrade(upgrade);
        log::info!("took upgrade {upgrade:?}");
    }
    for weapon in engine.evolve_weapons() {
        log::info!("evolved into {weapon:?}");
    }
    if !engine.advance_room() {
        log::warn!("could not advance past depth {}", engine.depth());
    }
}

/// Run `ticks` ticks and fold their event lists into the last snapshot so a
/// frame that runs several ticks loses nothing.
pub fn run_frame(engine: &mut SimulationEngine, ticks: u32) -> Option<SimSnapshot> {
    let mut merged: Option<SimSnapshot> = None;
    for _ in 0..ticks {
        let mut snapshot = engine.tick();
        if let Some(previous) = merged.take() {
            let mut events = previous.events;
            events.append(&mut snapshot.events);
            snapshot.events = events;
            let mut feedback = previous.feedback;
            feedback.append(&mut snapshot.feedback);
            snapshot.feedback = feedback;
        }
        merged = Some(snapshot);
    }
    merged
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) {
    let config = engine.config().clone();
    let mut clock = FixedStepClock::new(config.max_ticks_per_frame, config.time_scale);
    let mut last_frame = Instant::now();
    log::info!("game loop started (seed {})", config.seed);

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(command) => {
                    if !handle_command(&mut engine, command) {
                        log::info!("game loop shutting down at tick {}", engine.time().tick);
                        return;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Run however many ticks the elapsed time allows
        let now = Instant::now();
        let ticks = clock.advance((now - last_frame).as_secs_f64());
        last_frame = now;

        // 3. Publish for polling
        if let Some(snapshot) = run_frame(&mut engine, ticks) {
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(snapshot);
            }
        }

        // 4. Sleep out the rest of the frame
        let spent = now.elapsed();
        if spent < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - spent);
        }
    }
}
