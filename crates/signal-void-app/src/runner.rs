//! Headless driver: starts the game loop, steers the player with the
//! autopilot and moves on to the next room whenever one clears.

use std::time::{Duration, Instant};

use signal_void_core::enums::GamePhase;
use signal_void_core::events::SimEvent;
use signal_void_sim::SimConfig;

use crate::autopilot;
use crate::game_loop::FRAME_DURATION;
use crate::state::{AppError, AppState, LoopCommand};

/// How a headless run ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub depth: u32,
    pub rooms_cleared: u32,
    /// Kills seen in polled snapshots. Frames the driver skipped are missed.
    pub kills: u32,
    pub player_health: i32,
    pub phase: GamePhase,
}

/// Run until the player dies or `limit` of wall time passes.
pub fn run(config: SimConfig, limit: Duration) -> Result<RunSummary, AppError> {
    let state = AppState::new();
    state.start(config)?;

    let started = Instant::now();
    let mut summary = RunSummary::default();
    let mut last_tick = None;
    let mut advanced_from = None;

    while started.elapsed() < limit {
        std::thread::sleep(FRAME_DURATION);
        let Some(snapshot) = state.snapshot()? else {
            continue;
        };
        if last_tick == Some(snapshot.time.tick) {
            continue;
        }
        last_tick = Some(snapshot.time.tick);

        summary.ticks = snapshot.time.tick;
        summary.depth = snapshot.depth;
        summary.phase = snapshot.phase;
        summary.player_health = snapshot.player.as_ref().map_or(0, |p| p.health);
        summary.kills += snapshot
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::EnemyKilled { .. }))
            .count() as u32;

        match snapshot.phase {
            GamePhase::Playing => {
                for command in autopilot::plan(&snapshot) {
                    state.send_player(command)?;
                }
            }
            GamePhase::RoomCleared => {
                if advanced_from != Some(snapshot.depth) {
                    advanced_from = Some(snapshot.depth);
                    summary.rooms_cleared += 1;
                    log::info!("depth {} cleared, moving on", snapshot.depth);
                    state.send(LoopCommand::NextRoom)?;
                }
            }
            GamePhase::GameOver => {
                log::info!("player died at depth {}", snapshot.depth);
                break;
            }
        }
    }

    state.stop()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_run_makes_progress() {
        let summary = run(SimConfig::default(), Duration::from_millis(500)).unwrap();
        assert!(summary.ticks > 0);
        assert!(summary.depth >= 1);
    }

    #[test]
    fn test_bad_config_fails_fast() {
        let mut config = SimConfig::default();
        config.max_ticks_per_frame = 0;
        let result = run(config, Duration::from_millis(100));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
