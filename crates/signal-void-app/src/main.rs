use std::process::ExitCode;
use std::time::Duration;

use signal_void_app::runner;
use signal_void_sim::SimConfig;

/// Wall time a headless run may take.
const RUN_LIMIT: Duration = Duration::from_secs(120);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    match runner::run(config, RUN_LIMIT) {
        Ok(summary) => {
            log::info!(
                "run over: {:?} at depth {} after {} ticks, {} rooms cleared, {} kills, {} hp left",
                summary.phase,
                summary.depth,
                summary.ticks,
                summary.rooms_cleared,
                summary.kills,
                summary.player_health
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
