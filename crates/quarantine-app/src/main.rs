use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use quarantine_app::game_loop::{self, LoopExit, TICK_DURATION};
use quarantine_app::state::AppState;
use quarantine_core::commands::PlayerCommand;
use quarantine_core::config::EpidemicConfig;
use quarantine_sim::engine::SimConfig;

fn main() -> ExitCode {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => match EpidemicConfig::load(&path) {
            Ok(config) => {
                info!(%path, "config loaded");
                config
            }
            Err(err) => {
                error!(%path, %err, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => EpidemicConfig::default(),
    };

    let app = AppState::new();
    let (tx, handle) = match game_loop::spawn_game_loop(
        SimConfig::from(config),
        Arc::clone(&app.latest_snapshot),
        TICK_DURATION,
    ) {
        Ok(spawned) => spawned,
        Err(err) => {
            error!(%err, "failed to spawn game loop thread");
            return ExitCode::FAILURE;
        }
    };
    if let Ok(mut slot) = app.command_tx.lock() {
        *slot = Some(tx);
    }

    info!("Starting QUARANTINE simulation");
    app.send(PlayerCommand::StartSimulation);

    let exit = match handle.join() {
        Ok(exit) => exit,
        Err(_) => {
            error!("game loop thread panicked");
            return ExitCode::FAILURE;
        }
    };
    if exit != LoopExit::Finished {
        warn!(?exit, "game loop stopped before the run finished");
    }

    match app.latest() {
        Some(snapshot) => {
            info!(
                state = ?snapshot.outcome.state,
                elapsed = snapshot.outcome.elapsed_secs,
                total = snapshot.counters.total,
                sick = snapshot.counters.sick,
                contagious = snapshot.counters.contagious,
                "run finished"
            );
            match serde_json::to_string(&snapshot.outcome) {
                Ok(json) => println!("{json}"),
                Err(err) => warn!(%err, "failed to serialize outcome"),
            }
        }
        None => warn!("no snapshot was produced"),
    }

    ExitCode::SUCCESS
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
