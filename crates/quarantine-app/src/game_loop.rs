//! Game loop thread. Runs the simulation engine at 30Hz and publishes
//! snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via `mpsc` channel. Snapshots are stored in shared state for
//! polling, and their presentation events are logged.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use quarantine_core::constants::TICK_RATE;
use quarantine_core::events::PresentationEvent;
use quarantine_core::state::SimulationSnapshot;
use quarantine_sim::engine::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The outcome resolved and its end transition is done.
    Finished,
    Shutdown,
    Disconnected,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. `tick_duration` is
/// the real time of one tick at 1x speed; zero runs unthrottled.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<SimulationSnapshot>>>,
    tick_duration: Duration,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<LoopExit>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("quarantine-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config);
            run_game_loop(engine, cmd_rx, &latest_snapshot, tick_duration)
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the run is over, a Shutdown command, or
/// channel disconnect.
pub fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimulationSnapshot>>,
    tick_duration: Duration,
) -> LoopExit {
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    debug!(?cmd, "command received");
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => return LoopExit::Shutdown,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return LoopExit::Disconnected,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Report presentation events
        for event in &snapshot.events {
            log_event(event);
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        let evaluator = engine.evaluator();
        if evaluator.state().is_terminal() && !evaluator.end_transition_pending() {
            return LoopExit::Finished;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        if tick_duration.is_zero() {
            continue;
        }
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            tick_duration.div_f64(time_scale)
        } else {
            tick_duration
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind; reset instead of catching up.
            next_tick_time = now;
        }
    }
}

fn log_event(event: &PresentationEvent) {
    match event {
        PresentationEvent::BecameSick { agent_id } => info!(agent_id, "agent became sick"),
        PresentationEvent::GraceFraction { agent_id, fraction } => {
            debug!(agent_id, fraction, "grace")
        }
        PresentationEvent::GraceEnded { agent_id } => debug!(agent_id, "grace ended"),
        PresentationEvent::OutcomeReached {
            state,
            counters,
            max_allowed_sick,
        } => info!(
            ?state,
            total = counters.total,
            sick = counters.sick,
            contagious = counters.contagious,
            max_allowed_sick,
            "outcome reached"
        ),
        PresentationEvent::EndTransition { state, scene } => {
            info!(?state, %scene, "loading end scene")
        }
    }
}
