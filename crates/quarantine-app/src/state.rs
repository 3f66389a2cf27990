//! State shared between the runner and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use quarantine_core::commands::PlayerCommand;
use quarantine_core::state::SimulationSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles the runner keeps on the running game loop.
///
/// `mpsc::Sender` is not Sync, so it sits behind a `Mutex`. The latest
/// snapshot is shared with the loop thread through an `Arc`.
pub struct AppState {
    /// `None` until the loop has been spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<SimulationSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a player command. Returns false if no loop is listening.
    pub fn send(&self, command: PlayerCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        match guard.as_ref() {
            Some(tx) => tx.send(GameLoopCommand::PlayerCommand(command)).is_ok(),
            None => false,
        }
    }

    /// Clone of the most recent snapshot, if any tick has run.
    pub fn latest(&self) -> Option<SimulationSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
