//! Player commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Simulation control ---
    /// Reset counters and start a new run.
    StartSimulation,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 0.0 = paused).
    SetTimeScale { scale: f64 },
    /// Give up: the run is lost immediately.
    Forfeit,

    // --- Agent interaction ---
    /// Reduce an agent's infection progress.
    Heal { agent_id: u32, amount: f64 },
    /// Grant an agent a grace period that suspends baseline progression.
    Cure { agent_id: u32, seconds: f64 },
    /// Sweep the lamp over an area, revealing sick agents in it.
    RevealArea { x: f64, y: f64, radius: f64 },
    /// Remove an agent from the simulation.
    RemoveAgent { agent_id: u32 },
}
