//! Simulation snapshot: the complete visible state produced each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{CounterSnapshot, PresentationEvent};
use crate::types::{Position, SimTime};

/// Complete simulation state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub outcome: OutcomeView,
    /// Counters maintained through transition events.
    pub counters: CounterSnapshot,
    /// Counters recomputed by scanning agent states this tick.
    pub live: CounterSnapshot,
    pub agents: Vec<AgentView>,
    pub spawner: SpawnerView,
    pub events: Vec<PresentationEvent>,
}

/// Outcome evaluator state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeView {
    pub state: OutcomeState,
    pub elapsed_secs: f64,
    /// Seconds left until a timer win (0 when timer win is disabled).
    pub time_remaining_secs: f64,
    pub ready: bool,
    pub max_allowed_sick: u32,
}

/// One agent on screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentView {
    pub agent_id: u32,
    pub position: Position,
    pub progress: f64,
    pub sick: bool,
    pub contagious: bool,
    /// Remaining grace fraction (0 when no grace is active).
    pub grace_fraction: f64,
    pub revealed: bool,
    pub spread_power: u32,
}

/// Spawner progress.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpawnerView {
    pub requested: u32,
    pub attempted: u32,
    pub spawned: u32,
}
