//! ECS components for hecs entities.
//!
//! Components here are plain data. The infection state machine itself is
//! a component too, but it lives in `quarantine-epidemic` with its logic.

use serde::{Deserialize, Serialize};

use crate::enums::Category;
use crate::types::Position;

/// Stable identifier of an agent, used by commands and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Spatial query category of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCategory(pub Category);

/// Marks an entity excluded from the simulation because it could not be
/// enrolled (missing dependency). It is never counted and never spreads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Disabled;

/// Schedule of a contagious agent's spread pulses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpreadTimer {
    /// Simulation time (seconds) of the next allowed pulse.
    pub next_spread_at: f64,
}

/// Random-waypoint walker state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wander {
    /// Point the agent is walking toward.
    pub waypoint: Position,
    /// Simulation time (seconds) after which a new waypoint may be picked.
    pub next_repath_at: f64,
}

/// Lamp reveal state. Only sick agents can be revealed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Reveal {
    pub revealed: bool,
    /// Seconds until the reveal fades.
    pub remaining_secs: f64,
}
