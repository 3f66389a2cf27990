//! One-way notifications emitted by the simulation for presentation.
//!
//! The simulation never reads anything back from their consumers.

use serde::{Deserialize, Serialize};

use crate::enums::OutcomeState;

/// Population counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub total: u32,
    pub sick: u32,
    pub contagious: u32,
}

/// Events for particle effects, progress rings and scene transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// Agent crossed into the sick state during play.
    BecameSick { agent_id: u32 },
    /// Remaining grace as a fraction of the granted duration.
    GraceFraction { agent_id: u32, fraction: f64 },
    /// Grace period ran out.
    GraceEnded { agent_id: u32 },
    /// The run reached a terminal outcome.
    OutcomeReached {
        state: OutcomeState,
        counters: CounterSnapshot,
        max_allowed_sick: u32,
    },
    /// The post-outcome delay elapsed; load the named scene.
    EndTransition { state: OutcomeState, scene: String },
}
