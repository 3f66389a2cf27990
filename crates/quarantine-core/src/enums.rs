//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Win/lose state of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeState {
    #[default]
    Playing,
    Won,
    Lost,
}

impl OutcomeState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OutcomeState::Playing)
    }
}

/// Direction of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossing {
    /// Progress rose to or above the threshold.
    Entered,
    /// Progress fell below the threshold.
    Exited,
}

impl Crossing {
    pub fn entered(self) -> bool {
        self == Crossing::Entered
    }
}

/// Category used to filter spatial queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// An enrolled, simulated agent.
    #[default]
    Agent,
    /// An entity excluded from the simulation (missing dependency).
    Inert,
}

/// Filter passed to spatial queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryFilter {
    #[default]
    Agents,
    Any,
}

impl QueryFilter {
    pub fn accepts(self, category: Category) -> bool {
        match self {
            QueryFilter::Agents => category == Category::Agent,
            QueryFilter::Any => true,
        }
    }
}

/// Engine phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Active,
    Paused,
    /// A terminal outcome was reached.
    Ended,
}
