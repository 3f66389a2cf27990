//! Population-wide infection counters.
//!
//! Owned by the engine and passed by reference to every agent; never a
//! global. Mutated only through join/leave and threshold-crossing events.

use serde::{Deserialize, Serialize};

use quarantine_core::enums::Crossing;
use quarantine_core::events::CounterSnapshot;

/// Current totals. Every decrement floors at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounters {
    total: u32,
    sick: u32,
    contagious: u32,
}

impl PopulationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter. Must run before any agent of a new run joins.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn sick(&self) -> u32 {
        self.sick
    }

    pub fn contagious(&self) -> u32 {
        self.contagious
    }

    /// Consistent copy for readers such as the outcome evaluator.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total: self.total,
            sick: self.sick,
            contagious: self.contagious,
        }
    }

    pub fn on_agent_joined(&mut self) {
        self.total += 1;
    }

    /// An agent left. `was_sick`/`was_contagious` are its last-counted
    /// memberships, not its instantaneous derived state.
    pub fn on_agent_left(&mut self, was_sick: bool, was_contagious: bool) {
        if was_contagious {
            self.contagious = self.contagious.saturating_sub(1);
        }
        if was_sick {
            self.sick = self.sick.saturating_sub(1);
        }
        self.total = self.total.saturating_sub(1);
    }

    pub fn on_sick_changed(&mut self, became_sick: bool) {
        self.sick = step(self.sick, became_sick);
    }

    pub fn on_contagious_changed(&mut self, became_contagious: bool) {
        self.contagious = step(self.contagious, became_contagious);
    }

    pub fn apply_sick(&mut self, crossing: Crossing) {
        self.on_sick_changed(crossing.entered());
    }

    pub fn apply_contagious(&mut self, crossing: Crossing) {
        self.on_contagious_changed(crossing.entered());
    }
}

fn step(value: u32, up: bool) -> u32 {
    if up {
        value + 1
    } else {
        value.saturating_sub(1)
    }
}
