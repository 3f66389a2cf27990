//! Epidemic rules for QUARANTINE.
//!
//! Implements the per-agent infection state machine, the population
//! counters it reports transitions to, and the win/lose evaluator.
//! No ECS dependency; operates on plain data.

pub mod counters;
pub mod infection;
pub mod outcome;

pub use quarantine_core as core;

pub use counters::PopulationCounters;
pub use infection::{Advance, InfectionParams, InfectionState, Recheck};
pub use outcome::{EndTransition, OutcomeEvaluator, OutcomeRules, Resolution};

#[cfg(test)]
mod tests;
