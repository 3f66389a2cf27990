//! Simulation engine for QUARANTINE.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces SimulationSnapshots for the runner.

pub mod engine;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use quarantine_core as core;
pub use engine::{SimConfig, SimulationEngine};
