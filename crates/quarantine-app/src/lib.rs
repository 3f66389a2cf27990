//! QUARANTINE headless runner.
//!
//! Drives the simulation engine on its own thread at the tick rate and
//! reports presentation events through `tracing`.

pub mod game_loop;
pub mod state;

pub use quarantine_core as core;
