//! Simulation constants and default tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Infection ---

/// Baseline infection accumulation per second.
pub const BASE_INFECTION_RATE_PER_SECOND: f64 = 0.01;

/// Progress at which an agent counts as sick.
pub const SICK_THRESHOLD: f64 = 0.6;

/// Progress at which an agent starts spreading.
pub const CONTAGIOUS_THRESHOLD: f64 = 0.85;

/// Upper bound of the random progress pre-seed applied at creation.
pub const START_RANDOMIZED_MAX: f64 = 0.15;

/// How long a lamp reveal stays visible after the last sweep (seconds).
pub const REVEAL_HOLD_SECONDS: f64 = 0.15;

// --- Spread ---

/// Radius of the contagion neighbor query (meters).
pub const SPREAD_RADIUS: f64 = 1.6;

/// Infection applied per spread pulse, before the spread power multiplier.
pub const SPREAD_RATE_PER_TICK: f64 = 0.04;

/// Seconds between two spread pulses of one contagious agent.
pub const SPREAD_TICK_INTERVAL: f64 = 0.5;

/// Lowest allowed spread power.
pub const SPREAD_POWER_MIN: u32 = 1;

/// Highest allowed spread power.
pub const SPREAD_POWER_MAX: u32 = 10;

// --- Outcome ---

/// Sick count above which the run is lost.
pub const MAX_ALLOWED_SICK: u32 = 10;

/// Survival time needed for a timer win (seconds).
pub const WIN_AFTER_SECONDS: f64 = 180.0;

/// Delay between the terminal outcome and the end transition (unscaled seconds).
pub const END_TRANSITION_DELAY: f64 = 1.5;

pub const WIN_SCENE: &str = "WinScene";
pub const LOSE_SCENE: &str = "LoseScene";

// --- Population ---

/// Agents the spawner tries to place.
pub const POPULATION_COUNT: u32 = 50;

/// Radius of the spawn disc around the spawn origin (meters).
pub const SPAWN_RADIUS: f64 = 20.0;

/// Preferred minimum distance between two spawn points (meters).
pub const MIN_SPAWN_SEPARATION: f64 = 1.2;

/// Delay between two spawn attempts (seconds).
pub const SPAWN_DELAY: f64 = 0.2;

/// Candidate points sampled per agent before the attempt is skipped.
pub const SPAWN_ATTEMPTS_PER_AGENT: u32 = 25;

// --- Wander ---

/// Radius around the agent in which new waypoints are picked (meters).
pub const WANDER_RADIUS: f64 = 10.0;

pub const REPATH_INTERVAL_MIN: f64 = 2.0;
pub const REPATH_INTERVAL_MAX: f64 = 4.0;

/// Distance at which a waypoint counts as reached (meters).
pub const WAYPOINT_REACHED_DISTANCE: f64 = 0.6;

/// Walking speed (m/s).
pub const WANDER_SPEED: f64 = 1.5;

// --- Spatial index ---

/// Default grid cell edge for the neighborhood index (meters).
pub const SPATIAL_CELL_SIZE: f64 = 2.0;
