//! Simulation configuration.
//!
//! Every field has a default taken from `constants.rs`, so a partial JSON
//! file only needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicConfig {
    pub infection: InfectionConfig,
    pub spread: SpreadConfig,
    pub outcome: OutcomeConfig,
    pub population: PopulationConfig,
    pub wander: WanderConfig,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// Per-agent infection progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    pub base_infection_rate_per_second: f64,
    pub sick_threshold: f64,
    pub contagious_threshold: f64,
    /// Add a random pre-seed in `[0, start_randomized_max]` at creation.
    pub start_randomized: bool,
    pub start_randomized_max: f64,
    /// Progress every agent starts from before the pre-seed.
    pub initial_progress: f64,
    /// Fire the "became sick" effect at most once per agent.
    pub play_sick_effect_once: bool,
    pub reveal_hold_seconds: f64,
}

/// Proximity contagion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    pub spread_radius: f64,
    pub spread_rate_per_tick: f64,
    pub spread_tick_interval: f64,
    /// Inclusive `[min, max]` range for the per-agent spread power.
    pub spread_power_range: [u32; 2],
}

/// Win/lose rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    pub max_allowed_sick: u32,
    pub enable_timer_win: bool,
    pub win_after_seconds: f64,
    /// Stop running simulation systems once the outcome is terminal.
    pub freeze_on_end: bool,
    pub end_transition_delay: f64,
    pub win_scene: String,
    pub lose_scene: String,
}

/// Population spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub count: u32,
    pub spawn_radius: f64,
    pub min_spawn_separation: f64,
    pub spawn_delay: f64,
    pub attempts_per_agent: u32,
}

/// Random-waypoint locomotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub enabled: bool,
    pub wander_radius: f64,
    /// Inclusive `[min, max]` seconds between two repaths.
    pub repath_interval: [f64; 2],
    pub waypoint_reached_distance: f64,
    pub speed: f64,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            base_infection_rate_per_second: BASE_INFECTION_RATE_PER_SECOND,
            sick_threshold: SICK_THRESHOLD,
            contagious_threshold: CONTAGIOUS_THRESHOLD,
            start_randomized: true,
            start_randomized_max: START_RANDOMIZED_MAX,
            initial_progress: 0.0,
            play_sick_effect_once: true,
            reveal_hold_seconds: REVEAL_HOLD_SECONDS,
        }
    }
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            spread_radius: SPREAD_RADIUS,
            spread_rate_per_tick: SPREAD_RATE_PER_TICK,
            spread_tick_interval: SPREAD_TICK_INTERVAL,
            spread_power_range: [SPREAD_POWER_MIN, SPREAD_POWER_MAX],
        }
    }
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            max_allowed_sick: MAX_ALLOWED_SICK,
            enable_timer_win: true,
            win_after_seconds: WIN_AFTER_SECONDS,
            freeze_on_end: true,
            end_transition_delay: END_TRANSITION_DELAY,
            win_scene: WIN_SCENE.to_string(),
            lose_scene: LOSE_SCENE.to_string(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            count: POPULATION_COUNT,
            spawn_radius: SPAWN_RADIUS,
            min_spawn_separation: MIN_SPAWN_SEPARATION,
            spawn_delay: SPAWN_DELAY,
            attempts_per_agent: SPAWN_ATTEMPTS_PER_AGENT,
        }
    }
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            wander_radius: WANDER_RADIUS,
            repath_interval: [REPATH_INTERVAL_MIN, REPATH_INTERVAL_MAX],
            waypoint_reached_distance: WAYPOINT_REACHED_DISTANCE,
            speed: WANDER_SPEED,
        }
    }
}

impl EpidemicConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Strict check: the first problem found, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.clone().normalize().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Repair the config in place and return every issue that was repaired.
    ///
    /// Thresholds are clamped to [0, 1] and swapped if out of order, the
    /// spread power range is clamped to 1..=10 and swapped if inverted,
    /// negative rates and durations become 0.
    pub fn normalize(&mut self) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        let inf = &mut self.infection;
        clamp_unit(&mut inf.sick_threshold, "sick_threshold", &mut issues);
        clamp_unit(
            &mut inf.contagious_threshold,
            "contagious_threshold",
            &mut issues,
        );
        clamp_unit(&mut inf.initial_progress, "initial_progress", &mut issues);
        clamp_unit(
            &mut inf.start_randomized_max,
            "start_randomized_max",
            &mut issues,
        );
        if inf.sick_threshold > inf.contagious_threshold {
            issues.push(ConfigError::ThresholdOrder {
                sick: inf.sick_threshold,
                contagious: inf.contagious_threshold,
            });
            std::mem::swap(&mut inf.sick_threshold, &mut inf.contagious_threshold);
        }
        floor_zero(
            &mut inf.base_infection_rate_per_second,
            "base_infection_rate_per_second",
            &mut issues,
        );
        floor_zero(
            &mut inf.reveal_hold_seconds,
            "reveal_hold_seconds",
            &mut issues,
        );

        let spread = &mut self.spread;
        floor_zero(&mut spread.spread_radius, "spread_radius", &mut issues);
        floor_zero(
            &mut spread.spread_rate_per_tick,
            "spread_rate_per_tick",
            &mut issues,
        );
        if spread.spread_tick_interval <= 0.0 {
            issues.push(ConfigError::NonPositive {
                field: "spread_tick_interval",
                value: spread.spread_tick_interval,
            });
            spread.spread_tick_interval = SPREAD_TICK_INTERVAL;
        }
        for bound in spread.spread_power_range.iter_mut() {
            if !(SPREAD_POWER_MIN..=SPREAD_POWER_MAX).contains(bound) {
                issues.push(ConfigError::SpreadPowerOutOfRange { value: *bound });
                *bound = (*bound).clamp(SPREAD_POWER_MIN, SPREAD_POWER_MAX);
            }
        }
        let [min, max] = spread.spread_power_range;
        if max < min {
            issues.push(ConfigError::SpreadPowerRangeInverted { min, max });
            spread.spread_power_range = [max, min];
        }

        let outcome = &mut self.outcome;
        floor_zero(
            &mut outcome.win_after_seconds,
            "win_after_seconds",
            &mut issues,
        );
        floor_zero(
            &mut outcome.end_transition_delay,
            "end_transition_delay",
            &mut issues,
        );

        let pop = &mut self.population;
        floor_zero(&mut pop.spawn_radius, "spawn_radius", &mut issues);
        floor_zero(
            &mut pop.min_spawn_separation,
            "min_spawn_separation",
            &mut issues,
        );
        floor_zero(&mut pop.spawn_delay, "spawn_delay", &mut issues);

        let wander = &mut self.wander;
        floor_zero(&mut wander.wander_radius, "wander_radius", &mut issues);
        floor_zero(&mut wander.speed, "speed", &mut issues);
        for bound in wander.repath_interval.iter_mut() {
            floor_zero(bound, "repath_interval", &mut issues);
        }
        let [lo, hi] = wander.repath_interval;
        if hi < lo {
            wander.repath_interval = [hi, lo];
        }

        issues
    }
}

fn clamp_unit(value: &mut f64, field: &'static str, issues: &mut Vec<ConfigError>) {
    if !(0.0..=1.0).contains(value) {
        issues.push(ConfigError::ThresholdOutOfRange {
            field,
            value: *value,
        });
        *value = value.clamp(0.0, 1.0);
    }
}

fn floor_zero(value: &mut f64, field: &'static str, issues: &mut Vec<ConfigError>) {
    if *value < 0.0 {
        issues.push(ConfigError::Negative {
            field,
            value: *value,
        });
        *value = 0.0;
    }
}
