//! Per-agent infection state machine.
//!
//! `progress` is the only stored level; sick and contagious are derived
//! from it. Separately, each agent remembers which states it is currently
//! *counted* in, so the shared counters move by exactly one per crossing.

use serde::{Deserialize, Serialize};

use quarantine_core::config::InfectionConfig;
use quarantine_core::constants::{SPREAD_POWER_MAX, SPREAD_POWER_MIN};
use quarantine_core::enums::Crossing;

use crate::counters::PopulationCounters;

/// Progression parameters shared by agents created from the same config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfectionParams {
    pub base_rate: f64,
    pub sick_threshold: f64,
    pub contagious_threshold: f64,
    /// Fire the "became sick" effect at most once until reset.
    pub sick_effect_once: bool,
}

impl InfectionParams {
    /// Build from a normalized config section.
    pub fn from_config(config: &InfectionConfig) -> Self {
        Self {
            base_rate: config.base_infection_rate_per_second,
            sick_threshold: config.sick_threshold,
            contagious_threshold: config.contagious_threshold,
            sick_effect_once: config.play_sick_effect_once,
        }
    }
}

impl Default for InfectionParams {
    fn default() -> Self {
        Self::from_config(&InfectionConfig::default())
    }
}

/// Counter-relevant result of a threshold recheck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recheck {
    pub sick: Option<Crossing>,
    pub contagious: Option<Crossing>,
    /// Trigger the one-shot "became sick" presentation effect.
    pub play_sick_effect: bool,
}

impl Recheck {
    pub fn is_empty(&self) -> bool {
        self.sick.is_none() && self.contagious.is_none()
    }
}

/// Result of one baseline tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Grace was active: progress was held and the grace clock ran.
    Grace {
        /// Remaining grace over granted duration, 0..=1.
        fraction: f64,
        /// The grace period ran out this tick.
        ended: bool,
    },
    /// Baseline accumulation was applied.
    Progressed(Recheck),
}

/// Infection state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfectionState {
    progress: f64,
    params: InfectionParams,
    grace_remaining: f64,
    grace_duration: f64,
    spread_power: u32,
    joined: bool,
    counted_sick: bool,
    counted_contagious: bool,
    sick_effect_played: bool,
}

impl InfectionState {
    /// Create a detached state. It affects no counters until [`join`](Self::join).
    pub fn new(params: InfectionParams, progress: f64, spread_power: u32) -> Self {
        debug_assert!(
            params.sick_threshold <= params.contagious_threshold,
            "sick threshold above contagious threshold"
        );
        Self {
            progress: progress.clamp(0.0, 1.0),
            params,
            grace_remaining: 0.0,
            grace_duration: 0.0,
            spread_power: spread_power.clamp(SPREAD_POWER_MIN, SPREAD_POWER_MAX),
            joined: false,
            counted_sick: false,
            counted_contagious: false,
            sick_effect_played: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn params(&self) -> &InfectionParams {
        &self.params
    }

    pub fn is_sick(&self) -> bool {
        self.progress >= self.params.sick_threshold
    }

    pub fn is_contagious(&self) -> bool {
        self.progress >= self.params.contagious_threshold
    }

    pub fn spread_power(&self) -> u32 {
        self.spread_power
    }

    pub fn grace_remaining(&self) -> f64 {
        self.grace_remaining
    }

    pub fn grace_duration(&self) -> f64 {
        self.grace_duration
    }

    pub fn is_grace_active(&self) -> bool {
        self.grace_remaining > 0.0
    }

    /// Remaining grace over granted duration (0 when no duration was granted).
    pub fn grace_fraction(&self) -> f64 {
        if self.grace_duration <= 0.0 {
            0.0
        } else {
            (self.grace_remaining / self.grace_duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Whether this agent is currently counted in `sick`.
    pub fn counted_sick(&self) -> bool {
        self.counted_sick
    }

    /// Whether this agent is currently counted in `contagious`.
    pub fn counted_contagious(&self) -> bool {
        self.counted_contagious
    }

    /// Enter the population: count the agent and its starting memberships.
    /// Starting memberships never fire the sick effect. Returns false if the
    /// agent had already joined.
    pub fn join(&mut self, counters: &mut PopulationCounters) -> bool {
        if self.joined {
            return false;
        }
        self.joined = true;
        counters.on_agent_joined();

        self.counted_sick = self.is_sick();
        self.counted_contagious = self.is_contagious();
        if self.counted_sick {
            counters.on_sick_changed(true);
        }
        if self.counted_contagious {
            counters.on_contagious_changed(true);
        }
        true
    }

    /// Leave the population, removing the agent from every counter it is
    /// currently counted in. Returns false if the agent was not joined.
    pub fn leave(&mut self, counters: &mut PopulationCounters) -> bool {
        if !self.joined {
            return false;
        }
        counters.on_agent_left(self.counted_sick, self.counted_contagious);
        self.joined = false;
        self.counted_sick = false;
        self.counted_contagious = false;
        true
    }

    /// Baseline progression for one tick. While grace is active only the
    /// grace clock runs.
    pub fn advance(&mut self, dt: f64, counters: &mut PopulationCounters) -> Advance {
        let dt = dt.max(0.0);

        if self.grace_remaining > 0.0 {
            self.grace_remaining = (self.grace_remaining - dt).max(0.0);
            return Advance::Grace {
                fraction: self.grace_fraction(),
                ended: self.grace_remaining <= 0.0,
            };
        }

        self.progress = (self.progress + self.params.base_rate * dt).clamp(0.0, 1.0);
        Advance::Progressed(self.recheck(counters))
    }

    /// Exposure from a contagious neighbor. Not gated by grace.
    pub fn add_infection(&mut self, amount: f64, counters: &mut PopulationCounters) -> Recheck {
        if !(amount > 0.0) {
            return Recheck::default();
        }
        self.progress = (self.progress + amount).clamp(0.0, 1.0);
        self.recheck(counters)
    }

    /// Reduce progress; the only way back below a threshold.
    pub fn heal(&mut self, amount: f64, counters: &mut PopulationCounters) -> Recheck {
        if !(amount > 0.0) {
            return Recheck::default();
        }
        self.progress = (self.progress - amount).clamp(0.0, 1.0);
        self.recheck(counters)
    }

    /// Grant a grace period. Extends to the longer of the current and the
    /// new period; never adds up.
    pub fn apply_grace(&mut self, seconds: f64) {
        if !(seconds > 0.0) {
            return;
        }
        self.grace_duration = self.grace_duration.max(seconds);
        self.grace_remaining = self.grace_remaining.max(seconds);
    }

    /// Allow the sick effect to fire again.
    pub fn reset_sick_effect(&mut self) {
        self.sick_effect_played = false;
    }

    /// Compare derived flags to counted membership and report each flip to
    /// the counters once. Entries are applied sick-first and exits
    /// contagious-first so `contagious <= sick` holds between events.
    fn recheck(&mut self, counters: &mut PopulationCounters) -> Recheck {
        let mut report = Recheck::default();
        if !self.joined {
            return report;
        }

        let sick_now = self.is_sick();
        let contagious_now = self.is_contagious();

        if contagious_now != self.counted_contagious && !contagious_now {
            self.counted_contagious = false;
            counters.apply_contagious(Crossing::Exited);
            report.contagious = Some(Crossing::Exited);
        }

        if sick_now != self.counted_sick {
            self.counted_sick = sick_now;
            let crossing = if sick_now {
                Crossing::Entered
            } else {
                Crossing::Exited
            };
            counters.apply_sick(crossing);
            report.sick = Some(crossing);

            if sick_now && !(self.params.sick_effect_once && self.sick_effect_played) {
                self.sick_effect_played = true;
                report.play_sick_effect = true;
            }
        }

        if contagious_now != self.counted_contagious && contagious_now {
            self.counted_contagious = true;
            counters.apply_contagious(Crossing::Entered);
            report.contagious = Some(Crossing::Entered);
        }

        report
    }
}
