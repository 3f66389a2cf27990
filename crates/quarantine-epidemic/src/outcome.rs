//! Win/lose evaluator.
//!
//! Playing → Won / Lost, both terminal. A readiness gate keeps the
//! evaluator idle until the population exists, and a plain countdown
//! replaces the delayed scene load that follows the outcome.

use serde::{Deserialize, Serialize};

use quarantine_core::config::OutcomeConfig;
use quarantine_core::enums::OutcomeState;
use quarantine_core::events::CounterSnapshot;

/// Rules the evaluator applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRules {
    pub max_allowed_sick: u32,
    pub enable_timer_win: bool,
    pub win_after_seconds: f64,
    /// Unscaled seconds between the outcome and the end transition.
    pub end_transition_delay: f64,
    pub win_scene: String,
    pub lose_scene: String,
}

impl OutcomeRules {
    pub fn from_config(config: &OutcomeConfig) -> Self {
        Self {
            max_allowed_sick: config.max_allowed_sick,
            enable_timer_win: config.enable_timer_win,
            win_after_seconds: config.win_after_seconds,
            end_transition_delay: config.end_transition_delay,
            win_scene: config.win_scene.clone(),
            lose_scene: config.lose_scene.clone(),
        }
    }
}

impl Default for OutcomeRules {
    fn default() -> Self {
        Self::from_config(&OutcomeConfig::default())
    }
}

/// The terminal state together with the counters that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub state: OutcomeState,
    pub counters: CounterSnapshot,
}

/// Scene to load once the end countdown has elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTransition {
    pub state: OutcomeState,
    pub scene: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEvaluator {
    rules: OutcomeRules,
    state: OutcomeState,
    elapsed: f64,
    ready: bool,
    resolution: Option<Resolution>,
    /// Remaining unscaled seconds before the end transition; `None` when
    /// no transition is pending.
    end_countdown: Option<f64>,
}

impl OutcomeEvaluator {
    pub fn new(rules: OutcomeRules) -> Self {
        Self {
            rules,
            state: OutcomeState::Playing,
            elapsed: 0.0,
            ready: false,
            resolution: None,
            end_countdown: None,
        }
    }

    /// Back to Playing with no elapsed time, gate closed.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules.clone());
    }

    pub fn rules(&self) -> &OutcomeRules {
        &self.rules
    }

    pub fn state(&self) -> OutcomeState {
        self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Seconds until a timer win, or 0 when timer win is disabled.
    pub fn time_remaining(&self) -> f64 {
        if self.rules.enable_timer_win {
            (self.rules.win_after_seconds - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Evaluate one tick. Returns the resolution on the tick the outcome
    /// becomes terminal; every later call is a no-op.
    pub fn evaluate(&mut self, counters: CounterSnapshot, dt: f64) -> Option<Resolution> {
        if self.state.is_terminal() {
            return None;
        }

        if !self.ready {
            if counters.total == 0 {
                return None;
            }
            self.ready = true;
        }

        // Checked before the timer so a same-tick breach always loses.
        if counters.sick > self.rules.max_allowed_sick {
            return Some(self.resolve(OutcomeState::Lost, counters));
        }

        if self.rules.enable_timer_win {
            self.elapsed += dt.max(0.0);
            if self.elapsed >= self.rules.win_after_seconds {
                return Some(self.resolve(OutcomeState::Won, counters));
            }
        }

        None
    }

    /// Player gave up. Loses immediately, even before the gate opens.
    pub fn forfeit(&mut self, counters: CounterSnapshot) -> Option<Resolution> {
        if self.state.is_terminal() {
            return None;
        }
        Some(self.resolve(OutcomeState::Lost, counters))
    }

    /// Run the end countdown on unscaled time. Yields the transition once,
    /// unless the scene name for the outcome is empty.
    pub fn advance_end_transition(&mut self, unscaled_dt: f64) -> Option<EndTransition> {
        let remaining = self.end_countdown.as_mut()?;
        *remaining -= unscaled_dt.max(0.0);
        if *remaining > 0.0 {
            return None;
        }
        self.end_countdown = None;

        let scene = match self.state {
            OutcomeState::Won => &self.rules.win_scene,
            OutcomeState::Lost => &self.rules.lose_scene,
            OutcomeState::Playing => return None,
        };
        if scene.is_empty() {
            return None;
        }
        Some(EndTransition {
            state: self.state,
            scene: scene.clone(),
        })
    }

    /// Whether the end countdown is still running.
    pub fn end_transition_pending(&self) -> bool {
        self.end_countdown.is_some()
    }

    fn resolve(&mut self, state: OutcomeState, counters: CounterSnapshot) -> Resolution {
        self.state = state;
        self.end_countdown = Some(self.rules.end_transition_delay.max(0.0));
        let resolution = Resolution { state, counters };
        self.resolution = Some(resolution);
        resolution
    }
}

impl Default for OutcomeEvaluator {
    fn default() -> Self {
        Self::new(OutcomeRules::default())
    }
}
