use quarantine_core::enums::{Crossing, OutcomeState};
use quarantine_core::events::CounterSnapshot;

use crate::counters::PopulationCounters;
use crate::infection::{Advance, InfectionParams, InfectionState};
use crate::outcome::{OutcomeEvaluator, OutcomeRules};

fn params() -> InfectionParams {
    InfectionParams {
        base_rate: 0.01,
        sick_threshold: 0.6,
        contagious_threshold: 0.85,
        sick_effect_once: true,
    }
}

fn joined(progress: f64, counters: &mut PopulationCounters) -> InfectionState {
    let mut state = InfectionState::new(params(), progress, 1);
    state.join(counters);
    state
}

fn counts(total: u32, sick: u32, contagious: u32) -> CounterSnapshot {
    CounterSnapshot {
        total,
        sick,
        contagious,
    }
}

// ---- Infection progression ----

#[test]
fn test_sixty_seconds_reaches_sick_once() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.0, &mut counters);

    let mut sick_entries = 0;
    for _ in 0..60 {
        if let Advance::Progressed(report) = agent.advance(1.0, &mut counters) {
            if report.sick == Some(Crossing::Entered) {
                sick_entries += 1;
            }
        }
    }

    assert!(
        (agent.progress() - 0.6).abs() < 1e-9,
        "progress should be 0.6, got {}",
        agent.progress()
    );
    assert!(agent.is_sick());
    assert_eq!(sick_entries, 1);
    assert_eq!(counters.sick(), 1);

    // Staying above the threshold never re-counts.
    for _ in 0..10 {
        agent.advance(1.0, &mut counters);
    }
    assert_eq!(counters.sick(), 1);
}

#[test]
fn test_progress_clamped_to_unit_interval() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.5, &mut counters);

    agent.add_infection(5.0, &mut counters);
    assert_eq!(agent.progress(), 1.0);
    agent.advance(100.0, &mut counters);
    assert_eq!(agent.progress(), 1.0);

    agent.heal(7.0, &mut counters);
    assert_eq!(agent.progress(), 0.0);

    let fresh = InfectionState::new(params(), -3.0, 1);
    assert_eq!(fresh.progress(), 0.0);
}

#[test]
fn test_non_positive_amounts_are_noops() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.7, &mut counters);
    let before = agent.clone();

    assert!(agent.add_infection(0.0, &mut counters).is_empty());
    assert!(agent.add_infection(-0.4, &mut counters).is_empty());
    assert!(agent.heal(0.0, &mut counters).is_empty());
    assert!(agent.heal(-0.4, &mut counters).is_empty());
    agent.apply_grace(0.0);
    agent.apply_grace(-2.0);

    assert_eq!(agent, before);
    assert_eq!(counters.sick(), 1);
}

#[test]
fn test_nan_amounts_are_noops() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.7, &mut counters);
    let before = agent.clone();

    assert!(agent.add_infection(f64::NAN, &mut counters).is_empty());
    assert!(agent.heal(f64::NAN, &mut counters).is_empty());
    agent.apply_grace(f64::NAN);

    assert_eq!(agent, before);
    assert!(agent.is_sick());
    assert!((agent.progress() - 0.7).abs() < 1e-12);
}

#[test]
fn test_advance_zero_is_idempotent() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.6, &mut counters);
    let before_counters = counters.clone();
    let before_progress = agent.progress();

    for _ in 0..100 {
        agent.advance(0.0, &mut counters);
        agent.advance(-1.0, &mut counters);
    }
    assert_eq!(agent.progress(), before_progress);
    assert_eq!(counters, before_counters);
}

#[test]
fn test_heal_round_trip_counts_each_crossing_once() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.55, &mut counters);
    assert_eq!(counters.sick(), 0);

    let report = agent.add_infection(0.1, &mut counters);
    assert_eq!(report.sick, Some(Crossing::Entered));
    assert_eq!(counters.sick(), 1);

    let report = agent.heal(0.2, &mut counters);
    assert_eq!(report.sick, Some(Crossing::Exited));
    assert_eq!(counters.sick(), 0);

    // Ticking while below the threshold never decrements again.
    for _ in 0..5 {
        let report = agent.heal(0.01, &mut counters);
        assert!(report.is_empty());
    }
    assert_eq!(counters.sick(), 0);
    assert_eq!(counters.total(), 1);
}

#[test]
fn test_crossing_both_thresholds_at_once() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.1, &mut counters);

    let report = agent.add_infection(0.8, &mut counters);
    assert_eq!(report.sick, Some(Crossing::Entered));
    assert_eq!(report.contagious, Some(Crossing::Entered));
    assert_eq!(counters.snapshot(), counts(1, 1, 1));

    let report = agent.heal(0.9, &mut counters);
    assert_eq!(report.sick, Some(Crossing::Exited));
    assert_eq!(report.contagious, Some(Crossing::Exited));
    assert_eq!(counters.snapshot(), counts(1, 0, 0));
}

#[test]
fn test_sick_effect_plays_once_by_default() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.55, &mut counters);

    assert!(agent.add_infection(0.1, &mut counters).play_sick_effect);
    agent.heal(0.2, &mut counters);
    let again = agent.add_infection(0.2, &mut counters);
    assert_eq!(again.sick, Some(Crossing::Entered));
    assert!(!again.play_sick_effect, "effect is play-once");

    agent.heal(0.2, &mut counters);
    agent.reset_sick_effect();
    assert!(agent.add_infection(0.2, &mut counters).play_sick_effect);
}

#[test]
fn test_sick_effect_repeats_without_once_policy() {
    let mut counters = PopulationCounters::new();
    let mut agent = InfectionState::new(
        InfectionParams {
            sick_effect_once: false,
            ..params()
        },
        0.55,
        1,
    );
    agent.join(&mut counters);

    assert!(agent.add_infection(0.1, &mut counters).play_sick_effect);
    agent.heal(0.2, &mut counters);
    assert!(agent.add_infection(0.2, &mut counters).play_sick_effect);
}

#[test]
fn test_join_counts_starting_state_without_effect() {
    let mut counters = PopulationCounters::new();
    let mut agent = InfectionState::new(params(), 0.9, 3);

    // Detached agents never touch counters.
    agent.add_infection(0.05, &mut counters);
    assert_eq!(counters.snapshot(), counts(0, 0, 0));

    assert!(agent.join(&mut counters));
    assert!(!agent.join(&mut counters), "second join is ignored");
    assert_eq!(counters.snapshot(), counts(1, 1, 1));
    assert!(agent.counted_sick());
    assert!(agent.counted_contagious());
}

#[test]
fn test_leave_uses_counted_membership() {
    let mut counters = PopulationCounters::new();
    let mut a = joined(0.9, &mut counters);
    let mut b = joined(0.2, &mut counters);
    assert_eq!(counters.snapshot(), counts(2, 1, 1));

    assert!(a.leave(&mut counters));
    assert!(!a.leave(&mut counters), "second leave is ignored");
    assert_eq!(counters.snapshot(), counts(1, 0, 0));

    b.leave(&mut counters);
    assert_eq!(counters.snapshot(), counts(0, 0, 0));
}

#[test]
fn test_spread_power_clamped() {
    assert_eq!(InfectionState::new(params(), 0.0, 0).spread_power(), 1);
    assert_eq!(InfectionState::new(params(), 0.0, 99).spread_power(), 10);
}

// ---- Grace ----

#[test]
fn test_grace_extends_by_max() {
    let mut agent = InfectionState::new(params(), 0.0, 1);
    agent.apply_grace(10.0);
    agent.apply_grace(5.0);
    assert_eq!(agent.grace_remaining(), 10.0);
    assert_eq!(agent.grace_duration(), 10.0);

    agent.apply_grace(12.0);
    assert_eq!(agent.grace_remaining(), 12.0);
}

#[test]
fn test_grace_holds_baseline_progress() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.3, &mut counters);
    agent.apply_grace(2.0);

    let first = agent.advance(0.5, &mut counters);
    assert_eq!(
        first,
        Advance::Grace {
            fraction: 0.75,
            ended: false
        }
    );
    assert_eq!(agent.progress(), 0.3);

    agent.advance(1.0, &mut counters);
    let last = agent.advance(1.0, &mut counters);
    assert_eq!(
        last,
        Advance::Grace {
            fraction: 0.0,
            ended: true
        }
    );
    assert_eq!(agent.grace_remaining(), 0.0, "grace floors at zero");
    assert_eq!(agent.progress(), 0.3);

    // Grace over: baseline resumes.
    assert!(matches!(
        agent.advance(1.0, &mut counters),
        Advance::Progressed(_)
    ));
    assert!((agent.progress() - 0.31).abs() < 1e-12);
}

#[test]
fn test_grace_does_not_block_exposure() {
    let mut counters = PopulationCounters::new();
    let mut agent = joined(0.5, &mut counters);
    agent.apply_grace(30.0);

    let report = agent.add_infection(0.2, &mut counters);
    assert!((agent.progress() - 0.7).abs() < 1e-12);
    assert_eq!(report.sick, Some(Crossing::Entered));
    assert_eq!(counters.sick(), 1);
}

// ---- Counters ----

#[test]
fn test_counters_floor_at_zero() {
    let mut counters = PopulationCounters::new();
    counters.on_agent_left(true, true);
    counters.on_sick_changed(false);
    counters.on_contagious_changed(false);
    assert_eq!(counters.snapshot(), counts(0, 0, 0));

    counters.on_agent_joined();
    counters.on_sick_changed(true);
    counters.reset();
    assert_eq!(counters.snapshot(), counts(0, 0, 0));
}

// ---- Outcome ----

#[test]
fn test_not_ready_with_empty_population() {
    let mut eval = OutcomeEvaluator::default();

    // Impossible counters, but the gate is closed.
    assert!(eval.evaluate(counts(0, 50, 0), 1.0).is_none());
    assert!(!eval.is_ready());
    assert_eq!(eval.elapsed(), 0.0);
    assert_eq!(eval.state(), OutcomeState::Playing);

    assert!(eval.evaluate(counts(1, 0, 0), 1.0).is_none());
    assert!(eval.is_ready());
    assert_eq!(eval.elapsed(), 1.0, "checks run on the tick the gate opens");
}

#[test]
fn test_loss_beats_same_tick_win() {
    let mut eval = OutcomeEvaluator::new(OutcomeRules {
        max_allowed_sick: 10,
        win_after_seconds: 5.0,
        ..OutcomeRules::default()
    });
    for _ in 0..4 {
        assert!(eval.evaluate(counts(20, 3, 0), 1.0).is_none());
    }

    let resolution = eval.evaluate(counts(20, 11, 2), 1.0).unwrap();
    assert_eq!(resolution.state, OutcomeState::Lost);
    assert_eq!(resolution.counters, counts(20, 11, 2));
    assert_eq!(eval.elapsed(), 4.0, "elapsed frozen before the win timer");
}

#[test]
fn test_timer_win() {
    let mut eval = OutcomeEvaluator::new(OutcomeRules {
        win_after_seconds: 3.0,
        ..OutcomeRules::default()
    });
    assert!(eval.evaluate(counts(5, 10, 0), 1.0).is_none(), "10 allowed");
    assert!(eval.evaluate(counts(5, 0, 0), 1.0).is_none());
    assert!((eval.time_remaining() - 1.0).abs() < 1e-12);

    let resolution = eval.evaluate(counts(5, 0, 0), 1.0).unwrap();
    assert_eq!(resolution.state, OutcomeState::Won);
    assert_eq!(eval.time_remaining(), 0.0);

    // Terminal: further ticks are no-ops.
    assert!(eval.evaluate(counts(5, 40, 0), 1.0).is_none());
    assert_eq!(eval.state(), OutcomeState::Won);
    assert_eq!(eval.elapsed(), 3.0);
}

#[test]
fn test_timer_win_disabled() {
    let mut eval = OutcomeEvaluator::new(OutcomeRules {
        enable_timer_win: false,
        win_after_seconds: 1.0,
        ..OutcomeRules::default()
    });
    for _ in 0..100 {
        assert!(eval.evaluate(counts(5, 0, 0), 1.0).is_none());
    }
    assert_eq!(eval.elapsed(), 0.0);
    assert_eq!(eval.time_remaining(), 0.0);
}

#[test]
fn test_forfeit_before_ready() {
    let mut eval = OutcomeEvaluator::default();
    let resolution = eval.forfeit(counts(0, 0, 0)).unwrap();
    assert_eq!(resolution.state, OutcomeState::Lost);
    assert!(!eval.is_ready());
    assert!(eval.forfeit(counts(0, 0, 0)).is_none(), "already terminal");
}

#[test]
fn test_end_transition_fires_once_after_delay() {
    let mut eval = OutcomeEvaluator::new(OutcomeRules {
        end_transition_delay: 1.0,
        ..OutcomeRules::default()
    });
    assert!(eval.advance_end_transition(5.0).is_none(), "nothing pending");

    eval.forfeit(counts(3, 0, 0));
    assert!(eval.end_transition_pending());
    assert!(eval.advance_end_transition(0.5).is_none());

    let transition = eval.advance_end_transition(0.5).unwrap();
    assert_eq!(transition.state, OutcomeState::Lost);
    assert_eq!(transition.scene, "LoseScene");
    assert!(eval.advance_end_transition(1.0).is_none());
}

#[test]
fn test_end_transition_skipped_without_scene() {
    let mut eval = OutcomeEvaluator::new(OutcomeRules {
        end_transition_delay: 0.0,
        lose_scene: String::new(),
        ..OutcomeRules::default()
    });
    eval.forfeit(counts(1, 0, 0));
    assert!(eval.advance_end_transition(0.1).is_none());
    assert!(!eval.end_transition_pending());
}

#[test]
fn test_reset_restores_playing() {
    let mut eval = OutcomeEvaluator::default();
    eval.evaluate(counts(1, 0, 0), 2.0);
    eval.forfeit(counts(1, 0, 0));

    eval.reset();
    assert_eq!(eval.state(), OutcomeState::Playing);
    assert_eq!(eval.elapsed(), 0.0);
    assert!(!eval.is_ready());
    assert!(eval.resolution().is_none());
    assert_eq!(eval.rules().max_allowed_sick, 10);
}
