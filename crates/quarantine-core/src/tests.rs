use crate::commands::PlayerCommand;
use crate::config::EpidemicConfig;
use crate::constants::*;
use crate::enums::*;
use crate::error::ConfigError;
use crate::events::{CounterSnapshot, PresentationEvent};
use crate::state::SimulationSnapshot;
use crate::types::{Position, SimTime, Velocity};

// ---- Config ----

#[test]
fn test_default_config_is_valid() {
    let config = EpidemicConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.infection.sick_threshold, SICK_THRESHOLD);
    assert_eq!(config.spread.spread_power_range, [1, 10]);
    assert_eq!(config.outcome.max_allowed_sick, 10);
    assert!(config.seed.is_none());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{ "outcome": { "max_allowed_sick": 3 }, "seed": 7 }"#;
    let config = EpidemicConfig::from_json_str(json).unwrap();
    assert_eq!(config.outcome.max_allowed_sick, 3);
    assert_eq!(config.outcome.win_after_seconds, WIN_AFTER_SECONDS);
    assert_eq!(config.spread.spread_radius, SPREAD_RADIUS);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = EpidemicConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = EpidemicConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_normalize_swaps_inverted_thresholds() {
    let mut config = EpidemicConfig::default();
    config.infection.sick_threshold = 0.9;
    config.infection.contagious_threshold = 0.5;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ThresholdOrder { .. })
    ));

    let issues = config.normalize();
    assert_eq!(issues.len(), 1);
    assert_eq!(config.infection.sick_threshold, 0.5);
    assert_eq!(config.infection.contagious_threshold, 0.9);
    assert!(config.validate().is_ok(), "normalized config should validate");
}

#[test]
fn test_normalize_swaps_inverted_spread_power() {
    let mut config = EpidemicConfig::default();
    config.spread.spread_power_range = [8, 3];
    let issues = config.normalize();
    assert!(issues
        .iter()
        .any(|i| matches!(i, ConfigError::SpreadPowerRangeInverted { min: 8, max: 3 })));
    assert_eq!(config.spread.spread_power_range, [3, 8]);
}

#[test]
fn test_normalize_clamps_spread_power_bounds() {
    let mut config = EpidemicConfig::default();
    config.spread.spread_power_range = [0, 42];
    config.normalize();
    assert_eq!(config.spread.spread_power_range, [1, 10]);
}

#[test]
fn test_normalize_repairs_negative_and_zero_values() {
    let mut config = EpidemicConfig::default();
    config.infection.base_infection_rate_per_second = -1.0;
    config.spread.spread_tick_interval = 0.0;
    config.infection.sick_threshold = 1.5;
    config.infection.contagious_threshold = 1.5;

    let issues = config.normalize();
    assert_eq!(issues.len(), 4);
    assert_eq!(config.infection.base_infection_rate_per_second, 0.0);
    assert_eq!(config.spread.spread_tick_interval, SPREAD_TICK_INTERVAL);
    assert_eq!(config.infection.sick_threshold, 1.0);
}

#[test]
fn test_config_error_messages() {
    let err = ConfigError::ThresholdOrder {
        sick: 0.9,
        contagious: 0.5,
    };
    assert_eq!(
        err.to_string(),
        "sick_threshold (0.9) is above contagious_threshold (0.5)"
    );
}

// ---- Types ----

#[test]
fn test_position_ranges() {
    let a = Position::new(0.0, 0.0, 0.0);
    let b = Position::new(3.0, 4.0, 12.0);
    assert!((a.range_to(&b) - 13.0).abs() < 1e-10);
    assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-10);
}

#[test]
fn test_velocity_toward_normalizes() {
    let v = Velocity::toward(glam::DVec2::new(10.0, 0.0), 2.0);
    assert!((v.x - 2.0).abs() < 1e-10);
    assert!((v.speed() - 2.0).abs() < 1e-10);

    let still = Velocity::toward(glam::DVec2::ZERO, 2.0);
    assert_eq!(still, Velocity::default());
}

#[test]
fn test_sim_time_advance() {
    let mut time = SimTime::default();
    for _ in 0..TICK_RATE {
        time.advance();
    }
    assert_eq!(time.tick, TICK_RATE as u64);
    assert!((time.elapsed_secs - 1.0).abs() < 1e-10);

    time.advance_by(-5.0);
    assert!((time.elapsed_secs - 1.0).abs() < 1e-10, "negative dt ignored");
}

// ---- Enums ----

#[test]
fn test_outcome_terminal() {
    assert!(!OutcomeState::Playing.is_terminal());
    assert!(OutcomeState::Won.is_terminal());
    assert!(OutcomeState::Lost.is_terminal());
}

#[test]
fn test_query_filter() {
    assert!(QueryFilter::Agents.accepts(Category::Agent));
    assert!(!QueryFilter::Agents.accepts(Category::Inert));
    assert!(QueryFilter::Any.accepts(Category::Inert));
}

// ---- Serialization ----

#[test]
fn test_command_tagged_json() {
    let json = serde_json::to_string(&PlayerCommand::Cure {
        agent_id: 4,
        seconds: 10.0,
    })
    .unwrap();
    assert!(json.contains("\"type\":\"Cure\""));

    let back: PlayerCommand =
        serde_json::from_str(r#"{"type":"Heal","agent_id":2,"amount":0.5}"#).unwrap();
    assert!(matches!(back, PlayerCommand::Heal { agent_id: 2, .. }));
}

#[test]
fn test_outcome_event_json() {
    let event = PresentationEvent::OutcomeReached {
        state: OutcomeState::Lost,
        counters: CounterSnapshot {
            total: 20,
            sick: 11,
            contagious: 4,
        },
        max_allowed_sick: 10,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: PresentationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event, back);
}

#[test]
fn test_default_snapshot_serializes() {
    let snap = SimulationSnapshot::default();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"phase\":\"Idle\""));
}
