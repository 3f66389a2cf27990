//! Error types for configuration handling.

use thiserror::Error;

/// Problems found in an [`EpidemicConfig`](crate::config::EpidemicConfig).
///
/// `validate` reports the first one as an error. `normalize` repairs all of
/// them and hands back the list so callers can log what was changed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sick_threshold ({sick}) is above contagious_threshold ({contagious})")]
    ThresholdOrder { sick: f64, contagious: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("spread_power_range is inverted: [{min}, {max}]")]
    SpreadPowerRangeInverted { min: u32, max: u32 },

    #[error("spread_power_range bound {value} outside 1..=10")]
    SpreadPowerOutOfRange { value: u32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
