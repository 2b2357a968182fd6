//! Error types
//!
//! Only construction can fail at runtime. Everything inside a tick is either
//! infallible or an invariant, and invariants are asserted instead.

use crate::sim::SessionState;

/// Rejected game configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidDimension { field: String, value: f32 },

    #[error("{field} must be finite (got {value})")]
    NonFinite { field: String, value: f32 },

    #[error("spawn rule '{rule}' has a ceiling of 0")]
    ZeroCeiling { rule: String },

    #[error("spawn rule '{rule}' has no templates")]
    EmptySpawnTable { rule: String },

    #[error("spawn rule '{rule}' has a total template weight of 0")]
    ZeroSpawnWeight { rule: String },

    #[error("spawn rule '{rule}' has interval {interval_ms}ms below its floor {min_interval_ms}ms")]
    IntervalBelowFloor {
        rule: String,
        interval_ms: f64,
        min_interval_ms: f64,
    },

    #[error("spawn rule '{rule}' chance {chance} is outside (0, 1]")]
    InvalidChance { rule: String, chance: f32 },

    #[error("template '{template}' does not match the class of spawn rule '{rule}'")]
    TemplateClassMismatch { rule: String, template: String },

    #[error("spawn rule '{rule}' places entities in lanes but the world has none")]
    MissingLanes { rule: String },

    #[error("{field} range [{min}, {max}] is inverted or too wide")]
    InvalidRange { field: String, min: f32, max: f32 },

    #[error("lane layout must have at least one lane")]
    ZeroLanes,

    #[error("lane width must be greater than 0")]
    ZeroLaneWidth,

    #[error("starting lives must be at least 1")]
    ZeroLives,

    #[error("invalid config JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Session transition that is not legal from the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while {from:?}")]
pub struct TransitionError {
    pub from: SessionState,
    pub action: &'static str,
}

/// Best-score file could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("best score file: {0}")]
    Io(#[from] std::io::Error),

    #[error("best score format: {0}")]
    Format(#[from] serde_json::Error),
}
