//! Core error types for stride-core.
//!
//! This module defines the error hierarchy using thiserror. Goal-ladder
//! invariant violations are always typed errors, never sentinels or
//! silent fallbacks.

use thiserror::Error;

use crate::goal::GoalTier;

/// Core error type for stride-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Goal ladder construction or editing errors
    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lookup by id found nothing
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Goal ladder errors.
///
/// A habit's goals form a three-tier ladder (low, clear, stretch) sharing
/// a direction and a unit, with targets ordered for that direction. Every
/// way a ladder can be malformed has its own variant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalError {
    /// A tier is absent from the set
    #[error("missing {0} goal")]
    MissingTier(GoalTier),

    /// A tier appears more than once
    #[error("duplicate {0} goal")]
    DuplicateTier(GoalTier),

    /// A goal was supplied in the wrong slot
    #[error("expected {expected} goal, found {found}")]
    TierMismatch { expected: GoalTier, found: GoalTier },

    /// Targets must be finite and strictly positive
    #[error("{tier} target must be positive, got {target}")]
    NonPositiveTarget { tier: GoalTier, target: f64 },

    /// Frequencies must be finite and strictly positive
    #[error("{tier} frequency must be positive")]
    NonPositiveFrequency { tier: GoalTier },

    /// All tiers must agree on direction
    #[error("goals in a ladder must share a direction (all additive or all subtractive)")]
    MixedPolarity,

    /// All tiers must agree on the target unit
    #[error("goals in a ladder must share a target unit")]
    UnitMismatch,

    /// Targets violate the ordering for the ladder's direction
    #[error("targets are not ordered for the ladder's direction")]
    UnorderedTargets,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored timestamp could not be parsed
    #[error("invalid timestamp in {column}: {value}")]
    InvalidTimestamp { column: String, value: String },

    /// A stored enum value could not be parsed
    #[error("invalid {field} value: {value}")]
    InvalidField { field: String, value: String },

    /// Filesystem-level failure while locating or creating the database
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    /// Dot-path key does not exist
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Round-trip through JSON for dot-path access failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
