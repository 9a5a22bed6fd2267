//! Error types for configuration loading and progression bookkeeping.
//!
//! Nothing in here is raised from inside a simulation tick.

use thiserror::Error;

/// Errors that can occur when loading settings or catalog data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read config '{path}': {details}")]
    ReadError { path: String, details: String },

    /// JSON parsing failed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is unusable.
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Locally rejected progression operations. State is unchanged when returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Unknown ability '{0}'")]
    UnknownAbility(String),

    #[error("Ability '{0}' is already unlocked")]
    AlreadyUnlocked(String),

    #[error("Not enough XP: need {needed}, have {available}")]
    InsufficientXp { needed: u32, available: u32 },

    #[error("Unknown mission '{0}'")]
    UnknownMission(String),

    #[error("Mission '{0}' was already claimed")]
    AlreadyClaimed(String),

    #[error("Mission incomplete: {progress}/{requirement}")]
    MissionIncomplete { progress: u32, requirement: u32 },
}
