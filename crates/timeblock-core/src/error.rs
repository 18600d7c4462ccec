//! Core error types for timeblock-core.
//!
//! [`ScheduleError`] is what the engine itself returns from every scheduling
//! and recurrence operation. [`ValidationError`] covers malformed host input
//! rejected at the record boundary, and [`ConfigError`] covers the TOML
//! configuration layer. [`CoreError`] ties them together for callers that
//! mix all three (the CLI, host adapters).

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::grid::Interval;
use crate::task::TaskRef;

/// Core error type for timeblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Scheduling / recurrence failures
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Malformed task or series input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Typed failures of the scheduling engine.
///
/// `NoAvailableSlot` means no free time at all; `Conflict` means the chosen
/// time is taken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// No free window on the grid is long enough for the task.
    #[error("No available slot of {duration_minutes} minutes")]
    NoAvailableSlot { duration_minutes: u32 },

    /// The candidate interval overlaps a committed task.
    #[error("{candidate} conflicts with task '{}' ({})", .conflicting.title, .conflicting.interval)]
    Conflict {
        candidate: Interval,
        conflicting: Box<TaskRef>,
    },

    /// The interval falls outside the allowed bounds.
    #[error("Interval {start_minutes}..{end_minutes} is outside bounds {bounds}")]
    OutOfBounds {
        start_minutes: i64,
        end_minutes: i64,
        bounds: Interval,
    },

    /// end <= start after midnight normalization, or out of the day range.
    #[error("Invalid interval: start={start_minutes} end={end_minutes}")]
    InvalidInterval { start_minutes: i64, end_minutes: i64 },

    /// Bad grid / drag parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host store rejected a command computed from an older snapshot.
    #[error("Stale commit for '{target}': {reason}")]
    StaleCommit { target: String, reason: String },

    /// The operation needs a scheduled task.
    #[error("Task '{0}' has no scheduled interval")]
    Unscheduled(String),

    /// The anchor date is not an occurrence of the series.
    #[error("{date} is not an occurrence of series '{series_id}'")]
    NotAnOccurrence { series_id: String, date: NaiveDate },
}

impl ScheduleError {
    /// The conflicting task, if this is a conflict.
    pub fn conflicting_task(&self) -> Option<&TaskRef> {
        match self {
            ScheduleError::Conflict { conflicting, .. } => Some(conflicting),
            _ => None,
        }
    }

    /// True for errors detected locally, before any commit attempt.
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            ScheduleError::OutOfBounds { .. }
                | ScheduleError::InvalidInterval { .. }
                | ScheduleError::InvalidConfig(_)
                | ScheduleError::Unscheduled(_)
                | ScheduleError::NotAnOccurrence { .. }
        )
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors raised while turning host records into engine types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A time string that is not HH:MM
    #[error("Invalid time '{value}' for '{field}'")]
    InvalidTime { field: String, value: String },

    /// Only one of start_time / end_time was supplied
    #[error("Task '{task_id}' has {present} but no {missing}")]
    HalfScheduled {
        task_id: String,
        present: &'static str,
        missing: &'static str,
    },

    /// Declared duration disagrees with the interval length
    #[error("Task '{task_id}' declares {declared} minutes but its interval spans {actual}")]
    DurationMismatch {
        task_id: String,
        declared: u32,
        actual: u32,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
