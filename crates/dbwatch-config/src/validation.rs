//! Configuration validation

use crate::schema::RawConfig;
use crate::settings::{DEFAULT_MAX_DURATION, DEFAULT_WARNING_SECONDS};
use std::collections::HashSet;
use thiserror::Error;

/// Poll intervals below this would turn the scheduler into a busy loop
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("Warning threshold {seconds}s >= max_duration {max_duration}s")]
    WarningExceedsMaxDuration { seconds: u64, max_duration: u64 },

    #[error("Duplicate warning threshold: {0}s")]
    DuplicateWarning(u64),

    #[error("poll_interval_ms {value} is below the minimum of {min}")]
    PollIntervalTooShort { value: u64, min: u64 },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let db = &config.database;
    if db.server.as_deref().is_some_and(|s| s.trim().is_empty()) {
        errors.push(ValidationError::EmptyField {
            field: "database.server",
        });
    }
    if db.database.as_deref().is_some_and(|s| s.trim().is_empty()) {
        errors.push(ValidationError::EmptyField {
            field: "database.database",
        });
    }
    if db.port == Some(0) {
        errors.push(ValidationError::ZeroValue {
            field: "database.port",
        });
    }
    if db.connect_timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroValue {
            field: "database.connect_timeout_seconds",
        });
    }

    let timer = &config.timer;
    if timer.max_duration_seconds == Some(0) {
        errors.push(ValidationError::ZeroValue {
            field: "timer.max_duration_seconds",
        });
    }
    if let Some(ms) = timer.poll_interval_ms
        && ms < MIN_POLL_INTERVAL_MS
    {
        errors.push(ValidationError::PollIntervalTooShort {
            value: ms,
            min: MIN_POLL_INTERVAL_MS,
        });
    }

    let max_duration = timer
        .max_duration_seconds
        .unwrap_or(DEFAULT_MAX_DURATION.as_secs());

    // Skip when max_duration is 0; that is already reported above
    if max_duration > 0 {
        match &timer.warnings {
            Some(warnings) => {
                let mut seen = HashSet::new();
                for warning in warnings {
                    if !seen.insert(warning.seconds_before) {
                        errors.push(ValidationError::DuplicateWarning(warning.seconds_before));
                    }
                    if warning.seconds_before >= max_duration {
                        errors.push(ValidationError::WarningExceedsMaxDuration {
                            seconds: warning.seconds_before,
                            max_duration,
                        });
                    }
                }
            }
            None => {
                if DEFAULT_WARNING_SECONDS >= max_duration {
                    errors.push(ValidationError::WarningExceedsMaxDuration {
                        seconds: DEFAULT_WARNING_SECONDS,
                        max_duration,
                    });
                }
            }
        }
    }

    let notifications = &config.notifications;
    if notifications
        .title
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        errors.push(ValidationError::EmptyField {
            field: "notifications.title",
        });
    }
    if notifications.timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroValue {
            field: "notifications.timeout_seconds",
        });
    }

    if config
        .logging
        .level
        .as_deref()
        .is_some_and(|l| l.trim().is_empty())
    {
        errors.push(ValidationError::EmptyField {
            field: "logging.level",
        });
    }

    errors
}
