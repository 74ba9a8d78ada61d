//! Shared types for dbwatch

use chrono::{DateTime, Utc};
use dbwatch_util::DbSessionId;
use serde::{Deserialize, Serialize};

use crate::UNKNOWN_PROGRAM;

/// One server-side session bound to the watched database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSession {
    pub session_id: DbSessionId,
    pub program_name: Option<String>,
    pub login_name: Option<String>,
    pub host_name: Option<String>,
    pub last_request_at: Option<DateTime<Utc>>,
}

/// What one successful poll tells the session timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySignal {
    /// At least one qualifying database session exists
    pub active: bool,
    /// Program name of the first session, or `"Unknown"`
    pub program: String,
}

impl ActivitySignal {
    /// Build the signal from the rows a probe returned.
    ///
    /// Only the first row's program name is consumed. A NULL or blank
    /// program name reads as `"Unknown"`.
    pub fn from_sessions(sessions: &[DbSession]) -> Self {
        let program = sessions
            .first()
            .and_then(|s| s.program_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_PROGRAM)
            .to_string();

        Self {
            active: !sessions.is_empty(),
            program,
        }
    }

    /// A signal reporting no activity
    pub fn idle() -> Self {
        Self {
            active: false,
            program: UNKNOWN_PROGRAM.to_string(),
        }
    }

    /// A signal reporting activity from `program`
    pub fn active(program: impl Into<String>) -> Self {
        Self {
            active: true,
            program: program.into(),
        }
    }
}

/// Warning threshold configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningThreshold {
    /// Seconds before expiry to issue this warning
    pub seconds_before: u64,
    pub message: String,
}

impl WarningThreshold {
    pub fn new(seconds_before: u64, message: impl Into<String>) -> Self {
        Self {
            seconds_before,
            message: message.into(),
        }
    }
}

/// Session timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// No usage session in progress
    Idle,
    /// Counting down a usage session
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, program: Option<&str>) -> DbSession {
        DbSession {
            session_id: DbSessionId::new(id),
            program_name: program.map(String::from),
            login_name: Some("trainer".into()),
            host_name: None,
            last_request_at: None,
        }
    }

    #[test]
    fn no_rows_is_inactive_and_unknown() {
        let signal = ActivitySignal::from_sessions(&[]);
        assert!(!signal.active);
        assert_eq!(signal.program, "Unknown");
    }

    #[test]
    fn first_row_program_is_reported() {
        let rows = vec![row(51, Some("psql")), row(52, Some("pgAdmin 4"))];
        let signal = ActivitySignal::from_sessions(&rows);
        assert!(signal.active);
        assert_eq!(signal.program, "psql");
    }

    #[test]
    fn missing_program_name_reads_unknown() {
        let signal = ActivitySignal::from_sessions(&[row(51, None)]);
        assert!(signal.active);
        assert_eq!(signal.program, "Unknown");

        let signal = ActivitySignal::from_sessions(&[row(51, Some("  "))]);
        assert!(signal.active);
        assert_eq!(signal.program, "Unknown");
    }

    #[test]
    fn timer_state_serialization() {
        let json = serde_json::to_string(&TimerState::Running).unwrap();
        assert_eq!(json, "\"running\"");
    }
}
