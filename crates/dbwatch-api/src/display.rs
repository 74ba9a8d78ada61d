//! Display model
//!
//! Five text fields and one 0-100 progress value, refreshed every tick.
//! Front-ends render this; they never compute it.

use serde::{Deserialize, Serialize};

/// Status shown before any activity has been seen
pub const STATUS_WAITING: &str = "Waiting for database activity...";

/// Status shown when a usage session starts
pub const STATUS_ACTIVE: &str = "Activity detected! Monitoring...";

/// Status shown when a usage session runs out
pub const STATUS_COMPLETED: &str = "Time's up! Session completed.";

/// Placeholder for the remaining time when no session has run yet
pub const REMAINING_PLACEHOLDER: &str = "--:--:--";

/// Program field before any program has been seen
const PROGRAM_NONE: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub server: String,
    pub database: String,
    pub status: String,
    pub program: String,
    /// Remaining time as `H:MM:SS`; `None` until a session has been timed
    pub remaining: Option<String>,
    /// Progress percentage; `None` until a session has been timed
    pub progress: Option<u8>,
}

impl DisplayState {
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            status: STATUS_WAITING.to_string(),
            program: PROGRAM_NONE.to_string(),
            remaining: None,
            progress: None,
        }
    }

    /// Status text for a failed poll
    pub fn error_status(message: &str) -> String {
        format!("Error: {}", message)
    }

    /// Text lines in display order
    pub fn lines(&self) -> Vec<String> {
        let progress = self
            .progress
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());

        vec![
            format!("Server: {}", self.server),
            format!("Database: {}", self.database),
            self.status.clone(),
            format!("Program: {}", self.program),
            format!(
                "Time Remaining: {}",
                self.remaining.as_deref().unwrap_or(REMAINING_PLACEHOLDER)
            ),
            format!("Progress: {}", progress),
        ]
    }
}
