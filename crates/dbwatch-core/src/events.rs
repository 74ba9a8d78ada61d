//! Core events emitted by the session timer

use chrono::{DateTime, Local};
use dbwatch_util::SessionId;
use std::time::Duration;

/// Events emitted by the session timer
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// Activity seen while idle; a usage session started
    SessionStarted {
        session_id: SessionId,
        program: String,
        started_at: DateTime<Local>,
    },

    /// Warning threshold reached
    Warning {
        session_id: SessionId,
        threshold_seconds: u64,
        time_remaining: Duration,
        message: String,
    },

    /// The usage session ran its full length; the timer is idle again
    SessionCompleted {
        session_id: SessionId,
        program: String,
        duration: Duration,
        message: String,
    },
}

impl CoreEvent {
    /// Text to show the user for this event, if it warrants a notification
    pub fn notification_message(&self) -> Option<&str> {
        match self {
            CoreEvent::Warning { message, .. } | CoreEvent::SessionCompleted { message, .. } => {
                Some(message.as_str())
            }
            CoreEvent::SessionStarted { .. } => None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            CoreEvent::SessionStarted { session_id, .. }
            | CoreEvent::Warning { session_id, .. }
            | CoreEvent::SessionCompleted { session_id, .. } => session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_warnings_and_completion_notify() {
        let session_id = SessionId::new();
        let started = CoreEvent::SessionStarted {
            session_id: session_id.clone(),
            program: "psql".into(),
            started_at: Local::now(),
        };
        let warning = CoreEvent::Warning {
            session_id: session_id.clone(),
            threshold_seconds: 300,
            time_remaining: Duration::from_secs(300),
            message: "5 minutes remaining!".into(),
        };
        let completed = CoreEvent::SessionCompleted {
            session_id: session_id.clone(),
            program: "psql".into(),
            duration: Duration::from_secs(3600),
            message: "Time's up! 60 minutes completed.".into(),
        };

        assert_eq!(started.notification_message(), None);
        assert_eq!(warning.notification_message(), Some("5 minutes remaining!"));
        assert_eq!(
            completed.notification_message(),
            Some("Time's up! 60 minutes completed.")
        );
        assert_eq!(completed.session_id(), &session_id);
    }
}
