//! Monitor: folds poll results into the session timer and the display model

use chrono::{DateTime, Local};
use dbwatch_api::{ActivitySignal, DisplayState, STATUS_ACTIVE, STATUS_COMPLETED};
use dbwatch_util::{MonotonicInstant, format_duration, format_hms};
use std::fmt;
use tracing::{debug, error, info};

use crate::{CoreEvent, Session, TimerPlan};

/// Owns the session timer and everything the user sees
pub struct Monitor {
    session: Session,
    display: DisplayState,
}

impl Monitor {
    /// Create an idle monitor for `database` on `server`
    pub fn new(plan: TimerPlan, server: impl Into<String>, database: impl Into<String>) -> Self {
        let state = DisplayState::new(server, database);

        info!(
            server = %state.server,
            database = %state.database,
            max_duration = %format_duration(plan.max_duration),
            warning_count = plan.warnings.len(),
            "Monitor initialized"
        );

        Self {
            session: Session::new(plan),
            display: state,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Apply a successful poll
    pub fn on_activity(
        &mut self,
        signal: &ActivitySignal,
        now_mono: MonotonicInstant,
        now: DateTime<Local>,
    ) -> Vec<CoreEvent> {
        let step = self.session.clone().advance(now_mono, now, signal);
        self.session = step.session;

        for event in &step.events {
            match event {
                CoreEvent::SessionStarted {
                    session_id,
                    program,
                    started_at,
                } => {
                    info!(
                        session_id = %session_id,
                        program = %program,
                        started_at = %started_at,
                        "Activity detected, session started"
                    );
                    self.display.status = STATUS_ACTIVE.to_string();
                    self.display.program = program.clone();
                }
                CoreEvent::Warning {
                    session_id,
                    threshold_seconds,
                    time_remaining,
                    ..
                } => {
                    info!(
                        session_id = %session_id,
                        threshold_seconds,
                        remaining_secs = time_remaining.as_secs(),
                        "Warning issued"
                    );
                }
                CoreEvent::SessionCompleted {
                    session_id,
                    duration,
                    ..
                } => {
                    info!(
                        session_id = %session_id,
                        duration_secs = duration.as_secs(),
                        "Session completed"
                    );
                    self.display.status = STATUS_COMPLETED.to_string();
                }
            }
        }

        if let Some(reading) = step.reading {
            self.display.progress = Some(reading.progress);
            self.display.remaining = Some(format_hms(reading.remaining));
        }

        debug!(
            active = signal.active,
            state = ?self.session.state(),
            progress = ?self.display.progress,
            "Tick applied"
        );

        step.events
    }

    /// Record a failed poll. The timer is left exactly as it was.
    pub fn on_probe_error(&mut self, err: &dyn fmt::Display) {
        let message = err.to_string();
        error!("Connection error: {}", message);
        self.display.status = DisplayState::error_status(&message);
    }
}
