//! One poll-and-update tick

use chrono::{DateTime, Local};
use dbwatch_api::ActivitySignal;
use dbwatch_host_api::{ActivityProbe, Notifier};
use dbwatch_util::MonotonicInstant;
use std::sync::Arc;
use tracing::warn;

use crate::{CoreEvent, Monitor};

/// What a tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The probe answered; these events were produced
    Polled {
        signal: ActivitySignal,
        events: Vec<CoreEvent>,
    },
    /// The probe failed; the timer was not advanced
    Failed { error: String },
}

/// Runs probe -> monitor -> notifications for one tick
pub struct Poller {
    probe: Arc<dyn ActivityProbe>,
    notifier: Arc<dyn Notifier>,
    title: String,
}

impl Poller {
    pub fn new(
        probe: Arc<dyn ActivityProbe>,
        notifier: Arc<dyn Notifier>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            probe,
            notifier,
            title: title.into(),
        }
    }

    pub fn probe(&self) -> &Arc<dyn ActivityProbe> {
        &self.probe
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Poll once and fold the result into `monitor`.
    ///
    /// Probe failures end up in the display and the log; they never escape.
    pub async fn tick(
        &self,
        monitor: &mut Monitor,
        now_mono: MonotonicInstant,
        now: DateTime<Local>,
    ) -> TickOutcome {
        let sessions = match self.probe.sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                monitor.on_probe_error(&e);
                return TickOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let signal = ActivitySignal::from_sessions(&sessions);
        let events = monitor.on_activity(&signal, now_mono, now);

        for event in &events {
            if let Some(message) = event.notification_message() {
                if let Err(e) = self.notifier.notify(&self.title, message).await {
                    warn!(
                        session_id = %event.session_id(),
                        backend = self.notifier.backend(),
                        error = %e,
                        "Failed to deliver notification"
                    );
                }
            }
        }

        TickOutcome::Polled { signal, events }
    }
}
