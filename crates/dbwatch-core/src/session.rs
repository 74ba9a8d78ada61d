//! Session timer state machine
//!
//! A [`Session`] is a plain value. [`advance`] takes one, the current time and
//! the latest activity signal, and returns the next value together with the
//! events the transition produced. Nothing here touches the clock, the
//! database or the desktop.

use chrono::{DateTime, Local};
use dbwatch_api::{ActivitySignal, TimerState, WarningThreshold};
use dbwatch_config::TimerSettings;
use dbwatch_util::{MonotonicInstant, SessionId};
use std::time::Duration;

use crate::CoreEvent;

/// Fixed shape of every usage session
#[derive(Debug, Clone, PartialEq)]
pub struct TimerPlan {
    pub max_duration: Duration,
    pub warnings: Vec<WarningThreshold>,
    pub completion_message: String,
}

impl TimerPlan {
    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self {
            max_duration: settings.max_duration,
            warnings: settings.warnings.clone(),
            completion_message: settings.completion_message(),
        }
    }

    /// Compute warning times (as durations after start)
    pub fn warning_times(&self) -> Vec<(u64, Duration)> {
        self.warnings
            .iter()
            .filter(|w| Duration::from_secs(w.seconds_before) < self.max_duration)
            .map(|w| {
                let trigger_after = self.max_duration - Duration::from_secs(w.seconds_before);
                (w.seconds_before, trigger_after)
            })
            .collect()
    }
}

/// A usage session in progress
#[derive(Debug, Clone, PartialEq)]
pub struct RunningSession {
    pub session_id: SessionId,

    /// Program reported when the session started
    pub program: String,

    /// Wall-clock start time (for display/logging)
    pub started_at: DateTime<Local>,

    /// Monotonic start time (for enforcement)
    pub started_at_mono: MonotonicInstant,

    /// Warning thresholds already issued (seconds before expiry)
    pub warnings_issued: Vec<u64>,
}

impl RunningSession {
    pub fn elapsed(&self, now_mono: MonotonicInstant) -> Duration {
        now_mono.duration_since(self.started_at_mono)
    }
}

/// Elapsed/remaining snapshot taken on a tick that did not end the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerReading {
    pub elapsed: Duration,
    pub remaining: Duration,
    /// `floor(elapsed / max_duration * 100)`
    pub progress: u8,
}

/// The usage session timer
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    plan: TimerPlan,
    running: Option<RunningSession>,
}

/// Result of one [`advance`] step
#[derive(Debug, Clone)]
pub struct Step {
    pub session: Session,
    pub events: Vec<CoreEvent>,
    /// `None` while idle and on the tick a session completes
    pub reading: Option<TimerReading>,
}

impl Session {
    /// Create an idle timer
    pub fn new(plan: TimerPlan) -> Self {
        Self {
            plan,
            running: None,
        }
    }

    pub fn plan(&self) -> &TimerPlan {
        &self.plan
    }

    pub fn running(&self) -> Option<&RunningSession> {
        self.running.as_ref()
    }

    pub fn state(&self) -> TimerState {
        if self.running.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    /// Monotonic start of the session in progress
    pub fn start_time(&self) -> Option<MonotonicInstant> {
        self.running.as_ref().map(|r| r.started_at_mono)
    }

    /// Whether the warning `seconds_before` expiry has fired in the current session
    pub fn warning_issued(&self, seconds_before: u64) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| r.warnings_issued.contains(&seconds_before))
    }

    /// Remaining time of the session in progress
    pub fn time_remaining(&self, now_mono: MonotonicInstant) -> Option<Duration> {
        self.running
            .as_ref()
            .map(|r| self.plan.max_duration.saturating_sub(r.elapsed(now_mono)))
    }

    /// Apply one tick. See [`advance`].
    pub fn advance(
        mut self,
        now_mono: MonotonicInstant,
        now: DateTime<Local>,
        signal: &ActivitySignal,
    ) -> Step {
        let mut events = Vec::new();

        // Idle -> Running
        if signal.active && self.running.is_none() {
            let running = RunningSession {
                session_id: SessionId::new(),
                program: signal.program.clone(),
                started_at: now,
                started_at_mono: now_mono,
                warnings_issued: Vec::new(),
            };
            events.push(CoreEvent::SessionStarted {
                session_id: running.session_id.clone(),
                program: running.program.clone(),
                started_at: now,
            });
            self.running = Some(running);
        }

        let Some(running) = self.running.as_mut() else {
            return Step {
                session: self,
                events,
                reading: None,
            };
        };

        let elapsed = running.elapsed(now_mono);
        let remaining = self.plan.max_duration.saturating_sub(elapsed);

        // Running -> Idle
        if remaining.is_zero() {
            events.push(CoreEvent::SessionCompleted {
                session_id: running.session_id.clone(),
                program: running.program.clone(),
                duration: elapsed,
                message: self.plan.completion_message.clone(),
            });
            self.running = None;
            return Step {
                session: self,
                events,
                reading: None,
            };
        }

        for (threshold, trigger_after) in self.plan.warning_times() {
            if elapsed >= trigger_after && !running.warnings_issued.contains(&threshold) {
                running.warnings_issued.push(threshold);

                let message = self
                    .plan
                    .warnings
                    .iter()
                    .find(|w| w.seconds_before == threshold)
                    .map(|w| w.message.clone())
                    .unwrap_or_default();

                events.push(CoreEvent::Warning {
                    session_id: running.session_id.clone(),
                    threshold_seconds: threshold,
                    time_remaining: remaining,
                    message,
                });
            }
        }

        let reading = TimerReading {
            elapsed,
            remaining,
            progress: progress_percent(elapsed, self.plan.max_duration),
        };

        Step {
            session: self,
            events,
            reading: Some(reading),
        }
    }
}

/// Advance `session` to `now` given the latest activity signal.
///
/// - Idle + activity starts a new usage session.
/// - A running session counts down whether or not activity is still seen.
/// - When nothing remains the session completes and the timer is idle again;
///   no warning is emitted on that tick.
/// - Otherwise every threshold whose time has come fires exactly once per session.
pub fn advance(
    session: Session,
    now_mono: MonotonicInstant,
    now: DateTime<Local>,
    signal: &ActivitySignal,
) -> Step {
    session.advance(now_mono, now, signal)
}

/// Integer percentage of `max` covered by `elapsed`, truncated, capped at 100
pub fn progress_percent(elapsed: Duration, max: Duration) -> u8 {
    if max.is_zero() {
        return 100;
    }
    let percent = elapsed.as_nanos() * 100 / max.as_nanos();
    percent.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_plan(max_secs: u64) -> TimerPlan {
        TimerPlan {
            max_duration: Duration::from_secs(max_secs),
            warnings: vec![WarningThreshold::new(300, "5 minutes remaining!")],
            completion_message: "Time's up! 60 minutes completed.".into(),
        }
    }

    fn at(t0: MonotonicInstant, secs: u64) -> MonotonicInstant {
        t0 + Duration::from_secs(secs)
    }

    fn count_warnings(events: &[CoreEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, CoreEvent::Warning { .. }))
            .count()
    }

    #[test]
    fn test_idle_without_activity() {
        let session = Session::new(make_plan(3600));
        let step = session.advance(MonotonicInstant::now(), Local::now(), &ActivitySignal::idle());

        assert_eq!(step.session.state(), TimerState::Idle);
        assert!(step.events.is_empty());
        assert!(step.reading.is_none());
    }

    #[test]
    fn test_activity_starts_session() {
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600));

        let step = session.advance(t0, Local::now(), &ActivitySignal::active("psql"));

        assert_eq!(step.session.state(), TimerState::Running);
        assert_eq!(step.session.start_time(), Some(t0));
        assert_eq!(step.events.len(), 1);
        assert!(matches!(
            &step.events[0],
            CoreEvent::SessionStarted { program, .. } if program == "psql"
        ));

        let reading = step.reading.unwrap();
        assert_eq!(reading.elapsed, Duration::ZERO);
        assert_eq!(reading.remaining, Duration::from_secs(3600));
        assert_eq!(reading.progress, 0);
    }

    #[test]
    fn test_running_ignores_activity_signal() {
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;

        let step = session.advance(at(t0, 60), Local::now(), &ActivitySignal::idle());
        assert_eq!(step.session.state(), TimerState::Running);
        assert_eq!(step.session.start_time(), Some(t0));
        assert_eq!(step.reading.unwrap().remaining, Duration::from_secs(3540));
    }

    #[test]
    fn test_second_activity_does_not_restart() {
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;
        let id = session.running().unwrap().session_id.clone();

        let step = session.advance(at(t0, 10), Local::now(), &ActivitySignal::active("other"));
        assert!(step.events.is_empty());
        assert_eq!(step.session.running().unwrap().session_id, id);
        assert_eq!(step.session.running().unwrap().program, "psql");
    }

    #[test]
    fn test_progress_values() {
        let t0 = MonotonicInstant::now();
        let mut session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;

        for (secs, expected) in [(35, 0), (36, 1), (1800, 50), (3599, 99)] {
            let step = session.advance(at(t0, secs), Local::now(), &ActivitySignal::idle());
            assert_eq!(step.reading.unwrap().progress, expected, "at {}s", secs);
            session = step.session;
        }
    }

    #[test]
    fn test_progress_stays_below_100_while_running() {
        let max = Duration::from_secs(3600);
        for elapsed in (0..3600).step_by(7) {
            let p = progress_percent(Duration::from_secs(elapsed), max);
            assert!(p < 100, "elapsed {} gave {}", elapsed, p);
            assert_eq!(p as u64, elapsed * 100 / 3600);
        }
    }

    #[test]
    fn test_warning_fires_once_at_threshold() {
        let t0 = MonotonicInstant::now();
        let mut session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;

        // Ticks every 2s up to just before the threshold
        for secs in (2..3300).step_by(2) {
            let step = session.advance(at(t0, secs), Local::now(), &ActivitySignal::active("psql"));
            assert_eq!(count_warnings(&step.events), 0, "early warning at {}s", secs);
            session = step.session;
        }
        assert!(!session.warning_issued(300));

        let step = session.advance(at(t0, 3300), Local::now(), &ActivitySignal::active("psql"));
        assert_eq!(count_warnings(&step.events), 1);
        assert!(matches!(
            &step.events[0],
            CoreEvent::Warning { threshold_seconds: 300, time_remaining, message, .. }
                if *time_remaining == Duration::from_secs(300) && message == "5 minutes remaining!"
        ));
        session = step.session;
        assert!(session.warning_issued(300));

        // Never again for this session
        for secs in (3302..3600).step_by(2) {
            let step = session.advance(at(t0, secs), Local::now(), &ActivitySignal::active("psql"));
            assert_eq!(count_warnings(&step.events), 0);
            session = step.session;
        }
    }

    #[test]
    fn test_completion_resets_state() {
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session
            .advance(at(t0, 3300), Local::now(), &ActivitySignal::idle())
            .session;
        assert!(session.warning_issued(300));

        let step = session.advance(at(t0, 3600), Local::now(), &ActivitySignal::active("psql"));
        assert_eq!(step.events.len(), 1);
        assert!(matches!(
            &step.events[0],
            CoreEvent::SessionCompleted { duration, message, .. }
                if *duration == Duration::from_secs(3600)
                    && message == "Time's up! 60 minutes completed."
        ));
        assert!(step.reading.is_none());
        assert_eq!(step.session.state(), TimerState::Idle);
        assert_eq!(step.session.start_time(), None);
        assert!(!step.session.warning_issued(300));
    }

    #[test]
    fn test_no_warning_on_expiring_tick() {
        // A long outage skips straight past the threshold to expiry
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;

        let step = session.advance(at(t0, 4000), Local::now(), &ActivitySignal::idle());
        assert_eq!(count_warnings(&step.events), 0);
        assert!(matches!(step.events[0], CoreEvent::SessionCompleted { .. }));
    }

    #[test]
    fn test_fresh_session_after_completion() {
        let t0 = MonotonicInstant::now();
        let session = Session::new(make_plan(3600))
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;
        let first_id = session.running().unwrap().session_id.clone();

        let session = session
            .advance(at(t0, 3300), Local::now(), &ActivitySignal::active("psql"))
            .session
            .advance(at(t0, 3600), Local::now(), &ActivitySignal::active("psql"))
            .session;
        assert_eq!(session.state(), TimerState::Idle);

        let step = session.advance(at(t0, 3602), Local::now(), &ActivitySignal::active("psql"));
        let running = step.session.running().unwrap();
        assert_ne!(running.session_id, first_id);
        assert!(running.warnings_issued.is_empty());
        assert_eq!(step.session.start_time(), Some(at(t0, 3602)));

        // The fresh session warns again at its own threshold
        let step = step
            .session
            .advance(at(t0, 3602 + 3300), Local::now(), &ActivitySignal::idle());
        assert_eq!(count_warnings(&step.events), 1);
    }

    #[test]
    fn test_multiple_thresholds() {
        let plan = TimerPlan {
            max_duration: Duration::from_secs(600),
            warnings: vec![
                WarningThreshold::new(300, "5 minutes remaining!"),
                WarningThreshold::new(60, "1 minute remaining!"),
            ],
            completion_message: "done".into(),
        };
        let t0 = MonotonicInstant::now();
        let session = Session::new(plan)
            .advance(t0, Local::now(), &ActivitySignal::active("psql"))
            .session;

        // Both thresholds passed during an outage fire together
        let step = session.advance(at(t0, 550), Local::now(), &ActivitySignal::idle());
        assert_eq!(count_warnings(&step.events), 2);
        assert!(step.session.warning_issued(300));
        assert!(step.session.warning_issued(60));
    }

    #[test]
    fn test_warning_times() {
        let plan = make_plan(3600);
        assert_eq!(plan.warning_times(), vec![(300, Duration::from_secs(3300))]);

        // Threshold longer than the session is never scheduled
        let short = make_plan(120);
        assert!(short.warning_times().is_empty());
    }

    #[test]
    fn test_free_function_matches_method() {
        let t0 = MonotonicInstant::now();
        let now = Local::now();
        let signal = ActivitySignal::active("psql");

        let step = advance(Session::new(make_plan(3600)), t0, now, &signal);
        assert_eq!(step.session.state(), TimerState::Running);
        assert_eq!(step.session.time_remaining(at(t0, 100)), Some(Duration::from_secs(3500)));
    }
}
