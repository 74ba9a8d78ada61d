//! Time utilities for dbwatch
//!
//! Countdown enforcement runs on monotonic time so that wall-clock changes
//! never shorten or extend a usage session. Wall-clock time is kept only
//! for display and logging.

use chrono::{DateTime, Local};
use std::ops::Add;
use std::time::{Duration, Instant};

/// Current wall-clock time, for session start stamps
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// A point on the monotonic clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonotonicInstant(Instant);

impl MonotonicInstant {
    pub fn now() -> Self {
        MonotonicInstant(Instant::now())
    }

    /// Time from `earlier` to `self`; zero when `earlier` is in the future
    pub fn duration_since(&self, earlier: MonotonicInstant) -> Duration {
        self.0.saturating_duration_since(earlier.0)
    }
}

impl Add<Duration> for MonotonicInstant {
    type Output = Self;

    fn add(self, offset: Duration) -> Self {
        MonotonicInstant(self.0 + offset)
    }
}

/// Whole hours, minutes and seconds in `d`
fn split_hms(d: Duration) -> (u64, u64, u64) {
    let secs = d.as_secs();
    (secs / 3600, secs / 60 % 60, secs % 60)
}

/// `H:MM:SS` with unpadded hours (`0:59:58`, `1:00:00`). Fractions are dropped.
pub fn format_hms(d: Duration) -> String {
    let (h, m, s) = split_hms(d);
    format!("{}:{:02}:{:02}", h, m, s)
}

/// Compact form for logs: `45s`, `5m 0s`, `1h 0m 0s`
pub fn format_duration(d: Duration) -> String {
    match split_hms(d) {
        (0, 0, s) => format!("{}s", s),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, m, s) => format!("{}h {}m {}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(Duration::ZERO), "0:00:00");
        assert_eq!(format_hms(Duration::from_secs(59)), "0:00:59");
        assert_eq!(format_hms(Duration::from_secs(300)), "0:05:00");
        assert_eq!(format_hms(Duration::from_secs(3598)), "0:59:58");
        assert_eq!(format_hms(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(format_hms(Duration::from_secs(36_061)), "10:01:01");
    }

    #[test]
    fn hms_drops_fraction() {
        assert_eq!(format_hms(Duration::from_millis(299_999)), "0:04:59");
    }

    #[test]
    fn compact_formatting() {
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(300)), "5m 0s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 0m 0s");
    }

    #[test]
    fn monotonic_offsets() {
        let start = MonotonicInstant::now();
        let later = start + Duration::from_secs(3300);

        assert!(later > start);
        assert_eq!(later.duration_since(start), Duration::from_secs(3300));
        assert_eq!(start.duration_since(later), Duration::ZERO);
    }
}
