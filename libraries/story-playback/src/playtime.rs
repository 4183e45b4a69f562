//! Playtime accounting
//!
//! Measures how long a story was actually playing between a play start and
//! the next stop (pause, end, switch, navigation, unload). Timestamps come
//! from the host as offsets from an arbitrary epoch, so the tracker itself
//! never reads a clock.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One finished listening span, as sent to the collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaytimeReport {
    pub theme: String,
    pub title: String,

    /// Whole seconds, always >= 1
    pub duration: u64,
}

/// Shortest span worth reporting
pub const MIN_REPORTED_SECONDS: u64 = 1;

/// Play-start bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaytimeTracker {
    started_at: Option<Duration>,
}

impl PlaytimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark playback start; an existing start is kept
    ///
    /// Returns true if the clock was started by this call.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Forget the start without reporting
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// Close the current span
    ///
    /// Produces a report when a start exists, the story is known and at
    /// least one whole second elapsed. The start is cleared either way, so a
    /// second flush right after is a no-op.
    pub fn flush(
        &mut self,
        now: Duration,
        theme: Option<&str>,
        title: Option<&str>,
    ) -> Option<PlaytimeReport> {
        let started_at = self.started_at.take()?;
        let (theme, title) = (theme?, title?);

        let seconds = now.saturating_sub(started_at).as_secs();
        if seconds < MIN_REPORTED_SECONDS {
            return None;
        }

        Some(PlaytimeReport {
            theme: theme.to_string(),
            title: title.to_string(),
            duration: seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn flush_reports_whole_seconds() {
        let mut tracker = PlaytimeTracker::new();
        tracker.start(ms(1_000));

        let report = tracker.flush(ms(4_900), Some("Piraten"), Some("A")).unwrap();
        assert_eq!(report.duration, 3);
        assert_eq!(report.theme, "Piraten");
        assert_eq!(report.title, "A");
        assert!(!tracker.is_running());
    }

    #[test]
    fn under_one_second_not_reported() {
        let mut tracker = PlaytimeTracker::new();
        tracker.start(ms(0));
        assert_eq!(tracker.flush(ms(999), Some("Piraten"), Some("A")), None);
        assert!(!tracker.is_running());
    }

    #[test]
    fn double_flush_reports_once() {
        let mut tracker = PlaytimeTracker::new();
        tracker.start(ms(0));
        assert!(tracker.flush(ms(5_000), Some("T"), Some("S")).is_some());
        assert!(tracker.flush(ms(9_000), Some("T"), Some("S")).is_none());
    }

    #[test]
    fn start_is_not_overwritten() {
        let mut tracker = PlaytimeTracker::new();
        assert!(tracker.start(ms(100)));
        assert!(!tracker.start(ms(5_000)));
        assert_eq!(tracker.started_at(), Some(ms(100)));
    }

    #[test]
    fn clock_going_backwards_is_not_negative() {
        let mut tracker = PlaytimeTracker::new();
        tracker.start(ms(10_000));
        assert_eq!(tracker.flush(ms(2_000), Some("T"), Some("S")), None);
    }

    #[test]
    fn unknown_story_clears_start() {
        let mut tracker = PlaytimeTracker::new();
        tracker.start(ms(0));
        assert_eq!(tracker.flush(ms(10_000), Some("T"), None), None);
        assert!(!tracker.is_running());
    }

    #[test]
    fn report_wire_shape() {
        let report = PlaytimeReport {
            theme: "Drachen".into(),
            title: "C".into(),
            duration: 12,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"theme": "Drachen", "title": "C", "duration": 12}));
    }
}
