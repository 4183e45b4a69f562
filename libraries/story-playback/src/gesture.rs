//! Swipe gesture classification
//!
//! Touch, mouse-drag and pointer input all feed the same classifier. A
//! gesture counts as a swipe only when it is wide enough, flat enough and
//! quick enough; everything else (scrolling, slow drags, taps) is dropped.

use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Screen coordinates of a pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// What the pointer landed on when the gesture began
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    /// Slide surface, eligible for swiping
    Surface,

    /// Play/next buttons or navigation indicators
    Control,
}

/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Arrow keys map straight to a direction, no thresholds
    pub fn direction(self) -> Direction {
        match self {
            Key::ArrowLeft => Direction::Previous,
            Key::ArrowRight => Direction::Next,
        }
    }
}

/// Swipe thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// Minimum horizontal travel (50-80 units, default: 80)
    pub min_horizontal: f32,

    /// Maximum vertical travel (default: 100)
    pub max_vertical: f32,

    /// Maximum gesture duration (default: 500ms)
    pub max_duration: Duration,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            min_horizontal: 80.0,
            max_vertical: 100.0,
            max_duration: Duration::from_millis(500),
        }
    }
}

/// Why a gesture was not a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeRejection {
    TooShort,
    TooSteep,
    TooSlow,
}

/// Classify a finished gesture from its displacement and duration
///
/// Moving left (negative dx) advances, moving right goes back.
pub fn classify(
    dx: f32,
    dy: f32,
    elapsed: Duration,
    thresholds: &GestureThresholds,
) -> Result<Direction, SwipeRejection> {
    if dx.abs() <= thresholds.min_horizontal {
        return Err(SwipeRejection::TooShort);
    }
    if dy.abs() >= thresholds.max_vertical {
        return Err(SwipeRejection::TooSteep);
    }
    if elapsed >= thresholds.max_duration {
        return Err(SwipeRejection::TooSlow);
    }

    if dx < 0.0 {
        Ok(Direction::Next)
    } else {
        Ok(Direction::Previous)
    }
}

/// Start of an in-progress gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureStart {
    pub origin: Point,
    pub at: Duration,
    pub dragging: bool,
}

/// Tracks one gesture at a time
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    thresholds: GestureThresholds,
    current: Option<GestureStart>,
}

impl GestureTracker {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            current: None,
        }
    }

    /// Record a gesture start, unless it began on an interactive control
    ///
    /// Returns true when the gesture is being tracked.
    pub fn begin(&mut self, origin: Point, at: Duration, target: HitTarget) -> bool {
        if target == HitTarget::Control {
            self.current = None;
            return false;
        }
        self.current = Some(GestureStart {
            origin,
            at,
            dragging: false,
        });
        true
    }

    /// Pointer moved while pressed
    pub fn drag(&mut self, _point: Point) {
        if let Some(start) = self.current.as_mut() {
            start.dragging = true;
        }
    }

    /// Finish the gesture and classify it
    pub fn end(&mut self, point: Point, at: Duration) -> Option<Direction> {
        let start = self.current.take()?;
        let dx = point.x - start.origin.x;
        let dy = point.y - start.origin.y;
        let elapsed = at.saturating_sub(start.at);

        match classify(dx, dy, elapsed, &self.thresholds) {
            Ok(direction) => Some(direction),
            Err(reason) => {
                trace!(?reason, dx, dy, elapsed_ms = elapsed.as_millis() as u64, "Gesture ignored");
                None
            }
        }
    }

    /// Abandon the current gesture (pointer left, touch cancelled)
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Current gesture state
    pub fn current(&self) -> Option<&GestureStart> {
        self.current.as_ref()
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn short_swipe_ignored() {
        let result = classify(-40.0, 0.0, ms(100), &GestureThresholds::default());
        assert_eq!(result, Err(SwipeRejection::TooShort));
    }

    #[test]
    fn quick_flat_swipe_left_is_next() {
        let result = classify(-90.0, 10.0, ms(200), &GestureThresholds::default());
        assert_eq!(result, Ok(Direction::Next));
    }

    #[test]
    fn swipe_right_is_previous() {
        let result = classify(90.0, -10.0, ms(200), &GestureThresholds::default());
        assert_eq!(result, Ok(Direction::Previous));
    }

    #[test]
    fn vertical_scroll_rejected() {
        let result = classify(120.0, 150.0, ms(200), &GestureThresholds::default());
        assert_eq!(result, Err(SwipeRejection::TooSteep));
    }

    #[test]
    fn slow_drag_rejected() {
        let result = classify(200.0, 0.0, ms(800), &GestureThresholds::default());
        assert_eq!(result, Err(SwipeRejection::TooSlow));
    }

    #[test]
    fn looser_threshold_accepts_sixty() {
        let loose = GestureThresholds {
            min_horizontal: 50.0,
            ..GestureThresholds::default()
        };
        assert_eq!(classify(-60.0, 0.0, ms(100), &loose), Ok(Direction::Next));
        assert!(classify(-60.0, 0.0, ms(100), &GestureThresholds::default()).is_err());
    }

    #[test]
    fn tracker_ignores_controls() {
        let mut tracker = GestureTracker::default();
        assert!(!tracker.begin(Point::new(100.0, 100.0), ms(0), HitTarget::Control));
        assert_eq!(tracker.end(Point::new(0.0, 100.0), ms(100)), None);
    }

    #[test]
    fn tracker_full_gesture() {
        let mut tracker = GestureTracker::default();
        assert!(tracker.begin(Point::new(200.0, 50.0), ms(1000), HitTarget::Surface));
        tracker.drag(Point::new(150.0, 52.0));
        assert!(tracker.current().unwrap().dragging);

        let direction = tracker.end(Point::new(110.0, 60.0), ms(1200));
        assert_eq!(direction, Some(Direction::Next));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn end_without_begin_is_none() {
        let mut tracker = GestureTracker::default();
        assert_eq!(tracker.end(Point::new(0.0, 0.0), ms(10)), None);
    }

    #[test]
    fn cancel_discards() {
        let mut tracker = GestureTracker::default();
        tracker.begin(Point::new(200.0, 0.0), ms(0), HitTarget::Surface);
        tracker.cancel();
        assert_eq!(tracker.end(Point::new(0.0, 0.0), ms(100)), None);
    }

    #[test]
    fn arrow_keys() {
        assert_eq!(Key::ArrowLeft.direction(), Direction::Previous);
        assert_eq!(Key::ArrowRight.direction(), Direction::Next);
    }
}
