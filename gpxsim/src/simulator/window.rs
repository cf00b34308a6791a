//! Two-segment sliding window over consecutive track points.
//!
//! The window holds three points: the segment being played back and the one
//! after it. Each time simulated time passes the end of the current segment,
//! the window drops its oldest point and reads one more from the cursor.

use serde::Serialize;

use super::error::{SimulatorError, SimulatorResult};
use crate::geo::{GeoPoint, LineSegment};
use crate::track::{TrackCursor, MIN_SIMULATION_POINTS};

/// Normalized time where the entering transition ends.
const ENTERING_END: f64 = 0.1;

/// Normalized time where the exiting transition begins.
const EXITING_START: f64 = 0.9;

/// Where in the current segment the simulated time falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPhase {
    /// First 10% of the segment.
    Entering,
    /// Between the transition regions.
    Cruising,
    /// Last 10% of the segment.
    Exiting,
}

impl SegmentPhase {
    pub fn from_normalized(normalized_time: f64) -> Self {
        if normalized_time < ENTERING_END {
            SegmentPhase::Entering
        } else if normalized_time > EXITING_START {
            SegmentPhase::Exiting
        } else {
            SegmentPhase::Cruising
        }
    }
}

/// Sliding interpolation window.
///
/// Times are milliseconds since midnight of the log's first day. `current.end == next.start` always
/// holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationWindow {
    current: LineSegment,
    next: LineSegment,
    segment_start: i64,
    segment_end: i64,
    next_segment_end: i64,
    start_heading_delta: f64,
    end_heading_delta: f64,
}

impl InterpolationWindow {
    /// Build a window from the next three points of `cursor`.
    ///
    /// Fails with [`SimulatorError::InsufficientData`] when the log runs out
    /// first.
    pub fn initialize(cursor: &mut TrackCursor) -> SimulatorResult<Self> {
        let mut points = Vec::with_capacity(MIN_SIMULATION_POINTS);
        while points.len() < MIN_SIMULATION_POINTS {
            match cursor.next_point() {
                Some(point) => points.push(point),
                None => {
                    return Err(SimulatorError::InsufficientData {
                        found: points.len(),
                    })
                }
            }
        }

        let (p1, p2, p3) = (points[0], points[1], points[2]);
        let current = LineSegment::new(p1.position, p2.position);

        Ok(Self {
            current,
            next: LineSegment::new(p2.position, p3.position),
            segment_start: p1.millis(),
            segment_end: p2.millis(),
            next_segment_end: p3.millis(),
            start_heading_delta: 0.0,
            end_heading_delta: current.heading(),
        })
    }

    /// Slide forward by one point.
    ///
    /// Returns `false` at the end of the log, leaving the window unchanged.
    pub fn advance(&mut self, cursor: &mut TrackCursor) -> bool {
        let Some(point) = cursor.next_point() else {
            return false;
        };

        self.segment_start = self.segment_end;
        self.segment_end = self.next_segment_end;
        self.next_segment_end = point.millis();

        self.current = self.next;
        self.next = LineSegment::new(self.current.end, point.position);

        self.start_heading_delta = self.end_heading_delta;
        self.end_heading_delta = self.current.heading();

        true
    }

    /// Fraction of the current segment elapsed at `time_millis`.
    ///
    /// A segment with no positive duration counts as fully elapsed.
    pub fn normalized_time(&self, time_millis: i64) -> f64 {
        let span = self.segment_end - self.segment_start;
        if span <= 0 {
            return 1.0;
        }
        (time_millis - self.segment_start) as f64 / span as f64
    }

    /// Reported position for a normalized time.
    ///
    /// This is a step between the segment endpoints, not a blend along the
    /// segment: the start point up to the midpoint, the end point after it.
    pub fn position_at(&self, normalized_time: f64) -> GeoPoint {
        if normalized_time <= 0.5 {
            self.current.start
        } else {
            self.current.end
        }
    }

    /// Reported heading for a normalized time.
    ///
    /// Transition phases are identified but the bearing is not blended yet;
    /// every phase reports the current segment's heading.
    pub fn heading_at(&self, normalized_time: f64) -> f64 {
        match SegmentPhase::from_normalized(normalized_time) {
            SegmentPhase::Entering | SegmentPhase::Cruising | SegmentPhase::Exiting => {
                self.current.heading()
            }
        }
    }

    pub fn current_segment(&self) -> LineSegment {
        self.current
    }

    pub fn next_segment(&self) -> LineSegment {
        self.next
    }

    pub fn segment_start(&self) -> i64 {
        self.segment_start
    }

    pub fn segment_end(&self) -> i64 {
        self.segment_end
    }

    pub fn next_segment_end(&self) -> i64 {
        self.next_segment_end
    }

    /// Heading of the segment before the current one (0 for the first).
    pub fn start_heading_delta(&self) -> f64 {
        self.start_heading_delta
    }

    /// Heading of the current segment.
    pub fn end_heading_delta(&self) -> f64 {
        self.end_heading_delta
    }
}
