//! Position update event.

use chrono::NaiveTime;
use serde::Serialize;

use super::window::SegmentPhase;
use crate::geo::GeoPoint;
use crate::track::time_from_millis;

/// One simulated GPS fix, emitted per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionUpdate {
    /// Reported position (WGS84).
    pub position: GeoPoint,
    /// Heading in degrees clockwise from north, in [0, 360).
    pub heading: f64,
    /// Simulated time, milliseconds since midnight of the first track point.
    pub sim_time_ms: i64,
    /// Fraction of the current segment elapsed.
    pub normalized_time: f64,
    /// Phase of the current segment.
    pub phase: SegmentPhase,
}

impl PositionUpdate {
    /// Simulated time as a time of day.
    pub fn sim_time(&self) -> NaiveTime {
        time_from_millis(self.sim_time_ms)
    }
}

impl std::fmt::Display for PositionUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lon={:.6} lat={:.6} hdg={:.1}",
            self.sim_time(),
            self.position.longitude,
            self.position.latitude,
            self.heading
        )
    }
}
