//! Track point type.

use chrono::NaiveTime;

use super::time::{millis_of_day, MILLIS_PER_DAY};
use crate::geo::GeoPoint;

/// A single fix read from a track log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Position of the fix.
    pub position: GeoPoint,
    /// Time of day the fix was recorded.
    pub time: NaiveTime,
    /// Elevation in meters, if the log has one. Not used by the simulation.
    pub elevation: Option<f64>,
    /// Midnights passed since the first point of the log.
    pub day: u32,
}

impl TrackPoint {
    pub fn new(position: GeoPoint, time: NaiveTime) -> Self {
        Self {
            position,
            time,
            elevation: None,
            day: 0,
        }
    }

    /// Time of the fix as milliseconds since midnight of the log's first day.
    pub fn millis(&self) -> i64 {
        i64::from(self.day) * MILLIS_PER_DAY + millis_of_day(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_counts_days() {
        let time = NaiveTime::from_hms_opt(0, 0, 10).unwrap();
        let mut point = TrackPoint::new(GeoPoint::new(0.0, 0.0), time);
        assert_eq!(point.millis(), 10_000);

        point.day = 1;
        assert_eq!(point.millis(), MILLIS_PER_DAY + 10_000);
    }
}
