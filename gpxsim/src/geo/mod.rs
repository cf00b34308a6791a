//! Geographic primitives and heading math.
//!
//! Points are WGS84 longitude/latitude in decimal degrees. Headings are
//! computed in the planar lon/lat space (flat-earth), which is accurate enough
//! for the short segments between consecutive GPS fixes.

use serde::Serialize;

/// Reference segment for all headings: a south-to-north line along the
/// prime meridian.
pub const NORTH_REFERENCE: LineSegment = LineSegment {
    start: GeoPoint {
        longitude: 0.0,
        latitude: -180.0,
    },
    end: GeoPoint {
        longitude: 0.0,
        latitude: 180.0,
    },
};

/// A geographic position (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.longitude, self.latitude)
    }
}

/// Straight line between two points, direction from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl LineSegment {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    /// Direction of the segment, clockwise from the +latitude axis.
    ///
    /// Returns degrees in [0, 360). A zero-length segment points north.
    pub fn direction(&self) -> f64 {
        let dlat = self.end.latitude - self.start.latitude;
        let dlon = self.end.longitude - self.start.longitude;

        // atan2(dlon, dlat) gives bearing from north
        normalize_degrees(dlon.atan2(dlat).to_degrees())
    }

    /// Clockwise angle from `reference` to this segment, in [0, 360).
    pub fn angle_to(&self, reference: &LineSegment) -> f64 {
        normalize_degrees(self.direction() - reference.direction())
    }

    /// Heading of the segment relative to true north.
    pub fn heading(&self) -> f64 {
        self.angle_to(&NORTH_REFERENCE)
    }
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> LineSegment {
        LineSegment::new(GeoPoint::new(lon1, lat1), GeoPoint::new(lon2, lat2))
    }

    #[test]
    fn test_heading_cardinal_directions() {
        // North
        assert!((segment(0.0, 0.0, 0.0, 1.0).heading() - 0.0).abs() < 1e-9);
        // East
        assert!((segment(0.0, 0.0, 1.0, 0.0).heading() - 90.0).abs() < 1e-9);
        // South
        assert!((segment(0.0, 0.0, 0.0, -1.0).heading() - 180.0).abs() < 1e-9);
        // West
        assert!((segment(0.0, 0.0, -1.0, 0.0).heading() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_heading_southwest() {
        let heading = segment(10.0, 53.0, 9.9, 52.9).heading();
        assert!((heading - 225.0).abs() < 1e-6, "Expected 225°, got {}°", heading);
    }

    #[test]
    fn test_angle_to_east_reference() {
        let east = segment(-180.0, 0.0, 180.0, 0.0);
        let north = segment(0.0, 0.0, 0.0, 1.0);

        // North is 270° clockwise from east
        assert!((north.angle_to(&east) - 270.0).abs() < 1e-9);
        assert!((east.angle_to(&north) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_segment_points_north() {
        let p = GeoPoint::new(10.0, 53.0);
        assert_eq!(LineSegment::new(p, p).heading(), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-15) < 360.0);
    }

    #[test]
    fn test_point_equality_is_exact() {
        assert_eq!(GeoPoint::new(1.5, 2.5), GeoPoint::new(1.5, 2.5));
        assert_ne!(GeoPoint::new(1.5, 2.5), GeoPoint::new(1.5, 2.500001));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_heading_in_range(
                lon1 in -180.0..180.0_f64,
                lat1 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
            ) {
                let heading = segment(lon1, lat1, lon2, lat2).heading();
                prop_assert!(
                    (0.0..360.0).contains(&heading),
                    "Heading {} out of range", heading
                );
            }

            #[test]
            fn test_reversed_segment_is_opposite(
                lon1 in -180.0..180.0_f64,
                lat1 in -90.0..90.0_f64,
                dlon in 0.001..1.0_f64,
                dlat in 0.001..1.0_f64,
            ) {
                let forward = segment(lon1, lat1, lon1 + dlon, lat1 + dlat).heading();
                let backward = segment(lon1 + dlon, lat1 + dlat, lon1, lat1).heading();
                let diff = normalize_degrees(backward - forward);
                prop_assert!((diff - 180.0).abs() < 1e-6, "diff was {}", diff);
            }
        }
    }
}
