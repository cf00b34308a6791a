//! One-pass statistics over a track log.

use std::fmt;

use chrono::NaiveTime;

use super::source::TrackSource;

/// Minimum number of usable points the simulator needs to start.
pub const MIN_SIMULATION_POINTS: usize = 3;

/// What a full pass of the extraction protocol finds in a log.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    /// Usable points, after duplicates and invalid coordinates are dropped.
    pub point_count: usize,
    /// Consecutive duplicate points dropped.
    pub duplicates_skipped: usize,
    /// Points dropped for unusable coordinates.
    pub invalid_skipped: usize,
    /// Time of the first usable point.
    pub first_time: Option<NaiveTime>,
    /// Time of the last usable point.
    pub last_time: Option<NaiveTime>,
    /// Midnights crossed between the first and last usable point.
    pub days_crossed: u32,
    /// Lowest and highest elevation seen, in meters.
    pub elevation_range: Option<(f64, f64)>,
}

impl TrackSummary {
    /// Whether the simulator can start on this log.
    pub fn is_simulatable(&self) -> bool {
        self.point_count >= MIN_SIMULATION_POINTS
    }

    /// Span between the first and last timestamps, if both exist.
    pub fn duration(&self) -> Option<chrono::TimeDelta> {
        let days = chrono::TimeDelta::days(i64::from(self.days_crossed));
        Some(self.last_time? - self.first_time? + days)
    }
}

impl fmt::Display for TrackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Points:      {}", self.point_count)?;
        writeln!(f, "Duplicates:  {}", self.duplicates_skipped)?;
        writeln!(f, "Invalid:     {}", self.invalid_skipped)?;
        if let (Some(first), Some(last)) = (self.first_time, self.last_time) {
            writeln!(f, "Time range:  {} - {}", first, last)?;
        }
        if let Some((min, max)) = self.elevation_range {
            writeln!(f, "Elevation:   {:.1}m - {:.1}m", min, max)?;
        }
        write!(
            f,
            "Simulatable: {}",
            if self.is_simulatable() { "yes" } else { "no" }
        )
    }
}

/// Run the extraction protocol over the whole log.
pub fn summarize(source: &TrackSource) -> TrackSummary {
    let mut cursor = source.cursor();
    let mut summary = TrackSummary {
        point_count: 0,
        duplicates_skipped: 0,
        invalid_skipped: 0,
        first_time: None,
        last_time: None,
        days_crossed: 0,
        elevation_range: None,
    };

    while let Some(point) = cursor.next_point() {
        summary.point_count += 1;
        summary.first_time.get_or_insert(point.time);
        summary.last_time = Some(point.time);
        summary.days_crossed = point.day;

        if let Some(elevation) = point.elevation {
            summary.elevation_range = Some(match summary.elevation_range {
                Some((min, max)) => (min.min(elevation), max.max(elevation)),
                None => (elevation, elevation),
            });
        }
    }

    summary.duplicates_skipped = cursor.skipped_duplicates();
    summary.invalid_skipped = cursor.skipped_invalid();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r#"<gpx><trk><trkseg>
        <trkpt lat="1" lon="1"><ele>100</ele><time>2017-05-01T12:00:00Z</time></trkpt>
        <trkpt lat="1" lon="1"><ele>999</ele><time>2017-05-01T12:00:05Z</time></trkpt>
        <trkpt lat="2" lon="2"><ele>80</ele><time>2017-05-01T12:00:10Z</time></trkpt>
        <trkpt lat="3" lon="3"><ele>120.5</ele><time>2017-05-01T12:01:00Z</time></trkpt>
    </trkseg></trk></gpx>"#;

    #[test]
    fn test_summarize_counts_and_times() {
        let source = TrackSource::from_bytes("track.gpx", LOG);
        let summary = summarize(&source);

        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.duplicates_skipped, 1);
        assert_eq!(summary.invalid_skipped, 0);
        assert_eq!(summary.first_time, NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(summary.last_time, NaiveTime::from_hms_opt(12, 1, 0));
        assert_eq!(summary.duration(), Some(chrono::TimeDelta::seconds(60)));
        assert!(summary.is_simulatable());
    }

    #[test]
    fn test_summarize_elevation_ignores_skipped_points() {
        let source = TrackSource::from_bytes("track.gpx", LOG);
        let summary = summarize(&source);

        assert_eq!(summary.elevation_range, Some((80.0, 120.5)));
    }

    #[test]
    fn test_duration_across_midnight() {
        let source = TrackSource::from_bytes(
            "night.gpx",
            r#"<gpx>
                <trkpt lat="1" lon="1"><time>2017-05-01T23:59:00Z</time></trkpt>
                <trkpt lat="2" lon="2"><time>2017-05-02T00:01:00Z</time></trkpt>
            </gpx>"#,
        );
        let summary = summarize(&source);

        assert_eq!(summary.days_crossed, 1);
        assert_eq!(summary.duration(), Some(chrono::TimeDelta::seconds(120)));
    }

    #[test]
    fn test_summarize_short_log() {
        let source = TrackSource::from_bytes(
            "short.gpx",
            r#"<gpx><trkpt lat="1" lon="1"/><trkpt lat="2" lon="2"/></gpx>"#,
        );
        let summary = summarize(&source);

        assert_eq!(summary.point_count, 2);
        assert!(!summary.is_simulatable());
        assert!(summary.to_string().contains("Simulatable: no"));
    }
}
