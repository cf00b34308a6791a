//! Streaming extraction of track points from a buffered GPX log.
//!
//! The cursor walks the XML event stream and stops at each `trkpt` element.
//! It never materializes the whole document, so a pass over the log costs
//! only as much as the points actually consumed.
//!
//! Extraction rules:
//!
//! - Points whose `lat`/`lon` attributes do not parse are skipped.
//! - A point identical to the one returned just before it is skipped.
//! - `<time>` keeps only the `HH:MM:SS` part; a missing or malformed value
//!   reads as midnight.
//! - A time more than half a day earlier than the previous point's counts as
//!   the next day, so point times keep increasing across midnight.
//! - `<ele>` is read into [`TrackPoint::elevation`] when present.
//! - An XML error ends the log at the last complete point.

use std::io::Cursor;

use bytes::Bytes;
use chrono::NaiveTime;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use super::point::TrackPoint;
use super::time::{millis_of_day, parse_time_of_day, MILLIS_PER_DAY};
use crate::geo::GeoPoint;

const POINT_ELEMENT: &str = "trkpt";
const TIME_ELEMENT: &str = "time";
const ELEVATION_ELEMENT: &str = "ele";

/// Backward step in time of day that counts as crossing midnight.
const MIDNIGHT_ROLLOVER: i64 = MILLIS_PER_DAY / 2;

/// Child values collected from one `trkpt` element.
#[derive(Debug, Default)]
struct PointBody {
    time: Option<NaiveTime>,
    elevation: Option<f64>,
}

/// Pull-based reader of track points over an in-memory GPX buffer.
pub struct TrackCursor {
    data: Bytes,
    reader: EventReader<Cursor<Bytes>>,
    /// Attributes of a `trkpt` start tag consumed while reading the previous
    /// point's children.
    pending: Option<Vec<OwnedAttribute>>,
    last_position: Option<GeoPoint>,
    /// Time of day of the previously returned point.
    last_time_millis: Option<i64>,
    day: u32,
    finished: bool,
    skipped_duplicates: usize,
    skipped_invalid: usize,
}

impl TrackCursor {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: Bytes) -> Self {
        Self {
            reader: create_reader(data.clone()),
            data,
            pending: None,
            last_position: None,
            last_time_millis: None,
            day: 0,
            finished: false,
            skipped_duplicates: 0,
            skipped_invalid: 0,
        }
    }

    /// Move back to the first byte of the buffer.
    ///
    /// The duplicate filter and day count are reset as well, so the first
    /// point of the log is always returned again, on day 0.
    pub fn rewind(&mut self) {
        self.reader = create_reader(self.data.clone());
        self.pending = None;
        self.last_position = None;
        self.last_time_millis = None;
        self.day = 0;
        self.finished = false;
    }

    /// Whether the end of the log (or a parse error) has been reached.
    pub fn is_finished(&self) -> bool {
        self.finished && self.pending.is_none()
    }

    /// Duplicate points dropped since the cursor was created.
    pub fn skipped_duplicates(&self) -> usize {
        self.skipped_duplicates
    }

    /// Points with unusable coordinates dropped since the cursor was created.
    pub fn skipped_invalid(&self) -> usize {
        self.skipped_invalid
    }

    /// Read the next usable point, or `None` at the end of the log.
    pub fn next_point(&mut self) -> Option<TrackPoint> {
        loop {
            let attributes = self.next_point_element()?;

            let Some(position) = parse_position(&attributes) else {
                self.skipped_invalid += 1;
                tracing::debug!("Skipping track point with unparseable coordinates");
                continue;
            };

            if self.last_position == Some(position) {
                self.skipped_duplicates += 1;
                tracing::trace!(%position, "Skipping duplicate track point");
                continue;
            }

            let body = self.read_point_body();
            self.last_position = Some(position);

            let time = body.time.unwrap_or_default();
            return Some(TrackPoint {
                position,
                time,
                elevation: body.elevation,
                day: self.day_of(time),
            });
        }
    }

    /// Day number for a point recorded at `time`, counting midnight rollovers.
    fn day_of(&mut self, time: NaiveTime) -> u32 {
        let millis = millis_of_day(time);
        if let Some(previous) = self.last_time_millis {
            if previous - millis > MIDNIGHT_ROLLOVER {
                self.day += 1;
                tracing::debug!(day = self.day, "Track log crossed midnight");
            }
        }
        self.last_time_millis = Some(millis);
        self.day
    }

    /// Advance to the next `trkpt` start tag and return its attributes.
    fn next_point_element(&mut self) -> Option<Vec<OwnedAttribute>> {
        if let Some(attributes) = self.pending.take() {
            return Some(attributes);
        }

        while let Some(event) = self.next_event() {
            if let XmlEvent::StartElement {
                name, attributes, ..
            } = event
            {
                if is_element(&name.local_name, POINT_ELEMENT) {
                    return Some(attributes);
                }
            }
        }

        None
    }

    /// Read the children of the current `trkpt` up to its end tag.
    fn read_point_body(&mut self) -> PointBody {
        let mut body = PointBody::default();

        while let Some(event) = self.next_event() {
            match event {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    let local = name.local_name.as_str();
                    if is_element(local, POINT_ELEMENT) {
                        // Unterminated point; hand the new one to the next read
                        self.pending = Some(attributes);
                        break;
                    } else if is_element(local, TIME_ELEMENT) {
                        body.time = Some(parse_time_of_day(&self.read_text()));
                    } else if is_element(local, ELEVATION_ELEMENT) {
                        body.elevation = self.read_text().trim().parse().ok();
                    }
                }
                XmlEvent::EndElement { name } if is_element(&name.local_name, POINT_ELEMENT) => {
                    break;
                }
                _ => {}
            }
        }

        body
    }

    /// Collect the text of the element just opened, consuming its end tag.
    fn read_text(&mut self) -> String {
        let mut text = String::new();
        let mut depth = 0usize;

        while let Some(event) = self.next_event() {
            match event {
                XmlEvent::Characters(chunk) | XmlEvent::CData(chunk) if depth == 0 => {
                    text.push_str(&chunk);
                }
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        text
    }

    fn next_event(&mut self) -> Option<XmlEvent> {
        if self.finished {
            return None;
        }

        match self.reader.next() {
            Ok(XmlEvent::EndDocument) => {
                self.finished = true;
                None
            }
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, "Track log parse error, treating as end of log");
                self.finished = true;
                None
            }
        }
    }
}

impl Iterator for TrackCursor {
    type Item = TrackPoint;

    fn next(&mut self) -> Option<TrackPoint> {
        self.next_point()
    }
}

impl std::fmt::Debug for TrackCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackCursor")
            .field("bytes", &self.data.len())
            .field("last_position", &self.last_position)
            .field("day", &self.day)
            .field("finished", &self.finished)
            .field("skipped_duplicates", &self.skipped_duplicates)
            .field("skipped_invalid", &self.skipped_invalid)
            .finish()
    }
}

fn create_reader(data: Bytes) -> EventReader<Cursor<Bytes>> {
    ParserConfig::new()
        .trim_whitespace(true)
        .cdata_to_characters(true)
        .create_reader(Cursor::new(data))
}

fn is_element(local_name: &str, expected: &str) -> bool {
    local_name.eq_ignore_ascii_case(expected)
}

fn parse_position(attributes: &[OwnedAttribute]) -> Option<GeoPoint> {
    let mut longitude = None;
    let mut latitude = None;

    for attribute in attributes {
        match attribute.name.local_name.as_str() {
            "lon" => longitude = attribute.value.trim().parse::<f64>().ok(),
            "lat" => latitude = attribute.value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    let (longitude, latitude) = (longitude?, latitude?);
    if !longitude.is_finite() || !latitude.is_finite() {
        return None;
    }

    Some(GeoPoint::new(longitude, latitude))
}
