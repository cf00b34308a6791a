//! GPX track log reading.
//!
//! A [`TrackSource`] buffers the log once; a [`TrackCursor`] walks the buffer
//! point by point and can be rewound to replay it.
//!
//! # Example
//!
//! ```ignore
//! use gpxsim::track::TrackSource;
//!
//! let source = TrackSource::load("ride.gpx")?;
//! for point in source.cursor() {
//!     println!("{} at {}", point.position, point.time);
//! }
//! ```

mod cursor;
mod point;
mod source;
mod summary;
mod time;

pub use cursor::TrackCursor;
pub use point::TrackPoint;
pub use source::{SourceError, TrackSource};
pub use summary::{summarize, TrackSummary, MIN_SIMULATION_POINTS};
pub use time::{millis_of_day, parse_time_of_day, time_from_millis, MILLIS_PER_DAY};
