//! Lenient time-of-day parsing for GPX `<time>` values.
//!
//! Only the clock part of the timestamp is used. Dates and zone designators
//! are ignored, so `2017-05-01T12:34:56Z`, `12:34:56` and `12:34:56.250Z` all
//! yield 12:34:56.

use chrono::{NaiveTime, Timelike};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse the `HH:MM:SS` part of a timestamp.
///
/// The hour is taken from the last two characters before the first colon and
/// the second from the first two characters after the second colon. Any field
/// that does not parse counts as zero; a result that is not a valid time of
/// day becomes midnight.
pub fn parse_time_of_day(text: &str) -> NaiveTime {
    let mut sections = text.trim().split(':');

    let hours = sections.next().map(last_two).and_then(parse_field);
    let minutes = sections.next().and_then(parse_field);
    let seconds = sections.next().map(first_two).and_then(parse_field);

    NaiveTime::from_hms_opt(
        hours.unwrap_or(0),
        minutes.unwrap_or(0),
        seconds.unwrap_or(0),
    )
    .unwrap_or_default()
}

/// Milliseconds since midnight.
pub fn millis_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * 1000 + i64::from(time.nanosecond() / 1_000_000)
}

/// Inverse of [`millis_of_day`], wrapping values outside a single day.
pub fn time_from_millis(millis: i64) -> NaiveTime {
    let millis = millis.rem_euclid(MILLIS_PER_DAY);
    let secs = (millis / 1000) as u32;
    let nanos = (millis % 1000) as u32 * 1_000_000;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or_default()
}

fn parse_field(field: &str) -> Option<u32> {
    field.trim().parse().ok()
}

fn last_two(field: &str) -> &str {
    let start = field
        .char_indices()
        .rev()
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &field[start..]
}

fn first_two(field: &str) -> &str {
    let end = field
        .char_indices()
        .nth(2)
        .map(|(idx, _)| idx)
        .unwrap_or(field.len());
    &field[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_parse_iso_timestamp() {
        assert_eq!(parse_time_of_day("2017-05-01T12:34:56Z"), hms(12, 34, 56));
    }

    #[test]
    fn test_parse_bare_time() {
        assert_eq!(parse_time_of_day("07:05:09"), hms(7, 5, 9));
    }

    #[test]
    fn test_parse_fractional_seconds_truncated() {
        assert_eq!(parse_time_of_day("2017-05-01T08:00:01.750Z"), hms(8, 0, 1));
    }

    #[test]
    fn test_parse_with_offset() {
        // Zone offsets add more colon sections; they are ignored
        assert_eq!(parse_time_of_day("2017-05-01T23:59:58+02:00"), hms(23, 59, 58));
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert_eq!(parse_time_of_day("  10:20:30\n"), hms(10, 20, 30));
    }

    #[test]
    fn test_parse_garbage_is_midnight() {
        assert_eq!(parse_time_of_day("not a time"), hms(0, 0, 0));
        assert_eq!(parse_time_of_day(""), hms(0, 0, 0));
    }

    #[test]
    fn test_parse_partial_fields_default_to_zero() {
        assert_eq!(parse_time_of_day("12:xx:30"), hms(12, 0, 30));
        assert_eq!(parse_time_of_day("12:30"), hms(12, 30, 0));
    }

    #[test]
    fn test_parse_out_of_range_is_midnight() {
        assert_eq!(parse_time_of_day("25:00:00"), hms(0, 0, 0));
        assert_eq!(parse_time_of_day("12:61:00"), hms(0, 0, 0));
    }

    #[test]
    fn test_millis_round_trip() {
        let time = hms(13, 14, 15);
        assert_eq!(millis_of_day(time), 47_655_000);
        assert_eq!(time_from_millis(47_655_000), time);
    }

    #[test]
    fn test_time_from_millis_wraps() {
        assert_eq!(time_from_millis(MILLIS_PER_DAY + 1000), hms(0, 0, 1));
        assert_eq!(time_from_millis(-1000), hms(23, 59, 59));
    }
}
