//! Shared time math for rundown timing
//!
//! All times are plain `i64` milliseconds. Wall-clock values are measured from
//! local midnight; values on the *effective axis* additionally carry whole days
//! so that events on either side of midnight compare correctly.

use crate::{Error, Result};

/// Milliseconds in one calendar day
pub const DAY_MS: i64 = 86_400_000;

/// Half a day, the threshold for detecting a midnight rollover in the clock
pub const HALF_DAY_MS: i64 = DAY_MS / 2;

/// Milliseconds in one hour
pub const HOUR_MS: i64 = 3_600_000;

const MINUTE_MS: i64 = 60_000;
const SECOND_MS: i64 = 1_000;

/// Returns the duration between two wall-clock times, wrapping past midnight
/// when `end` is earlier than `start`.
pub fn span(start: i64, end: i64) -> i64 {
    if end < start {
        end + DAY_MS - start
    } else {
        end - start
    }
}

/// Reduces any millisecond value to a time of day in `[0, DAY_MS)`
pub fn wrap_day(ms: i64) -> i64 {
    ms.rem_euclid(DAY_MS)
}

/// Checks whether a value is a valid time of day
pub fn is_time_of_day(ms: i64) -> bool {
    (0..DAY_MS).contains(&ms)
}

/// Places a wall-clock time on the effective axis for the given day
pub fn on_day(ms: i64, day: i64) -> i64 {
    day * DAY_MS + ms
}

/// Tracks how many times the wall clock has crossed midnight.
///
/// The clock feed only reports milliseconds since midnight, so a rollover shows
/// up as `now` dropping sharply between two samples. The cursor threads the
/// previous sample and the day count through successive calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCursor {
    last_now: Option<i64>,
    day: i64,
}

impl DayCursor {
    /// Creates a cursor starting on the given day
    pub fn new(day: i64) -> Self {
        Self {
            last_now: None,
            day,
        }
    }

    /// Feeds a new clock sample and returns the day it belongs to
    pub fn advance(&mut self, now: i64) -> i64 {
        if let Some(last) = self.last_now {
            if last - now > HALF_DAY_MS {
                self.day += 1;
                log::debug!("clock crossed midnight, now on day {}", self.day);
            }
        }
        self.last_now = Some(now);
        self.day
    }

    /// Overrides the day count, keeping the last sample
    pub fn set_day(&mut self, day: i64) {
        self.day = day;
    }

    /// Returns the current day count
    pub fn day(&self) -> i64 {
        self.day
    }
}

/// Parses `hh:mm` or `hh:mm:ss` into milliseconds since midnight
pub fn parse_clock(text: &str) -> Result<i64> {
    let invalid = || Error::InvalidClock(text.to_string());

    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part.parse::<i64>().map_err(|_| invalid())?;
    }
    let [hours, minutes, seconds] = fields;

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }

    Ok(hours * HOUR_MS + minutes * MINUTE_MS + seconds * SECOND_MS)
}

/// Formats a wall-clock time as `hh:mm:ss`, wrapping values outside one day
pub fn format_clock(ms: i64) -> String {
    let ms = wrap_day(ms);
    let hours = ms / HOUR_MS;
    let minutes = (ms % HOUR_MS) / MINUTE_MS;
    let seconds = (ms % MINUTE_MS) / SECOND_MS;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Formats a signed duration into a human-readable string
pub fn format_duration(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let total_secs = ms.unsigned_abs() / SECOND_MS as u64;

    if total_secs < 60 {
        format!("{}{}s", sign, total_secs)
    } else if total_secs < 3600 {
        format!("{}{}m {:02}s", sign, total_secs / 60, total_secs % 60)
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        format!("{}{}h {:02}m {:02}s", sign, hours, mins, total_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_wraps_midnight() {
        assert_eq!(span(10_000, 20_000), 10_000);
        assert_eq!(span(10_000, 1_000), DAY_MS + 1_000 - 10_000);
        assert_eq!(span(5_000, 5_000), 0);
    }

    #[test]
    fn test_wrap_day() {
        assert_eq!(wrap_day(DAY_MS + 5), 5);
        assert_eq!(wrap_day(-1), DAY_MS - 1);
        assert_eq!(wrap_day(0), 0);
    }

    #[test]
    fn test_day_cursor_detects_rollover() {
        let mut cursor = DayCursor::default();
        assert_eq!(cursor.advance(DAY_MS - 2_000), 0);
        assert_eq!(cursor.advance(DAY_MS - 1_000), 0);
        assert_eq!(cursor.advance(500), 1);
        assert_eq!(cursor.advance(1_500), 1);
    }

    #[test]
    fn test_day_cursor_ignores_small_jumps_backwards() {
        let mut cursor = DayCursor::new(2);
        cursor.advance(40 * MINUTE_MS);
        // operator nudging the clock back is not a new day
        assert_eq!(cursor.advance(10 * MINUTE_MS), 2);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:00").unwrap(), 0);
        assert_eq!(parse_clock("09:30").unwrap(), 9 * HOUR_MS + 30 * MINUTE_MS);
        assert_eq!(
            parse_clock("23:59:59").unwrap(),
            23 * HOUR_MS + 59 * MINUTE_MS + 59 * SECOND_MS
        );
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("10").is_err());
        assert!(parse_clock("aa:bb").is_err());
        assert!(parse_clock("10:61").is_err());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(13 * HOUR_MS + 5 * MINUTE_MS + 9 * SECOND_MS), "13:05:09");
        assert_eq!(format_clock(DAY_MS + HOUR_MS), "01:00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12_400), "12s");
        assert_eq!(format_duration(-65_000), "-1m 05s");
        assert_eq!(format_duration(HOUR_MS + 2 * MINUTE_MS + 3 * SECOND_MS), "1h 02m 03s");
    }
}
