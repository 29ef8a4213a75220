//! Time-of-day handling for departure boards.
//!
//! Providers disagree on how they report times: Darwin sends "HH:MM"
//! strings, Digitransit sends seconds since the start of the service day.
//! Both are reduced to a [`NaiveTime`] here. Departures carry no date, so
//! ordering across midnight is handled by [`sort_key`] relative to a
//! [`ReferenceTime`] rather than by the times themselves.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Error returned when parsing an invalid time value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Hour after which the query is considered to be "in the afternoon".
///
/// A departure before noon seen from an afternoon reference is assumed to be
/// after midnight. The comparison is strict, so a reference at 12:xx is not
/// adjusted.
pub const MIDDAY_HOUR: u32 = 12;

const MINUTES_PER_DAY: u32 = 24 * 60;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Parse a time from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use departure_board::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("14:3").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// assert!(parse_hhmm("Delayed").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Convert seconds since the start of a service day into a wall-clock
/// date and time.
///
/// GTFS-style feeds report trips running past midnight with values of
/// 86400 and above, which land on the following calendar day.
pub fn from_service_day_seconds(
    service_day: NaiveDate,
    seconds: u64,
) -> Result<NaiveDateTime, TimeError> {
    // Two days is the most any real service day extends to.
    if seconds >= 2 * SECONDS_PER_DAY {
        return Err(TimeError::new("seconds past service day out of range"));
    }

    let midnight = service_day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TimeError::new("invalid service day"))?;

    midnight
        .checked_add_signed(Duration::seconds(seconds as i64))
        .ok_or_else(|| TimeError::new("date overflow"))
}

/// Format a time as "HH:MM", dropping seconds.
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Whether two times fall in the same minute.
pub fn same_minute(a: NaiveTime, b: NaiveTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}

/// The moment a query is made for, i.e. now shifted by the requested offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTime {
    at: NaiveDateTime,
}

impl ReferenceTime {
    /// Create a reference time at a fixed local date and time.
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Local now shifted by `offset_minutes` (may be negative).
    pub fn now_with_offset(offset_minutes: i32) -> Self {
        let now = Local::now().naive_local();
        Self::new(now + Duration::minutes(offset_minutes.into()))
    }

    /// The local date and time this reference stands for.
    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    /// The local calendar day of the reference, used as the service day.
    pub fn service_day(&self) -> NaiveDate {
        self.at.date()
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.at.hour()
    }

    /// Whether the reference is past the midday threshold.
    pub fn is_afternoon(&self) -> bool {
        self.hour() > MIDDAY_HOUR
    }
}

/// Compute the ordering key for a departure time, in minutes.
///
/// The key is `hour * 60 + minute`, plus a full day when the reference is
/// in the afternoon and the departure hour is before noon. The adjustment
/// only ever affects ordering; displayed times are left alone.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use departure_board::domain::{ReferenceTime, sort_key};
///
/// let evening = ReferenceTime::new(
///     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(22, 0, 0).unwrap(),
/// );
/// let late = NaiveTime::from_hms_opt(23, 50, 0).unwrap();
/// let after_midnight = NaiveTime::from_hms_opt(0, 15, 0).unwrap();
///
/// assert!(sort_key(after_midnight, &evening) > sort_key(late, &evening));
/// ```
pub fn sort_key(time: NaiveTime, reference: &ReferenceTime) -> u32 {
    let minutes = time.hour() * 60 + time.minute();

    if reference.is_afternoon() && time.hour() < MIDDAY_HOUR {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}
