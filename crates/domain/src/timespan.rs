use crate::date::{get_month_length, localize, parse_datetime};
use chrono::{prelude::*, DateTime, Duration};
use chrono_tz::Tz;
use std::error::Error;

/// Inclusive query window `[start, end]` resolved in one timezone
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpan {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, InvalidTimeSpanError> {
        if end < start {
            return Err(InvalidTimeSpanError(start.to_rfc3339(), end.to_rfc3339()));
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds in `tz`. `None` when either bound is unparseable
    /// or the window is inverted.
    pub fn parse(start: &str, end: &str, tz: &Tz) -> Option<Self> {
        let start = parse_datetime(start, tz)?;
        let end = parse_datetime(end, tz)?;
        Self::new(start, end).ok()
    }

    /// The whole calendar month, from the first day at 00:00:00 to the last
    /// day at 23:59:59 local time.
    pub fn month(year: i32, month: u32, tz: &Tz) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last_day = NaiveDate::from_ymd_opt(year, month, get_month_length(year, month))?;
        let start = localize(tz, &first_day.and_hms_opt(0, 0, 0)?)?;
        let end = localize(tz, &last_day.and_hms_opt(23, 59, 59)?)?;
        Self::new(start, end).ok()
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    pub fn greater_than(&self, limit: Duration) -> bool {
        self.duration() > limit
    }

    pub fn contains(&self, datetime: &DateTime<Tz>) -> bool {
        self.start <= *datetime && *datetime <= self.end
    }
}

#[derive(Debug)]
pub struct InvalidTimeSpanError(String, String);

impl Error for InvalidTimeSpanError {}

impl std::fmt::Display for InvalidTimeSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Provided timespan start: {} and end: {} is invalid. The end can not be before the start.",
            self.0, self.1
        )
    }
}
