use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;

/// Layouts a stored event timestamp may use when it carries no offset.
/// The first one is what the event store writes.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a stored timestamp and resolves it in `tz`.
///
/// Naive timestamps are interpreted as wall clock time in `tz`, timestamps
/// with an explicit offset (RFC 3339) are converted into `tz`. A bare date
/// means midnight. Returns `None` for anything else, including empty input.
pub fn parse_datetime(datestr: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let datestr = datestr.trim();
    if datestr.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(datestr) {
        return Some(datetime.with_timezone(tz));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(datestr, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(datestr, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    localize(tz, &naive)
}

/// Resolves a wall clock time in `tz`.
///
/// Ambiguous times (clocks going back) pick the earlier instant. Times that
/// fall in a gap (clocks going forward) are pushed forward by one hour.
pub fn localize(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(datetime) => Some(datetime),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(*naive + Duration::hours(1)))
            .earliest(),
    }
}

/// Formats a timestamp the way the event store writes them
pub fn format_datetime(datetime: &DateTime<Tz>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parses a `YYYY-MM` month selector as used by the calendar navigation
pub fn parse_year_month(monthstr: &str) -> anyhow::Result<(i32, u32)> {
    let monthstr = String::from(monthstr.trim());
    let parts = monthstr.split('-').collect::<Vec<_>>();
    if parts.len() != 2 {
        return Err(anyhow::Error::msg(monthstr));
    }

    let (year, month) = match (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
        (Ok(year), Ok(month)) => (year, month),
        _ => return Err(anyhow::Error::msg(monthstr)),
    };

    if !(1970..=2100).contains(&year) || !(1..=12).contains(&month) {
        return Err(anyhow::Error::msg(monthstr));
    }

    Ok((year, month))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
