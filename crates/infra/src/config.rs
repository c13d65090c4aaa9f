use chrono::Duration;
use chrono_tz::{Tz, UTC};
use tracing::{info, warn};

const DEFAULT_REMINDER_HOURS: i64 = 24;
/// One leap year
const MAX_REMINDER_HOURS: i64 = 366 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// Site timezone. Stored event timestamps carry no offset and are
    /// resolved in this timezone.
    pub timezone: Tz,
    /// Whether due reminders should be collected at all
    pub reminders_enabled: bool,
    /// How long before an occurrence its reminder is due
    pub reminder_lead_time: Duration,
    /// Length of the window the reminder scheduler scans on each run. It
    /// matches the hourly schedule the scheduler is expected to run on.
    pub reminder_window: Duration,
    /// Maximum allowed duration for querying occurrences.
    /// This is used to avoid having clients ask for occurrences in a
    /// timespan of several years which will take a lot of time to compute
    /// and is also not very useful information to query about anyways.
    pub occurrences_query_duration_limit: Duration,
    /// How far ahead upcoming occurrences are looked up
    pub upcoming_horizon: Duration,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Config {
    pub fn new() -> Self {
        let timezone = match std::env::var("CHURCH_EVENTS_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given CHURCH_EVENTS_TIMEZONE: {} is not a valid timezone, falling back to UTC.",
                        tz
                    );
                    UTC
                }
            },
            Err(_) => {
                info!("Did not find CHURCH_EVENTS_TIMEZONE environment variable. Using UTC.");
                UTC
            }
        };

        let reminders_enabled = match std::env::var("CHURCH_EVENTS_REMINDERS_ENABLED") {
            Ok(flag) => parse_flag(&flag).unwrap_or_else(|| {
                warn!(
                    "The given CHURCH_EVENTS_REMINDERS_ENABLED: {} is not a valid flag, reminders stay enabled.",
                    flag
                );
                true
            }),
            Err(_) => true,
        };

        let reminder_lead_time = match std::env::var("CHURCH_EVENTS_REMINDER_HOURS") {
            Ok(hours) => parse_reminder_lead_time(&hours),
            Err(_) => Duration::hours(DEFAULT_REMINDER_HOURS),
        };

        Self {
            timezone,
            reminders_enabled,
            reminder_lead_time,
            ..Self::with_timezone(timezone)
        }
    }

    /// Defaults for everything but the timezone, without reading the
    /// environment
    pub fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone,
            reminders_enabled: true,
            reminder_lead_time: Duration::hours(DEFAULT_REMINDER_HOURS),
            reminder_window: Duration::hours(1),
            occurrences_query_duration_limit: Duration::days(366),
            upcoming_horizon: Duration::days(365),
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Lead time in whole hours, clamped to `1..=MAX_REMINDER_HOURS`
fn parse_reminder_lead_time(hours: &str) -> Duration {
    let default = Duration::hours(DEFAULT_REMINDER_HOURS);
    let parsed = match hours.trim().parse::<i64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given CHURCH_EVENTS_REMINDER_HOURS: {} is not valid, falling back to the default: {}.",
                hours, DEFAULT_REMINDER_HOURS
            );
            return default;
        }
    };
    if parsed > MAX_REMINDER_HOURS {
        warn!(
            "The given CHURCH_EVENTS_REMINDER_HOURS: {} is too large, using the maximum: {}.",
            parsed, MAX_REMINDER_HOURS
        );
    }
    Duration::try_hours(parsed.clamp(1, MAX_REMINDER_HOURS)).unwrap_or(default)
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
