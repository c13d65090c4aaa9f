use chrono::{prelude::*, Duration, Months};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The cadence unit of a recurring `EventSeries`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    /// Wall clock time `units` pattern units after `anchor`.
    ///
    /// Monthly steps keep the anchor's day of month and clamp it to the last
    /// day of shorter months. Every step is computed from the anchor so a
    /// clamped month never shifts the following ones.
    pub(crate) fn add_units(&self, anchor: &NaiveDateTime, units: i64) -> Option<NaiveDateTime> {
        match self {
            Self::Daily => anchor.checked_add_signed(Duration::try_days(units)?),
            Self::Weekly => anchor.checked_add_signed(Duration::try_weeks(units)?),
            Self::Monthly => anchor.checked_add_months(Months::new(u32::try_from(units).ok()?)),
        }
    }

    /// Whole pattern units from `anchor` to `at`, zero when `at` is not after
    /// `anchor`. Days and weeks are counted on local calendar dates, months
    /// on the calendar month number.
    pub(crate) fn units_between(&self, anchor: &NaiveDateTime, at: &NaiveDateTime) -> i64 {
        if at <= anchor {
            return 0;
        }
        let days = at.date().signed_duration_since(anchor.date()).num_days();
        match self {
            Self::Daily => days,
            Self::Weekly => days / 7,
            Self::Monthly => {
                let years = i64::from(at.year() - anchor.year());
                let months = i64::from(at.month()) - i64::from(anchor.month());
                (years * 12 + months).max(0)
            }
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidRecurrencePatternError {
    #[error("Unsupported recurrence pattern: `{0}`")]
    Unsupported(String),
}

impl FromStr for RecurrencePattern {
    type Err = InvalidRecurrencePatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        match pattern.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(InvalidRecurrencePatternError::Unsupported(pattern.to_string())),
        }
    }
}

impl Display for RecurrencePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pattern = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        write!(f, "{}", pattern)
    }
}
