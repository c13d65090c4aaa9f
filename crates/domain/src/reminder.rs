use crate::{date::format_datetime, occurrence::Occurrence, shared::entity::ID};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

/// A `Reminder` represents a specific time before an `Occurrence` of an
/// `EventSeries` at which subscribers should be notified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// The `EventSeries` this `Reminder` is associated with
    pub series_id: ID,
    /// Identifies the occurrence within the series. Used to avoid sending
    /// the same reminder twice when the scheduler runs over overlapping
    /// windows.
    pub identifier: String,
    /// The time at which the reminder is due
    pub remind_at: DateTime<Tz>,
    pub occurrence: Occurrence,
}

impl Reminder {
    /// `None` for occurrences without a start, which can not be scheduled
    pub fn for_occurrence(occurrence: Occurrence, lead: Duration) -> Option<Self> {
        let start = occurrence.start?;
        Some(Self {
            series_id: occurrence.series_id.clone(),
            identifier: Self::identifier_for(&start),
            remind_at: start.checked_sub_signed(lead)?,
            occurrence,
        })
    }

    pub fn identifier_for(start: &DateTime<Tz>) -> String {
        format!("reminder_{}", format_datetime(start))
    }
}
