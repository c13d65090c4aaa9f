use crate::{event_series::EventSeries, shared::entity::ID, timespan::TimeSpan};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

/// Occurrence of an `EventSeries`
///
/// Only ever produced by expanding a series and never persisted. Two
/// occurrences are the same instance when `series_id` and `start` match.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub series_id: ID,
    /// Set on every expanded instance so merged lists can be traced back to
    /// their series. `None` only on an unexpanded series.
    pub parent_series_id: Option<ID>,
    pub title: String,
    pub location: String,
    pub content: String,
    /// `None` only when the series start could not be parsed
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub is_occurrence: bool,
}

impl Occurrence {
    pub(crate) fn new(series: &EventSeries, start: DateTime<Tz>, duration: Option<Duration>) -> Self {
        Self {
            series_id: series.id.clone(),
            parent_series_id: Some(series.id.clone()),
            title: series.title.clone(),
            location: series.location.clone(),
            content: series.content.clone(),
            end: duration.and_then(|duration| start.checked_add_signed(duration)),
            start: Some(start),
            is_occurrence: true,
        }
    }

    /// The series echoed back as it is stored, used when it could not be
    /// evaluated against a window.
    pub(crate) fn unexpanded(series: &EventSeries) -> Self {
        Self {
            series_id: series.id.clone(),
            parent_series_id: None,
            title: series.title.clone(),
            location: series.location.clone(),
            content: series.content.clone(),
            start: series.start,
            end: series.end,
            is_occurrence: false,
        }
    }
}

/// Stable sort by start. Occurrences without a start come first so callers
/// that paginate never silently drop an unevaluated series.
pub fn sort_occurrences(occurrences: &mut [Occurrence]) {
    occurrences.sort_by(|o1, o2| o1.start.cmp(&o2.start));
}

/// Expands every series in the window and merges the results into one list
/// ordered by start
pub fn expand_all<'a, I>(series: I, timespan: Option<&TimeSpan>) -> Vec<Occurrence>
where
    I: IntoIterator<Item = &'a EventSeries>,
{
    let mut occurrences = series
        .into_iter()
        .flat_map(|series| series.expand(timespan))
        .collect::<Vec<_>>();
    sort_occurrences(&mut occurrences);
    occurrences
}
