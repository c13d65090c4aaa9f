use crate::{
    expander,
    occurrence::Occurrence,
    shared::{
        entity::{Entity, ID},
        recurrence::RecurrencePattern,
    },
    timespan::TimeSpan,
};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// A stored event definition, recurring or not
#[derive(Debug, Clone, PartialEq)]
pub struct EventSeries {
    pub id: ID,
    pub title: String,
    pub location: String,
    pub content: String,
    /// Start of the first occurrence. `None` when the stored value could not
    /// be parsed.
    pub start: Option<DateTime<Tz>>,
    /// End of the first occurrence
    pub end: Option<DateTime<Tz>>,
    pub is_recurring: bool,
    /// `None` also covers stored patterns that are not supported
    pub pattern: Option<RecurrencePattern>,
    /// Every `interval` pattern units. Zero is treated as one.
    pub interval: u32,
    /// Inclusive upper bound on occurrence starts
    pub until: Option<DateTime<Tz>>,
    /// Maximum number of occurrences counted from the first one. Zero means
    /// no limit.
    pub count: Option<u32>,
}

impl Default for EventSeries {
    fn default() -> Self {
        Self {
            id: Default::default(),
            title: Default::default(),
            location: Default::default(),
            content: Default::default(),
            start: None,
            end: None,
            is_recurring: false,
            pattern: None,
            interval: 1,
            until: None,
            count: None,
        }
    }
}

impl Entity for EventSeries {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl EventSeries {
    /// Fixed length of every occurrence. Only defined when both ends are
    /// known and the end is not before the start.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => Some(end.signed_duration_since(start)),
            _ => None,
        }
    }

    /// The pattern to expand with, `None` when the series should be treated
    /// as a single event
    pub fn recurrence_pattern(&self) -> Option<RecurrencePattern> {
        if self.is_recurring {
            self.pattern
        } else {
            None
        }
    }

    pub fn is_effectively_recurring(&self) -> bool {
        self.recurrence_pattern().is_some()
    }

    /// Occurrences of this series inside `timespan`, ordered by start.
    ///
    /// A missing `timespan` or an unparseable series start can not be
    /// evaluated, so the series itself is returned as the only item.
    pub fn expand(&self, timespan: Option<&TimeSpan>) -> Vec<Occurrence> {
        expander::expand(self, timespan)
    }
}
