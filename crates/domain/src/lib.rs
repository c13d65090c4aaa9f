pub mod date;
mod event_series;
mod expander;
mod occurrence;
mod reminder;
mod shared;
mod timespan;

pub use event_series::EventSeries;
pub use occurrence::{expand_all, sort_occurrences, Occurrence};
pub use reminder::Reminder;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::recurrence::{InvalidRecurrencePatternError, RecurrencePattern};
pub use timespan::{InvalidTimeSpanError, TimeSpan};
