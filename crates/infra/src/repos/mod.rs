mod event_series;
mod reminder;
mod shared;

pub use event_series::{load_rows, EventSeriesRow, IEventSeriesRepo, InMemoryEventSeriesRepo};
pub use reminder::{ISentReminderRepo, InMemorySentReminderRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub event_series: Arc<dyn IEventSeriesRepo>,
    pub sent_reminders: Arc<dyn ISentReminderRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            event_series: Arc::new(InMemoryEventSeriesRepo::new()),
            sent_reminders: Arc::new(InMemorySentReminderRepo::new()),
        }
    }
}
