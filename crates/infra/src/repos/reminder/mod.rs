mod inmemory;

use chrono::DateTime;
use chrono_tz::Tz;
use church_events_domain::{Reminder, ID};
pub use inmemory::InMemorySentReminderRepo;

/// Remembers which reminders were already handed out, keyed by series and
/// occurrence identifier
#[async_trait::async_trait]
pub trait ISentReminderRepo: Send + Sync {
    async fn mark_sent(&self, reminders: &[Reminder]) -> anyhow::Result<()>;
    async fn is_sent(&self, series_id: &ID, identifier: &str) -> bool;
    /// Forgets reminders whose occurrence started before `before`. Those can
    /// never be due again. Returns how many were dropped.
    async fn delete_all_before(&self, before: DateTime<Tz>) -> usize;
}
