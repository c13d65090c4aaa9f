use super::ISentReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::DateTime;
use chrono_tz::Tz;
use church_events_domain::{Reminder, ID};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct SentReminder {
    series_id: ID,
    identifier: String,
    occurrence_start: DateTime<Tz>,
}

pub struct InMemorySentReminderRepo {
    sent: Mutex<Vec<SentReminder>>,
}

impl InMemorySentReminderRepo {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemorySentReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISentReminderRepo for InMemorySentReminderRepo {
    async fn mark_sent(&self, reminders: &[Reminder]) -> anyhow::Result<()> {
        let sent = reminders
            .iter()
            .map(|r| SentReminder {
                series_id: r.series_id.clone(),
                identifier: r.identifier.clone(),
                occurrence_start: r.occurrence.start.unwrap_or(r.remind_at),
            })
            .collect::<Vec<_>>();
        insert_many(&sent, &self.sent);
        Ok(())
    }

    async fn is_sent(&self, series_id: &ID, identifier: &str) -> bool {
        any(&self.sent, |r| r.series_id == *series_id && r.identifier == identifier)
    }

    async fn delete_all_before(&self, before: DateTime<Tz>) -> usize {
        delete_by(&self.sent, |r| r.occurrence_start < before)
    }
}
