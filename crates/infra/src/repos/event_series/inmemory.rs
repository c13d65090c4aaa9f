use super::IEventSeriesRepo;
use crate::repos::shared::inmemory_repo::*;
use church_events_domain::{EventSeries, ID};
use std::sync::Mutex;

pub struct InMemoryEventSeriesRepo {
    event_series: Mutex<Vec<EventSeries>>,
}

impl InMemoryEventSeriesRepo {
    pub fn new() -> Self {
        Self {
            event_series: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryEventSeriesRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEventSeriesRepo for InMemoryEventSeriesRepo {
    async fn insert(&self, e: &EventSeries) -> anyhow::Result<()> {
        insert(e, &self.event_series);
        Ok(())
    }

    async fn save(&self, e: &EventSeries) -> anyhow::Result<()> {
        save(e, &self.event_series);
        Ok(())
    }

    async fn find(&self, series_id: &ID) -> Option<EventSeries> {
        find(series_id, &self.event_series)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<EventSeries>> {
        Ok(find_by(&self.event_series, |_| true))
    }

    async fn delete(&self, series_id: &ID) -> Option<EventSeries> {
        delete(series_id, &self.event_series)
    }
}
