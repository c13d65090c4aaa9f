mod inmemory;
mod row;

use church_events_domain::{EventSeries, ID};
pub use inmemory::InMemoryEventSeriesRepo;
pub use row::{load_rows, EventSeriesRow};

/// Supplies `EventSeries` to the use cases. Implementations adapt whatever
/// the storage backend holds into `EventSeries` values.
#[async_trait::async_trait]
pub trait IEventSeriesRepo: Send + Sync {
    async fn insert(&self, e: &EventSeries) -> anyhow::Result<()>;
    async fn save(&self, e: &EventSeries) -> anyhow::Result<()>;
    async fn find(&self, series_id: &ID) -> Option<EventSeries>;
    async fn find_all(&self) -> anyhow::Result<Vec<EventSeries>>;
    async fn delete(&self, series_id: &ID) -> Option<EventSeries>;
}
