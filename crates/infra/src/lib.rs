mod config;
mod repos;
mod system;

pub use config::Config;
pub use repos::{
    load_rows, EventSeriesRow, IEventSeriesRepo, ISentReminderRepo, InMemoryEventSeriesRepo,
    InMemorySentReminderRepo, Repos,
};
use std::{path::Path, sync::Arc};
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct ChurchEventsContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl ChurchEventsContext {
    /// Context with empty in-memory repositories and the default settings
    /// for `UTC`, independent of the environment
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::with_timezone(chrono_tz::UTC),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Stores every row of a JSON export as an `EventSeries`, resolving its
    /// timestamps in the configured timezone
    pub async fn import_rows(&self, path: &Path) -> anyhow::Result<usize> {
        let rows = load_rows(path)?;
        let count = rows.len();
        for row in rows {
            let series = row.into_series(&self.config.timezone);
            self.repos.event_series.save(&series).await?;
        }
        info!("Imported {} event series from {}", count, path.display());
        Ok(count)
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> ChurchEventsContext {
    ChurchEventsContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
    }
}
