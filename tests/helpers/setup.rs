use chrono::{DateTime, Utc};
use chrono_tz::Europe::Oslo;
use church_events_infra::{ChurchEventsContext, Config, Repos, StaticTimeSys};
use std::{path::Path, sync::Arc};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/events.json");

// Context in Europe/Oslo with the fixture events imported and the clock
// frozen at `now`
pub async fn setup_app(now: DateTime<Utc>) -> ChurchEventsContext {
    let mut config = Config::with_timezone(Oslo);
    config.reminders_enabled = true;

    let ctx = ChurchEventsContext {
        repos: Repos::create_inmemory(),
        config,
        sys: Arc::new(StaticTimeSys(now)),
    };
    let imported = ctx
        .import_rows(Path::new(FIXTURE))
        .await
        .expect("Expected to import fixture events");
    assert_eq!(imported, 6);
    ctx
}
