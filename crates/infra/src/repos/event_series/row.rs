use anyhow::Context;
use church_events_domain::{date::parse_datetime, EventSeries, RecurrencePattern, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// A stored event as the event store hands it out: the post joined with its
/// event meta. Numeric columns may come back as numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSeriesRow {
    #[serde(rename = "ID")]
    pub id: ID,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_content: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub is_recurring: Option<i64>,
    #[serde(default)]
    pub recurring_pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub recurring_interval: Option<i64>,
    #[serde(default)]
    pub recurring_end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub recurring_count: Option<i64>,
}

impl EventSeriesRow {
    /// Resolves the row's timestamps in `tz`. Values that do not parse are
    /// left out so the expander can degrade field by field.
    pub fn into_series(self, tz: &Tz) -> EventSeries {
        let parse = |value: &Option<String>| value.as_deref().and_then(|v| parse_datetime(v, tz));

        let pattern = match self.recurring_pattern.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(pattern) => match pattern.parse::<RecurrencePattern>() {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    debug!(series_id = %self.id, "{}", e);
                    None
                }
            },
        };

        EventSeries {
            start: parse(&self.event_date),
            end: parse(&self.event_end_date),
            until: parse(&self.recurring_end_date),
            is_recurring: self.is_recurring.unwrap_or(0) != 0,
            pattern,
            interval: self
                .recurring_interval
                .map(|interval| u32::try_from(interval.max(1)).unwrap_or(u32::MAX))
                .unwrap_or(1),
            count: self
                .recurring_count
                .filter(|count| *count > 0)
                .map(|count| u32::try_from(count).unwrap_or(u32::MAX)),
            id: self.id,
            title: self.post_title,
            content: self.post_content,
            location: self.location.unwrap_or_default(),
        }
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(b)),
        _ => None,
    }))
}

/// Reads a JSON array of stored event rows
pub fn load_rows(path: &Path) -> anyhow::Result<Vec<EventSeriesRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read event rows from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Malformed event rows in {}", path.display()))
}
