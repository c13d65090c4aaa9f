//! Expansion of an `EventSeries` into the `Occurrence`s inside a window.
//!
//! Every occurrence is computed from the series anchor as
//! `anchor + index * interval` pattern units, so the cost of a call is
//! proportional to the number of occurrences inside the window and not to
//! the distance between the anchor and the window.

use crate::{
    date::localize, event_series::EventSeries, occurrence::Occurrence,
    shared::recurrence::RecurrencePattern, timespan::TimeSpan,
};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use tracing::debug;

pub(crate) fn expand(series: &EventSeries, timespan: Option<&TimeSpan>) -> Vec<Occurrence> {
    let (timespan, start) = match (timespan, series.start) {
        (Some(timespan), Some(start)) => (timespan, start),
        (timespan, start) => {
            debug!(
                series_id = %series.id,
                has_timespan = timespan.is_some(),
                has_start = start.is_some(),
                "Unable to evaluate event series, returning it unexpanded"
            );
            return vec![Occurrence::unexpanded(series)];
        }
    };
    let duration = series.duration();

    let pattern = match series.recurrence_pattern() {
        Some(pattern) => pattern,
        None => {
            return if timespan.contains(&start) {
                vec![Occurrence::new(series, start, duration)]
            } else {
                Vec::new()
            };
        }
    };

    let schedule = Schedule::new(pattern, series.interval, start);
    let first_index = match schedule.first_index_not_before(timespan.start()) {
        Some(index) => index,
        None => return Vec::new(),
    };
    // Counting starts at the anchor, so a limit of zero would hide the series
    // entirely. It is treated as "no limit" instead.
    let count = series.count.filter(|count| *count > 0).map(i64::from);

    schedule
        .cursor(first_index)
        .take_while(|(_, at)| at <= timespan.end())
        .take_while(|(_, at)| series.until.map_or(true, |until| *at <= until))
        .take_while(|(produced, _)| count.map_or(true, |count| *produced < count))
        .map(|(_, at)| Occurrence::new(series, at, duration))
        .collect()
}

/// Occurrence positions of one series
struct Schedule {
    pattern: RecurrencePattern,
    interval: i64,
    start: DateTime<Tz>,
    anchor: NaiveDateTime,
    tz: Tz,
}

impl Schedule {
    fn new(pattern: RecurrencePattern, interval: u32, start: DateTime<Tz>) -> Self {
        Self {
            pattern,
            interval: i64::from(interval.max(1)),
            anchor: start.naive_local(),
            tz: start.timezone(),
            start,
        }
    }

    /// Start of the occurrence at `index`, counted from the anchor. `None`
    /// once the date arithmetic leaves the supported range.
    fn nth(&self, index: i64) -> Option<DateTime<Tz>> {
        if index == 0 {
            return Some(self.start);
        }
        let units = index.checked_mul(self.interval)?;
        let naive = self.pattern.add_units(&self.anchor, units)?;
        localize(&self.tz, &naive)
    }

    /// Index of the first occurrence starting at or after `at`.
    ///
    /// Jumps straight to the whole number of intervals covering the unit
    /// difference between the anchor and `at`, then corrects by single
    /// steps in either direction.
    fn first_index_not_before(&self, at: &DateTime<Tz>) -> Option<i64> {
        if *at <= self.start {
            return Some(0);
        }
        let target = at.with_timezone(&self.tz).naive_local();
        let units = self.pattern.units_between(&self.anchor, &target);
        let mut index = (units + self.interval - 1) / self.interval;

        while index > 0 && self.nth(index - 1)? >= *at {
            index -= 1;
        }
        while self.nth(index)? < *at {
            index += 1;
        }
        Some(index)
    }

    /// Walks the occurrences from `index` on, yielding how many occurrences
    /// precede each one together with its start
    fn cursor(&self, index: i64) -> Cursor<'_> {
        Cursor {
            schedule: self,
            index,
        }
    }
}

struct Cursor<'a> {
    schedule: &'a Schedule,
    index: i64,
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (i64, DateTime<Tz>);

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.schedule.nth(self.index)?;
        let item = (self.index, at);
        self.index += 1;
        Some(item)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{shared::entity::ID, EventSeries};
    use chrono::{Datelike, Days, Duration, TimeZone, Timelike};
    use chrono_tz::{America::New_York, Europe::Oslo, UTC};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn window(start: &str, end: &str) -> TimeSpan {
        TimeSpan::parse(start, end, &UTC).unwrap()
    }

    fn recurring(start: DateTime<Tz>, pattern: RecurrencePattern, interval: u32) -> EventSeries {
        EventSeries {
            id: ID::from(7),
            title: "Bible study".into(),
            location: "Fellowship hall".into(),
            content: "Bring a friend".into(),
            start: Some(start),
            is_recurring: true,
            pattern: Some(pattern),
            interval,
            ..Default::default()
        }
    }

    fn starts(occurrences: &[Occurrence]) -> Vec<DateTime<Tz>> {
        occurrences.iter().filter_map(|o| o.start).collect()
    }

    #[test]
    fn single_event_inside_window() {
        let series = EventSeries {
            id: ID::from(1),
            start: Some(utc(2024, 1, 6, 9, 0)),
            end: Some(utc(2024, 1, 6, 11, 0)),
            ..Default::default()
        };

        let oc = series.expand(Some(&window("2024-01-05", "2024-01-07")));
        assert_eq!(oc.len(), 1);
        assert_eq!(oc[0].start, series.start);
        assert_eq!(oc[0].end, series.end);
        assert_eq!(oc[0].series_id, ID::from(1));
        assert_eq!(oc[0].parent_series_id, Some(ID::from(1)));
        assert!(oc[0].is_occurrence);
    }

    #[test]
    fn single_event_outside_window() {
        let series = EventSeries {
            start: Some(utc(2024, 1, 8, 9, 0)),
            ..Default::default()
        };

        assert!(series
            .expand(Some(&window("2024-01-05", "2024-01-07")))
            .is_empty());
        assert!(series
            .expand(Some(&window("2024-01-09", "2024-01-10")))
            .is_empty());
    }

    #[test]
    fn single_event_on_window_bounds() {
        let series = EventSeries {
            start: Some(utc(2024, 1, 5, 0, 0)),
            ..Default::default()
        };
        assert_eq!(
            series
                .expand(Some(&window("2024-01-05", "2024-01-07")))
                .len(),
            1
        );
        assert_eq!(
            series
                .expand(Some(&window("2024-01-01", "2024-01-05")))
                .len(),
            1
        );
    }

    #[test]
    fn daily_series() {
        let series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);

        let oc = series.expand(Some(&window("2024-01-05", "2024-01-07 23:59:59")));
        assert_eq!(
            starts(&oc),
            vec![
                utc(2024, 1, 5, 9, 0),
                utc(2024, 1, 6, 9, 0),
                utc(2024, 1, 7, 9, 0)
            ]
        );
        for occurrence in &oc {
            assert_eq!(occurrence.title, "Bible study");
            assert_eq!(occurrence.location, "Fellowship hall");
            assert_eq!(occurrence.content, "Bring a friend");
            assert_eq!(occurrence.parent_series_id, Some(ID::from(7)));
            assert!(occurrence.is_occurrence);
            assert_eq!(occurrence.end, None);
        }
    }

    #[test]
    fn daily_series_window_ending_before_first_time_of_day() {
        let series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);

        // 2024-01-07 00:00:00 is before the 09:00 occurrence that day
        let oc = series.expand(Some(&window("2024-01-05", "2024-01-07")));
        assert_eq!(
            starts(&oc),
            vec![utc(2024, 1, 5, 9, 0), utc(2024, 1, 6, 9, 0)]
        );
    }

    #[test]
    fn weekly_series_with_interval() {
        let series = recurring(utc(2024, 1, 1, 0, 0), RecurrencePattern::Weekly, 2);

        let oc = series.expand(Some(&window("2024-01-01", "2024-03-10")));
        assert_eq!(
            starts(&oc),
            vec![
                utc(2024, 1, 1, 0, 0),
                utc(2024, 1, 15, 0, 0),
                utc(2024, 1, 29, 0, 0),
                utc(2024, 2, 12, 0, 0),
                utc(2024, 2, 26, 0, 0),
            ]
        );
    }

    #[test]
    fn weekly_series_stays_anchored_to_weekday() {
        // 2024-01-03 is a Wednesday
        let series = recurring(utc(2024, 1, 3, 19, 0), RecurrencePattern::Weekly, 2);

        let oc = series.expand(Some(&window("2024-05-01", "2024-07-01")));
        assert!(!oc.is_empty());
        for start in starts(&oc) {
            assert_eq!(start.weekday(), chrono::Weekday::Wed);
            let weeks = (start - utc(2024, 1, 3, 19, 0)).num_weeks();
            assert_eq!(weeks % 2, 0);
        }
    }

    #[test]
    fn window_starting_exactly_on_an_occurrence() {
        let weekly = recurring(utc(2024, 1, 1, 10, 0), RecurrencePattern::Weekly, 2);

        // Exactly on the 3rd occurrence
        let ts = TimeSpan::new(utc(2024, 1, 29, 10, 0), utc(2024, 2, 20, 0, 0)).unwrap();
        assert_eq!(
            starts(&weekly.expand(Some(&ts))),
            vec![utc(2024, 1, 29, 10, 0), utc(2024, 2, 12, 10, 0)]
        );

        // One minute later the 3rd occurrence is outside
        let ts = TimeSpan::new(utc(2024, 1, 29, 10, 1), utc(2024, 2, 20, 0, 0)).unwrap();
        assert_eq!(
            starts(&weekly.expand(Some(&ts))),
            vec![utc(2024, 2, 12, 10, 0)]
        );

        // One week early, which is an off week for the series
        let ts = TimeSpan::new(utc(2024, 1, 22, 10, 0), utc(2024, 2, 5, 0, 0)).unwrap();
        assert_eq!(
            starts(&weekly.expand(Some(&ts))),
            vec![utc(2024, 1, 29, 10, 0)]
        );

        let monthly = recurring(utc(2024, 1, 15, 18, 0), RecurrencePattern::Monthly, 3);

        let ts = TimeSpan::new(utc(2024, 7, 15, 18, 0), utc(2024, 12, 31, 0, 0)).unwrap();
        assert_eq!(
            starts(&monthly.expand(Some(&ts))),
            vec![utc(2024, 7, 15, 18, 0), utc(2024, 10, 15, 18, 0)]
        );

        // One month early
        let ts = TimeSpan::new(utc(2024, 6, 15, 18, 0), utc(2024, 9, 1, 0, 0)).unwrap();
        assert_eq!(
            starts(&monthly.expand(Some(&ts))),
            vec![utc(2024, 7, 15, 18, 0)]
        );

        // Later on the same day as an occurrence
        let ts = TimeSpan::new(utc(2024, 7, 15, 19, 0), utc(2024, 12, 31, 0, 0)).unwrap();
        assert_eq!(
            starts(&monthly.expand(Some(&ts))),
            vec![utc(2024, 10, 15, 18, 0)]
        );
    }

    #[test]
    fn monthly_series_clamps_short_months_without_drifting() {
        let series = recurring(utc(2024, 1, 31, 12, 0), RecurrencePattern::Monthly, 1);

        let oc = series.expand(Some(&window("2024-01-01", "2024-05-31 23:59:59")));
        assert_eq!(
            starts(&oc),
            vec![
                utc(2024, 1, 31, 12, 0),
                utc(2024, 2, 29, 12, 0),
                utc(2024, 3, 31, 12, 0),
                utc(2024, 4, 30, 12, 0),
                utc(2024, 5, 31, 12, 0),
            ]
        );
    }

    #[test]
    fn count_is_counted_from_series_origin() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.count = Some(5);

        let oc = series.expand(Some(&window("2024-01-03", "2024-02-01")));
        assert_eq!(
            starts(&oc),
            vec![
                utc(2024, 1, 3, 9, 0),
                utc(2024, 1, 4, 9, 0),
                utc(2024, 1, 5, 9, 0)
            ]
        );

        // Window entirely after the last counted occurrence
        assert!(series
            .expand(Some(&window("2024-01-06", "2024-02-01")))
            .is_empty());
    }

    #[test]
    fn count_with_interval_and_monthly_pattern() {
        let mut series = recurring(utc(2024, 1, 10, 9, 0), RecurrencePattern::Monthly, 2);
        series.count = Some(3);

        // Occurrences: Jan 10, Mar 10, May 10
        let oc = series.expand(Some(&window("2024-02-01", "2025-01-01")));
        assert_eq!(
            starts(&oc),
            vec![utc(2024, 3, 10, 9, 0), utc(2024, 5, 10, 9, 0)]
        );
    }

    #[test]
    fn until_is_inclusive() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.until = Some(utc(2024, 1, 10, 23, 59));

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-20")));
        assert_eq!(oc.len(), 10);
        assert_eq!(oc.last().unwrap().start, Some(utc(2024, 1, 10, 9, 0)));

        // Until exactly on an occurrence still includes it
        series.until = Some(utc(2024, 1, 10, 9, 0));
        let oc = series.expand(Some(&window("2024-01-01", "2024-01-20")));
        assert_eq!(oc.last().unwrap().start, Some(utc(2024, 1, 10, 9, 0)));
    }

    #[test]
    fn until_and_count_whichever_comes_first() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.until = Some(utc(2024, 1, 10, 23, 59));
        series.count = Some(3);

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-20")));
        assert_eq!(oc.len(), 3);

        series.count = Some(30);
        let oc = series.expand(Some(&window("2024-01-01", "2024-01-20")));
        assert_eq!(oc.len(), 10);
    }

    #[test]
    fn non_positive_count_is_ignored() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.count = Some(0);

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-07 23:59:59")));
        assert_eq!(oc.len(), 7);
    }

    #[test]
    fn zero_interval_is_treated_as_one() {
        let series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Weekly, 0);

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-31")));
        assert_eq!(oc.len(), 5);
    }

    #[test]
    fn duration_is_propagated() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Weekly, 1);
        series.end = Some(utc(2024, 1, 1, 10, 30));

        let oc = series.expand(Some(&window("2024-01-01", "2024-03-01")));
        assert_eq!(oc.len(), 9);
        for occurrence in &oc {
            let start = occurrence.start.unwrap();
            assert_eq!(occurrence.end, Some(start + Duration::minutes(90)));
        }
    }

    #[test]
    fn end_before_start_means_no_end() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.end = Some(utc(2024, 1, 1, 8, 0));

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-03")));
        assert!(!oc.is_empty());
        assert!(oc.iter().all(|o| o.end.is_none()));
    }

    #[test]
    fn fast_forward_matches_naive_walk() {
        let origin = utc(2021, 3, 14, 7, 45);
        let series = recurring(origin, RecurrencePattern::Daily, 3);
        let ts = window("2024-06-03", "2024-06-09 23:59:59");

        let mut naive = Vec::new();
        let mut cursor = origin;
        while cursor <= *ts.end() {
            if ts.contains(&cursor) {
                naive.push(cursor);
            }
            cursor = cursor.checked_add_days(Days::new(3)).unwrap();
        }

        let oc = series.expand(Some(&ts));
        assert!(!naive.is_empty());
        assert_eq!(starts(&oc), naive);
    }

    #[test]
    fn fast_forward_does_not_walk_from_origin() {
        // An origin far in the past would take millions of steps to walk
        let series = recurring(utc(1900, 1, 1, 6, 0), RecurrencePattern::Daily, 1);
        let oc = series.expand(Some(&window("2090-01-01", "2090-01-07 23:59:59")));
        assert_eq!(oc.len(), 7);
        assert_eq!(oc[0].start, Some(utc(2090, 1, 1, 6, 0)));
    }

    #[test]
    fn expansion_is_deterministic() {
        let mut series = recurring(utc(2024, 1, 31, 12, 0), RecurrencePattern::Monthly, 1);
        series.end = Some(utc(2024, 1, 31, 13, 0));
        let ts = window("2024-01-01", "2024-12-31");

        assert_eq!(series.expand(Some(&ts)), series.expand(Some(&ts)));
    }

    #[test]
    fn missing_window_returns_series_unexpanded() {
        let series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);

        // An inverted window can not be built, callers end up passing `None`
        let ts = TimeSpan::parse("2024-01-07", "2024-01-05", &UTC);
        let oc = series.expand(ts.as_ref());
        assert_eq!(oc.len(), 1);
        assert_eq!(oc[0].start, series.start);
        assert_eq!(oc[0].series_id, series.id);
        assert_eq!(oc[0].parent_series_id, None);
        assert!(!oc[0].is_occurrence);
    }

    #[test]
    fn unparseable_start_returns_series_unexpanded() {
        let mut series = recurring(utc(2024, 1, 1, 9, 0), RecurrencePattern::Daily, 1);
        series.start = None;

        let oc = series.expand(Some(&window("2024-01-01", "2024-01-31")));
        assert_eq!(oc.len(), 1);
        assert_eq!(oc[0].start, None);
        assert!(!oc[0].is_occurrence);
    }

    #[test]
    fn unknown_pattern_behaves_as_single_event() {
        let mut unknown = recurring(utc(2024, 1, 6, 9, 0), RecurrencePattern::Daily, 1);
        unknown.pattern = None;
        let mut single = unknown.clone();
        single.is_recurring = false;

        for ts in &[
            window("2024-01-05", "2024-01-07"),
            window("2024-01-07", "2024-01-31"),
        ] {
            assert_eq!(unknown.expand(Some(ts)), single.expand(Some(ts)));
        }
        assert_eq!(
            unknown
                .expand(Some(&window("2024-01-05", "2024-01-07")))
                .len(),
            1
        );
    }

    #[test]
    fn recurring_series_starting_after_window() {
        let series = recurring(utc(2024, 3, 1, 9, 0), RecurrencePattern::Daily, 1);
        assert!(series
            .expand(Some(&window("2024-01-01", "2024-02-01")))
            .is_empty());
    }

    #[test]
    fn keeps_wall_clock_time_across_dst() {
        let start = Oslo.with_ymd_and_hms(2024, 3, 24, 11, 0, 0).unwrap();
        let series = recurring(start, RecurrencePattern::Weekly, 1);
        let ts = TimeSpan::new(
            Oslo.with_ymd_and_hms(2024, 3, 24, 0, 0, 0).unwrap(),
            Oslo.with_ymd_and_hms(2024, 4, 8, 0, 0, 0).unwrap(),
        )
        .unwrap();

        let oc = series.expand(Some(&ts));
        assert_eq!(oc.len(), 3);
        for occurrence in &oc {
            assert_eq!(occurrence.start.unwrap().hour(), 11);
        }
    }

    #[test]
    fn window_in_another_timezone_compares_instants() {
        let series = recurring(utc(2024, 1, 1, 3, 0), RecurrencePattern::Daily, 1);
        // 2024-01-04 22:00 in New York is 2024-01-05 03:00 UTC
        let ts = TimeSpan::new(
            New_York.with_ymd_and_hms(2024, 1, 4, 22, 0, 0).unwrap(),
            New_York.with_ymd_and_hms(2024, 1, 5, 22, 0, 0).unwrap(),
        )
        .unwrap();

        let oc = series.expand(Some(&ts));
        assert_eq!(
            starts(&oc),
            vec![utc(2024, 1, 5, 3, 0), utc(2024, 1, 6, 3, 0)]
        );
    }
}
