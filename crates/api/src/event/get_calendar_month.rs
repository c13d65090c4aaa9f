use crate::{error::ChurchEventsError, shared::usecase::UseCase};
use chrono::{Datelike, NaiveDate};
use church_events_domain::{date, expand_all, Occurrence, TimeSpan};
use church_events_infra::ChurchEventsContext;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Every occurrence of a calendar month bucketed by local day
#[derive(Debug)]
pub struct GetCalendarMonthUseCase {
    /// `YYYY-MM`
    pub month: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidMonth(String),
    StorageError,
}

impl From<UseCaseErrors> for ChurchEventsError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidMonth(month) => Self::BadClientData(format!(
                "The provided month: {}, is invalid. It should be on the format YYYY-MM",
                month
            )),
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, Vec<Occurrence>>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCalendarMonthUseCase {
    type Response = CalendarMonth;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetCalendarMonth";

    async fn execute(&mut self, ctx: &ChurchEventsContext) -> Result<Self::Response, Self::Errors> {
        let invalid_month = || UseCaseErrors::InvalidMonth(self.month.clone());
        let (year, month) = date::parse_year_month(&self.month).map_err(|_| invalid_month())?;
        let timespan =
            TimeSpan::month(year, month, &ctx.config.timezone).ok_or_else(invalid_month)?;

        let series = ctx
            .repos
            .event_series
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let mut days: BTreeMap<NaiveDate, Vec<Occurrence>> = BTreeMap::new();
        for occurrence in expand_all(&series, Some(&timespan)) {
            match occurrence.start {
                Some(start) if start.year() == year && start.month() == month => {
                    days.entry(start.date_naive()).or_default().push(occurrence)
                }
                _ => debug!(
                    series_id = %occurrence.series_id,
                    "Occurrence can not be placed on a day of {}",
                    self.month
                ),
            }
        }

        Ok(CalendarMonth { year, month, days })
    }
}
