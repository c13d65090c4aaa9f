use crate::{error::ChurchEventsError, shared::usecase::UseCase};
use church_events_domain::{Occurrence, TimeSpan, ID};
use church_events_infra::ChurchEventsContext;

#[derive(Debug)]
pub struct GetSeriesOccurrencesUseCase {
    pub series_id: ID,
    pub start: String,
    pub end: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidTimespan,
    TimespanTooLong,
}

impl From<UseCaseErrors> for ChurchEventsError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::NotFound(id) => Self::NotFound(format!(
                "The event series with id: {}, was not found.",
                id
            )),
            UseCaseErrors::InvalidTimespan => {
                Self::BadClientData("The provided start and end is invalid".into())
            }
            UseCaseErrors::TimespanTooLong => Self::BadClientData(
                "The provided start and end is too far apart, query a shorter timespan".into(),
            ),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetSeriesOccurrencesUseCase {
    type Response = Vec<Occurrence>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetSeriesOccurrences";

    async fn execute(&mut self, ctx: &ChurchEventsContext) -> Result<Self::Response, Self::Errors> {
        let series = ctx
            .repos
            .event_series
            .find(&self.series_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.series_id.clone()))?;

        let timespan = TimeSpan::parse(&self.start, &self.end, &ctx.config.timezone)
            .ok_or(UseCaseErrors::InvalidTimespan)?;
        if timespan.greater_than(ctx.config.occurrences_query_duration_limit) {
            return Err(UseCaseErrors::TimespanTooLong);
        }

        Ok(series.expand(Some(&timespan)))
    }
}
