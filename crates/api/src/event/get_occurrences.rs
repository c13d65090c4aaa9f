use crate::{error::ChurchEventsError, shared::usecase::UseCase};
use church_events_domain::{expand_all, Occurrence, TimeSpan};
use church_events_infra::ChurchEventsContext;
use serde::Serialize;

/// Occurrences of every stored series inside a window, merged, ordered by
/// start and paginated
#[derive(Debug)]
pub struct GetOccurrencesUseCase {
    pub start: String,
    pub end: String,
    /// 1-based
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidTimespan,
    TimespanTooLong,
    StorageError,
}

impl From<UseCaseErrors> for ChurchEventsError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidTimespan => {
                Self::BadClientData("The provided start and end is invalid".into())
            }
            UseCaseErrors::TimespanTooLong => Self::BadClientData(
                "The provided start and end is too far apart, query a shorter timespan".into(),
            ),
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencesPage {
    pub occurrences: Vec<Occurrence>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetOccurrencesUseCase {
    type Response = OccurrencesPage;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetOccurrences";

    async fn execute(&mut self, ctx: &ChurchEventsContext) -> Result<Self::Response, Self::Errors> {
        let timespan = TimeSpan::parse(&self.start, &self.end, &ctx.config.timezone)
            .ok_or(UseCaseErrors::InvalidTimespan)?;
        if timespan.greater_than(ctx.config.occurrences_query_duration_limit) {
            return Err(UseCaseErrors::TimespanTooLong);
        }

        let series = ctx
            .repos
            .event_series
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        let occurrences = expand_all(&series, Some(&timespan));

        let per_page = self
            .per_page
            .unwrap_or(ctx.config.default_page_size)
            .clamp(1, ctx.config.max_page_size);
        let page = self.page.unwrap_or(1).max(1);
        let total = occurrences.len();
        let occurrences = occurrences
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(OccurrencesPage {
            occurrences,
            total,
            page,
            per_page,
        })
    }
}
