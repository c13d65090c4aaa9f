use crate::{error::ChurchEventsError, shared::usecase::UseCase};
use church_events_domain::{expand_all, sort_occurrences, Occurrence, TimeSpan};
use church_events_infra::ChurchEventsContext;

/// The next occurrences from now on. When `group_recurring` is set every
/// series contributes at most its next occurrence.
#[derive(Debug)]
pub struct GetUpcomingOccurrencesUseCase {
    pub limit: Option<usize>,
    pub group_recurring: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidHorizon,
    StorageError,
}

impl From<UseCaseErrors> for ChurchEventsError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidHorizon | UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUpcomingOccurrencesUseCase {
    type Response = Vec<Occurrence>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetUpcomingOccurrences";

    async fn execute(&mut self, ctx: &ChurchEventsContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now().with_timezone(&ctx.config.timezone);
        let horizon = now
            .checked_add_signed(ctx.config.upcoming_horizon)
            .ok_or(UseCaseErrors::InvalidHorizon)?;
        let timespan = TimeSpan::new(now, horizon).map_err(|_| UseCaseErrors::InvalidHorizon)?;

        let series = ctx
            .repos
            .event_series
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let mut occurrences = if self.group_recurring {
            let mut next = series
                .iter()
                .filter_map(|series| series.expand(Some(&timespan)).into_iter().next())
                .collect::<Vec<_>>();
            sort_occurrences(&mut next);
            next
        } else {
            expand_all(&series, Some(&timespan))
        };

        let limit = self
            .limit
            .unwrap_or(ctx.config.default_page_size)
            .clamp(1, ctx.config.max_page_size);
        occurrences.truncate(limit);

        Ok(occurrences)
    }
}
