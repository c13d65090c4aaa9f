use crate::{
    error::ChurchEventsError,
    shared::usecase::{Subscriber, UseCase},
};
use church_events_domain::{expand_all, Reminder, TimeSpan};
use church_events_infra::ChurchEventsContext;
use tracing::{debug, error, info};

/// Reminders for occurrences starting one lead time from now, within the
/// reminder window. Reminders that were already handed out are skipped and
/// the returned ones are marked as sent.
#[derive(Debug)]
pub struct GetDueRemindersUseCase {}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidWindow,
    StorageError,
}

impl From<UseCaseErrors> for ChurchEventsError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::InvalidWindow | UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDueRemindersUseCase {
    type Response = Vec<Reminder>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetDueReminders";

    async fn execute(&mut self, ctx: &ChurchEventsContext) -> Result<Self::Response, Self::Errors> {
        if !ctx.config.reminders_enabled {
            info!("Reminders are disabled");
            return Ok(Vec::new());
        }

        let lead = ctx.config.reminder_lead_time;
        let now = ctx.sys.now().with_timezone(&ctx.config.timezone);
        let window_start = now
            .checked_add_signed(lead)
            .ok_or(UseCaseErrors::InvalidWindow)?;
        let window_end = window_start
            .checked_add_signed(ctx.config.reminder_window)
            .ok_or(UseCaseErrors::InvalidWindow)?;
        let timespan =
            TimeSpan::new(window_start, window_end).map_err(|_| UseCaseErrors::InvalidWindow)?;

        let series = ctx
            .repos
            .event_series
            .find_all()
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let mut reminders = Vec::new();
        for occurrence in expand_all(&series, Some(&timespan)) {
            let reminder = match Reminder::for_occurrence(occurrence, lead) {
                Some(reminder) => reminder,
                None => continue,
            };
            if ctx
                .repos
                .sent_reminders
                .is_sent(&reminder.series_id, &reminder.identifier)
                .await
            {
                continue;
            }
            reminders.push(reminder);
        }

        Ok(reminders)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(MarkRemindersSent)]
    }
}

/// Records the handed out reminders so the next run skips them, and forgets
/// the ones whose occurrence already started
pub struct MarkRemindersSent;

#[async_trait::async_trait(?Send)]
impl Subscriber<GetDueRemindersUseCase> for MarkRemindersSent {
    async fn notify(&self, reminders: &Vec<Reminder>, ctx: &ChurchEventsContext) {
        if !reminders.is_empty() {
            if let Err(e) = ctx.repos.sent_reminders.mark_sent(reminders).await {
                error!("Unable to mark {} reminders as sent: {:?}", reminders.len(), e);
            }
        }

        let now = ctx.sys.now().with_timezone(&ctx.config.timezone);
        let pruned = ctx.repos.sent_reminders.delete_all_before(now).await;
        if pruned > 0 {
            debug!("Forgot {} sent reminders of past occurrences", pruned);
        }
    }
}
