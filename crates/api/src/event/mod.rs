mod get_calendar_month;
mod get_due_reminders;
mod get_occurrences;
mod get_series_occurrences;
mod get_upcoming_occurrences;

pub use get_calendar_month::{CalendarMonth, GetCalendarMonthUseCase};
pub use get_due_reminders::{GetDueRemindersUseCase, MarkRemindersSent};
pub use get_occurrences::{GetOccurrencesUseCase, OccurrencesPage};
pub use get_series_occurrences::GetSeriesOccurrencesUseCase;
pub use get_upcoming_occurrences::GetUpcomingOccurrencesUseCase;
