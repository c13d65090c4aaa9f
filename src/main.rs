mod telemetry;

use church_events_api::{
    event::{
        GetCalendarMonthUseCase, GetDueRemindersUseCase, GetOccurrencesUseCase,
        GetSeriesOccurrencesUseCase, GetUpcomingOccurrencesUseCase,
    },
    execute, ChurchEventsError,
};
use church_events_domain::ID;
use church_events_infra::setup_context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use telemetry::{get_subscriber, init_subscriber};

#[derive(Parser)]
#[command(name = "church_events")]
#[command(about = "Expands recurring church events into concrete occurrences", long_about = None)]
struct Cli {
    /// JSON export of the stored events
    #[arg(long, short = 'e', global = true)]
    events: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Occurrences of every event between two dates
    Occurrences {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Occurrences of a single event between two dates
    Series {
        #[arg(long)]
        id: ID,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// The next occurrences from now on
    Upcoming {
        #[arg(long)]
        limit: Option<usize>,
        /// Only the next occurrence of each event
        #[arg(long)]
        grouped: bool,
    },

    /// Occurrences of a month grouped by day
    Calendar {
        /// YYYY-MM
        #[arg(long)]
        month: String,
    },

    /// Reminders that are due now
    Reminders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("church_events".into(), "info".into());
    init_subscriber(subscriber)?;

    let cli = Cli::parse();

    let context = setup_context();
    if let Some(path) = &cli.events {
        context.import_rows(path).await?;
    }

    match cli.command {
        Commands::Occurrences {
            from,
            to,
            page,
            per_page,
        } => {
            let usecase = GetOccurrencesUseCase {
                start: from,
                end: to,
                page,
                per_page,
            };
            let res = execute(usecase, &context).await.map_err(ChurchEventsError::from)?;
            print_json(&res)
        }
        Commands::Series { id, from, to } => {
            let usecase = GetSeriesOccurrencesUseCase {
                series_id: id,
                start: from,
                end: to,
            };
            let res = execute(usecase, &context).await.map_err(ChurchEventsError::from)?;
            print_json(&res)
        }
        Commands::Upcoming { limit, grouped } => {
            let usecase = GetUpcomingOccurrencesUseCase {
                limit,
                group_recurring: grouped,
            };
            let res = execute(usecase, &context).await.map_err(ChurchEventsError::from)?;
            print_json(&res)
        }
        Commands::Calendar { month } => {
            let usecase = GetCalendarMonthUseCase { month };
            let res = execute(usecase, &context).await.map_err(ChurchEventsError::from)?;
            print_json(&res)
        }
        Commands::Reminders => {
            let res = execute(GetDueRemindersUseCase {}, &context)
                .await
                .map_err(ChurchEventsError::from)?;
            print_json(&res)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
