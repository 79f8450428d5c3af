use chrono::NaiveDate;
use clap::{Args, Subcommand};

use checkin_core::{Outcome, StatusField, StatusKind, StatusUpdater};

use super::{today, Services};

#[derive(Args)]
pub struct DayCommand {
    #[command(subcommand)]
    pub command: DaySubcommand,
}

#[derive(Subcommand)]
pub enum DaySubcommand {
    /// Check an attendee in
    CheckIn {
        /// Attendee unique id (as encoded in their QR badge)
        unique_id: String,

        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record that an attendee collected their kit
    Kit {
        /// Attendee unique id
        unique_id: String,

        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record that an attendee collected lunch
    Lunch {
        /// Attendee unique id
        unique_id: String,

        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Set a single status flag directly
    Set {
        /// Attendee unique id
        unique_id: String,

        /// is_checked_in, has_collected_kit or has_collected_lunch
        #[arg(long)]
        field: StatusField,

        /// true or false
        #[arg(long, action = clap::ArgAction::Set)]
        value: bool,

        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl DayCommand {
    pub async fn run(&self, services: &Services) -> Result<(), Box<dyn std::error::Error>> {
        let updater = StatusUpdater::new(&services.client);

        let (date, outcome) = match &self.command {
            DaySubcommand::CheckIn { unique_id, date } => {
                let date = date.unwrap_or_else(today);
                (date, updater.apply(unique_id, date, StatusKind::CheckIn).await)
            }
            DaySubcommand::Kit { unique_id, date } => {
                let date = date.unwrap_or_else(today);
                (date, updater.apply(unique_id, date, StatusKind::Kit).await)
            }
            DaySubcommand::Lunch { unique_id, date } => {
                let date = date.unwrap_or_else(today);
                (date, updater.apply(unique_id, date, StatusKind::Lunch).await)
            }
            DaySubcommand::Set {
                unique_id,
                field,
                value,
                date,
            } => {
                let date = date.unwrap_or_else(today);
                (date, updater.set_status(unique_id, date, *field, *value).await)
            }
        };

        report(services, date, outcome).await
    }
}

/// Prints the outcome and, on success, the refreshed totals for the day.
async fn report(
    services: &Services,
    date: NaiveDate,
    outcome: Outcome,
) -> Result<(), Box<dyn std::error::Error>> {
    if !outcome.success {
        return Err(outcome.message.into());
    }
    println!("{}", outcome.message);

    // The update already went through; a failed refresh only costs the totals.
    match services.load_roster(Some(date), false).await {
        Ok(()) => {
            println!("\nStats for {}", date);
            println!("{}", "-".repeat(40));
            println!("{}", services.store.stats());
        }
        Err(e) => tracing::warn!("Could not refresh roster after update: {}", e),
    }
    Ok(())
}
