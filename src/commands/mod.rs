mod attendee;
mod config_cmd;
mod day;

pub use attendee::AttendeeCommand;
pub use config_cmd::ConfigCommand;
pub use day::DayCommand;

use std::time::Duration;

use chrono::NaiveDate;
use clap::ValueEnum;

use checkin_core::{AttendeeStore, BackendClient, ClientError, LocalMirror, RosterFetcher};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a command needs to talk to the backend and the local cache.
pub struct Services {
    pub client: BackendClient,
    pub store: AttendeeStore,
    pub mirror: LocalMirror,
    pub import_concurrency: usize,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = BackendClient::with_timeout(
            config.backend_url.value.clone(),
            Duration::from_secs(config.request_timeout_secs.value),
        )?;

        Ok(Self {
            client,
            store: AttendeeStore::new(),
            mirror: LocalMirror::new(config.data_dir.value.clone()),
            import_concurrency: config.import_concurrency.value,
        })
    }

    /// Fills the store from the backend and refreshes the mirror, or from
    /// the mirror alone when `offline` is set.
    pub async fn load_roster(
        &self,
        event_date: Option<NaiveDate>,
        offline: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if offline {
            if !self.mirror.restore(&self.store) {
                return Err(format!(
                    "No usable local roster at {}. Run without --offline first.",
                    self.mirror.path().display()
                )
                .into());
            }
            return Ok(());
        }

        RosterFetcher::new(&self.client, &self.store)
            .fetch(event_date)
            .await?;
        if let Err(e) = self.mirror.save_store(&self.store) {
            tracing::warn!("Failed to update local roster: {}", e);
        }
        Ok(())
    }
}

/// Resolves the `--date`/`--roster-only` pair shared by the listing commands.
pub fn event_date(date: Option<NaiveDate>, roster_only: bool) -> Option<NaiveDate> {
    if roster_only {
        None
    } else {
        Some(date.unwrap_or_else(today))
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}
