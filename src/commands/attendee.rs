use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use checkin_core::{
    export_filename, generate_qr_code, qr_payload, render_png, to_csv, Attendee, RosterImporter,
    RosterSnapshot,
};

use super::{event_date, today, truncate, OutputFormat, Services};

#[derive(Args)]
pub struct AttendeeCommand {
    #[command(subcommand)]
    pub command: AttendeeSubcommand,
}

#[derive(Subcommand)]
pub enum AttendeeSubcommand {
    /// Import a roster CSV (columns: Name, Email, Phone, Role)
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },

    /// List attendees with their status for one day
    List {
        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Show the roster only, without any day's status
        #[arg(long, conflicts_with = "date")]
        roster_only: bool,

        /// Read the local roster instead of the backend
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show check-in, kit and lunch totals for one day
    Stats {
        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Read the local roster instead of the backend
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Export attendees to event-attendees-<today>.csv
    Export {
        /// Event date whose status is exported (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Export the roster only, without any day's status
        #[arg(long, conflicts_with = "date")]
        roster_only: bool,

        /// Read the local roster instead of the backend
        #[arg(long)]
        offline: bool,

        /// Directory to write the file into
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },

    /// Show one attendee and their status for one day
    Show {
        /// Attendee unique id
        unique_id: String,

        /// Event date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Render an attendee's badge QR code
    Qr {
        /// Attendee unique id
        unique_id: String,

        /// Write a PNG here instead of printing a data URI
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Remove an attendee from the backend
    Remove {
        /// Attendee unique id
        unique_id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl AttendeeCommand {
    pub async fn run(&self, services: &Services) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AttendeeSubcommand::Import { file } => {
                let outcome = RosterImporter::new(&services.client, &services.store, &services.mirror)
                    .with_concurrency(services.import_concurrency)
                    .import_file(file)
                    .await;

                if !outcome.success {
                    return Err(outcome.message.into());
                }
                println!("{}", outcome.message);
                Ok(())
            }

            AttendeeSubcommand::List {
                date,
                roster_only,
                offline,
                format,
            } => {
                services
                    .load_roster(event_date(*date, *roster_only), *offline)
                    .await?;
                let snapshot = services.store.snapshot();

                if snapshot.attendees.is_empty() {
                    println!("No attendees found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(snapshot.attendees.as_slice())?
                        );
                    }
                    OutputFormat::Text => print_table(&snapshot),
                }
                Ok(())
            }

            AttendeeSubcommand::Stats {
                date,
                offline,
                format,
            } => {
                let date = date.unwrap_or_else(today);
                services.load_roster(Some(date), *offline).await?;
                let stats = services.store.stats();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    }
                    OutputFormat::Text => {
                        if *offline {
                            println!("Stats (local roster)");
                        } else {
                            println!("Stats for {}", date);
                        }
                        println!("{}", "-".repeat(40));
                        println!("{}", stats);
                    }
                }
                Ok(())
            }

            AttendeeSubcommand::Export {
                date,
                roster_only,
                offline,
                output,
            } => {
                services
                    .load_roster(event_date(*date, *roster_only), *offline)
                    .await?;
                let attendees = services.store.attendees();
                let csv = to_csv(&attendees)?;

                std::fs::create_dir_all(output)?;
                let path = output.join(export_filename(today()));
                std::fs::write(&path, csv)?;

                println!(
                    "Exported {} attendee(s) to {}",
                    attendees.len(),
                    path.display()
                );
                Ok(())
            }

            AttendeeSubcommand::Show {
                unique_id,
                date,
                format,
            } => {
                let record = match services.client.get_attendee(unique_id).await? {
                    Some(record) => record,
                    None => return Err(format!("Attendee not found: {}", unique_id).into()),
                };
                let date = date.unwrap_or_else(today);
                let day = services.client.get_attendee_event(unique_id, date).await?;
                let attendee = Attendee::from_record_for_day(record, day.as_ref());

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&attendee)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", attendee);
                        println!("\nStatus shown for {}", date);
                    }
                }
                Ok(())
            }

            AttendeeSubcommand::Qr { unique_id, output } => {
                let payload = qr_payload(unique_id);

                match output {
                    Some(path) => {
                        let png = render_png(&payload)?;
                        std::fs::write(path, png)?;
                        println!("Wrote QR code for {} to {}", unique_id, path.display());
                    }
                    None => {
                        let uri = generate_qr_code(&payload);
                        if uri.is_empty() {
                            return Err(format!("Failed to generate QR code for {}", unique_id).into());
                        }
                        println!("{}", uri);
                    }
                }
                Ok(())
            }

            AttendeeSubcommand::Remove { unique_id, force } => {
                let record = match services.client.get_attendee(unique_id).await? {
                    Some(record) => record,
                    None => return Err(format!("Attendee not found: {}", unique_id).into()),
                };

                // Confirm deletion unless --force is used
                if !force {
                    print!("Remove attendee '{}' ({})? [y/N] ", record.name, unique_id);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Removal cancelled.");
                        return Ok(());
                    }
                }

                services.client.delete_attendee(unique_id).await?;
                forget_locally(services, unique_id);
                println!("Removed attendee: {}", record.name);
                Ok(())
            }
        }
    }
}

fn print_table(snapshot: &RosterSnapshot) {
    println!(
        "{:<36}  {:<24}  {:<10}  {:<7}  {:<4}  LUNCH",
        "UNIQUE ID", "NAME", "ROLE", "CHECKED", "KIT"
    );
    println!("{}", "-".repeat(100));
    for a in snapshot.attendees.iter() {
        println!(
            "{:<36}  {:<24}  {:<10}  {:<7}  {:<4}  {}",
            truncate(&a.unique_id, 36),
            truncate(&a.name, 24),
            truncate(&a.role, 10),
            mark(a.is_checked_in),
            mark(a.has_collected_kit),
            mark(a.has_collected_lunch)
        );
    }
    println!(
        "\nTotal: {} attendee(s), {} checked in",
        snapshot.stats.total_attendees, snapshot.stats.checked_in
    );
}

fn mark(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

/// Drops a removed attendee from the local roster, if one is cached.
fn forget_locally(services: &Services, unique_id: &str) {
    match services.mirror.load() {
        Ok(Some(mut cached)) => {
            cached.retain(|a| a.unique_id != unique_id);
            if let Err(e) = services.mirror.save(&cached) {
                tracing::warn!("Failed to update local roster: {}", e);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to read local roster: {}", e),
    }
}
