use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{AttendeeCommand, ConfigCommand, DayCommand, Services};
use config::Config;

#[derive(Parser)]
#[command(name = "checkin")]
#[command(version)]
#[command(about = "Event check-in admin: rosters, badges and day status", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the attendee roster
    Attendee(AttendeeCommand),

    /// Record check-in, kit and lunch for an event day
    Day(DayCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    init_logging(&config);

    match cli.command {
        Some(Commands::Attendee(cmd)) => {
            let services = Services::from_config(&config)?;
            cmd.run(&services).await?;
        }
        Some(Commands::Day(cmd)) => {
            let services = Services::from_config(&config)?;
            cmd.run(&services).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// RUST_LOG wins over the configured level. Logs go to stderr.
fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.value.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
