mod commands;
mod routes;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use csvcal_core::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvcal")]
#[command(about = "Serve CSV event lists as iCalendar feeds")]
struct Cli {
    /// Config file (defaults to ./csvcal.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve all calendars in the data directory over HTTP (default)
    Serve,
    /// Print the ICS document of one calendar to stdout
    Render {
        /// Calendar name, i.e. the CSV file name without extension
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(settings).await,
        Commands::Render { name } => commands::render::run(settings, &name).await,
    }
}
