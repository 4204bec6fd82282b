//! pmg CLI - PMG parliamentary monitor
//!
//! - `serve`: JSON API with admin reports and background tasks
//! - `web`: HTML frontend rendered from the API
//! - `migrate`: apply database migrations
//! - `report`: list admin reports, run one to JSON or xlsx

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pmg_core::PmgConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "pmg",
    author,
    version,
    about = "Parliamentary monitoring: JSON API, HTML frontend and admin reports",
    long_about = "Serve committee meetings, bills, members, hansards and question replies \
                  as a JSON API and an HTML site, and run the admin SQL reports."
)]
struct Cli {
    /// Debug logging (when RUST_LOG is not set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the JSON API server
    Serve(commands::serve::ServeArgs),
    /// Run the HTML frontend
    Web(commands::web::WebArgs),
    /// Apply pending database migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Admin reports (list, run)
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config = PmgConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Web(args) => commands::run_web(args, config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, config).await?,
        Commands::Report(args) => commands::run_report(args, config).await?,
    }
    Ok(())
}
