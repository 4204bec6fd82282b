//! Admin report commands
//!
//! `list` needs no database. `run` prints the result set as JSON, or
//! writes a workbook with `--xlsx`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pmg_core::{ParliamentaryCalendar, PmgConfig};
use pmg_server::ReportRegistry;

#[derive(Parser, Debug)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommands,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List the available reports
    List,
    /// Run a report by id
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Report id (see `pmg report list`)
    pub id: u32,

    /// Write an xlsx workbook to this path instead of printing JSON
    #[arg(long, value_name = "PATH")]
    pub xlsx: Option<PathBuf>,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_report(args: ReportArgs, config: PmgConfig) -> Result<()> {
    let registry = ReportRegistry::standard();

    match args.command {
        ReportCommands::List => {
            for report in registry.iter() {
                println!("{:>3}  {}", report.id, report.name);
                println!("     {}", report.description);
            }
        }
        ReportCommands::Run(run) => {
            let report = registry.find(run.id)?;

            let database_url = super::database_url(run.database_url, &config.database.url)?;
            let pool = super::connect(&database_url, 1).await?;
            let calendar = ParliamentaryCalendar::load_or_default(config.calendar.sitting_days_path.as_deref())
                .context("Failed to load sitting-day calendar")?;

            match run.xlsx {
                Some(path) => {
                    let bytes = report.as_xlsx(&pool, &calendar).await?;
                    tokio::fs::write(&path, bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {} to {}", report.name, path.display());
                }
                None => {
                    let results = report.run(&pool, &calendar).await?;
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            }
        }
    }
    Ok(())
}
