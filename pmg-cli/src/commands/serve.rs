//! API server command
//!
//! Runs migrations, loads the sitting-day calendar, starts the periodic
//! tasks and serves the JSON API until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pmg_core::{ParliamentaryCalendar, PmgConfig};
use pmg_server::db::migrations;
use pmg_server::tasks::start_periodic_tasks;
use pmg_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: from config, 127.0.0.1:5001)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip applying pending migrations at startup
    #[arg(long)]
    pub no_migrate: bool,

    /// Sitting-day calendar file, one YYYY-MM-DD per line
    #[arg(long, value_name = "PATH")]
    pub sitting_days: Option<PathBuf>,
}

/// Run the API server
pub async fn run_serve(args: ServeArgs, mut config: PmgConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.api.bind = bind;
    }
    config.api.cors_permissive |= args.cors_permissive;

    let database_url = super::database_url(args.database_url, &config.database.url)?;
    let pool = super::connect(&database_url, config.database.max_connections).await?;

    if args.no_migrate {
        tracing::info!("Skipping migrations");
    } else {
        let applied = migrations::run(&pool).await.context("Failed to apply migrations")?;
        tracing::info!(applied, "Migrations up to date");
    }

    let calendar_path = args.sitting_days.or_else(|| config.calendar.sitting_days_path.clone());
    let calendar = ParliamentaryCalendar::load_or_default(calendar_path.as_deref())
        .context("Failed to load sitting-day calendar")?;
    match calendar.len() {
        Some(days) => tracing::info!(days, "Loaded sitting-day calendar"),
        None => tracing::info!("No sitting-day calendar, counting weekdays"),
    }

    let tasks = start_periodic_tasks(pool.clone(), &config.tasks);

    tracing::info!("Starting API server on {}", config.api.bind);
    let state = AppState::new(pool, &config.api, calendar);
    let result = run_server(state, ServerConfig::from(&config.api))
        .await
        .context("Server error");

    if let Some(tasks) = tasks {
        tasks.shutdown();
    }
    result
}
