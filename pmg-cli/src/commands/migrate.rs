//! Database migration command

use anyhow::{Context, Result};
use clap::Parser;
use pmg_core::PmgConfig;
use pmg_server::db::migrations;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: PmgConfig) -> Result<()> {
    let database_url = super::database_url(args.database_url, &config.database.url)?;
    let pool = super::connect(&database_url, 1).await?;

    let applied = migrations::run(&pool).await.context("Failed to apply migrations")?;
    if applied == 0 {
        println!("Database is up to date");
    } else {
        println!("Applied {} migration(s)", applied);
    }
    Ok(())
}
