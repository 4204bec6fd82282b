//! Subcommand implementations

pub mod migrate;
pub mod report;
pub mod serve;
pub mod web;

pub use migrate::run_migrate;
pub use report::run_report;
pub use serve::run_serve;
pub use web::run_web;

use anyhow::{Context, Result};
use pmg_server::db::create_pool_with_options;
use sqlx::PgPool;

/// Database URL from the flag, falling back to config (which already
/// honours `DATABASE_URL`).
pub(crate) fn database_url(flag: Option<String>, configured: &str) -> Result<String> {
    flag.or_else(|| Some(configured.to_string()))
        .filter(|url| !url.is_empty())
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or config/pmg.toml")
}

pub(crate) async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    create_pool_with_options(database_url, max_connections.max(1))
        .await
        .context("Failed to create database pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_config() {
        let url = database_url(Some("postgres://flag/pmg".into()), "postgres://config/pmg").unwrap();
        assert_eq!(url, "postgres://flag/pmg");
    }

    #[test]
    fn falls_back_to_config() {
        let url = database_url(None, "postgres://config/pmg").unwrap();
        assert_eq!(url, "postgres://config/pmg");
    }

    #[test]
    fn empty_url_is_an_error() {
        assert!(database_url(None, "").is_err());
    }
}
