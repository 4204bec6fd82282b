//! Frontend server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use pmg_core::PmgConfig;
use pmg_web::{run_web as serve_frontend, WebState};

/// Arguments for the web command
#[derive(Parser, Debug)]
pub struct WebArgs {
    /// Address to bind to (default: from config, 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Base URL of the JSON API
    #[arg(long, env = "PMG_API_HOST")]
    pub api_host: Option<String>,
}

/// Run the HTML frontend
pub async fn run_web(args: WebArgs, mut config: PmgConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.web.bind = bind;
    }
    if let Some(api_host) = args.api_host {
        config.web.api_host = api_host;
    }

    let state = WebState::new(&config.web, &config.analytics).context("Failed to build HTTP client")?;

    tracing::info!("Starting frontend on {}", config.web.bind);
    serve_frontend(state, config.web.bind)
        .await
        .context("Frontend server error")?;

    Ok(())
}
