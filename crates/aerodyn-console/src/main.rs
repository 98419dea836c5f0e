//! AeroDyn control tower binary.

mod app;
mod config;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(
    name = "aerodyn",
    about = "Terminal control tower for the AeroDyn strategic simulation service"
)]
struct Cli {
    /// Base URL of the simulation backend.
    #[arg(long)]
    endpoint: Option<String>,

    /// Path to a console.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log filter, e.g. `warn` or `aerodyn_client=debug`.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they do not fight the TUI on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    tracing::info!(endpoint = %config.endpoint, "starting control tower");
    app::run_console(&config).await
}
