use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vendor_portal::cli::{self, Cli};
use vendor_portal::config::Config;
use vendor_portal::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on a missing backend origin)
    let config = Config::from_env_and_args(cli.backend_url.clone(), cli.page_size)?;

    // Initialize structured logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting vendor portal client v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", config.backend_url);

    let state = AppState::new(config).context("building HTTP client")?;

    cli::run(cli.command, &state).await;

    Ok(())
}
