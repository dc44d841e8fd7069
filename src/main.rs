use std::path::Path;

use anyhow::Result;
use clap::Parser;

use gramline::cli::{Cli, Commands};
use gramline::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref().map(Path::new))?;

    match cli.command {
        Commands::Poll => gramline::cli::poll::run(config).await,
        Commands::Webhook => gramline::cli::webhook::run(config).await,
        Commands::FetchOnce => gramline::cli::fetch::run(config).await,
    }
}
