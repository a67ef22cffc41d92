use anyhow::Result;
use clap::Parser;
use tracing::info;

use lighthouse_sync::cli::Cli;
use lighthouse_sync::{commands, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting Lighthouse sync v{}", env!("CARGO_PKG_VERSION"));

    commands::run(cli.command, &config).await
}
