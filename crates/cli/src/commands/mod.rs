//! Subcommand handlers.

pub mod audit;
pub mod import;
pub mod migrate;
pub mod pull;

use anyhow::Result;

use crate::cli::Command;
use crate::config::Config;

/// Dispatch a parsed subcommand.
pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Import(args) => import::run(args, config).await,
        Command::Pull(args) => pull::run(args, config).await,
        Command::Audit(args) => audit::run(args, config).await,
        Command::Migrate => migrate::run(config).await,
    }
}
