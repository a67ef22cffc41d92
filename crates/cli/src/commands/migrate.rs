use anyhow::Result;
use tracing::info;

use crate::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    config.require_database()?;

    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    Ok(())
}
