use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tripbook::logging::Logging;
use tripbook::Cli;
use tripbook_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logging = Logging::init(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging.apply_level(cli.verbose, &config.logging.level)?;

    debug!(sync = config.sync.enabled, "Configuration loaded");
    tripbook::run(cli, config).await
}
