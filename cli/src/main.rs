// Stock Guardian command line entry point
use anyhow::Result;
use clap::Parser;
use engine::GuardianClient;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    tracing::debug!(base_url = %config.settings.base_url, "Starting Stock Guardian client");
    let client = GuardianClient::from_settings(config.settings.clone())?;
    commands::run(args.command, &config, &client).await
}
