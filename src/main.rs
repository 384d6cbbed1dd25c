mod auth;
mod cli;
mod config;
mod error;
mod orchestrator;
mod providers;
mod report;
mod summary;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting hwaudit - weekly homework commit audit");
    cli.execute().await?;

    Ok(())
}
