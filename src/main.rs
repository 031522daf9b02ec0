mod app;
mod classifier;
mod cli;
mod config;
mod domain;
mod infrastructure;
mod input;
mod search;
mod storage;
mod tasks;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let config = config::load_config(args)?;
    let paths = directories::ensure_directories(&config.directories, config.run.debug)?;
    logging::init_tracing(&config.logging, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::CheckerApp::initialize(config, paths, shutdown)?;
    if let Err(err) = app.run().await {
        tracing::error!(error = %format!("{err:#}"), "run aborted");
        return Err(err);
    }
    Ok(())
}
