//! parkfinder - Browse national park sites by state and find places nearby
//!
//! An interactive prompt that lists the park sites of a state and the places
//! around a chosen site. Every page and search response is cached on disk, so
//! repeated lookups work without the network.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use parkfinder::app::App;
use parkfinder::cli::Cli;
use parkfinder::config::Config;
use parkfinder::service::ParkService;

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` overrides the default level (`warn`, or `debug` with
/// `--verbose`). Logs go to stderr so they never mix with the listings.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(&cli)?;
    info!(cache = %config.cache_path.display(), "parkfinder starting");

    let service = ParkService::from_config(&config);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut app = App::new(service, stdin, io::stdout());

    app.run().await.context("parkfinder stopped")?;

    info!("parkfinder shutting down");
    Ok(())
}
