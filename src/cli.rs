//! Command-line interface parsing for parkfinder
//!
//! This module handles parsing of CLI arguments using clap. Every option can
//! also be set through the environment (or a `.env` file), which is how the
//! search API key is normally supplied.

use std::path::PathBuf;

use clap::Parser;

use crate::data::nearby::DEFAULT_SEARCH_URL;

/// Default catalog page listing every state
pub const DEFAULT_CATALOG_URL: &str = "https://www.nps.gov/index.htm";

/// parkfinder - Browse national park sites by state and find places nearby
#[derive(Parser, Debug)]
#[command(name = "parkfinder")]
#[command(about = "Browse national park sites by state and find places near them")]
#[command(version)]
pub struct Cli {
    /// Cache file holding every fetched page and search response
    ///
    /// Defaults to `cache.json` in the platform cache directory
    /// (`~/.cache/parkfinder/` on Linux).
    #[arg(long, value_name = "PATH", env = "PARKFINDER_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Catalog page listing the states
    #[arg(long, value_name = "URL", env = "PARKFINDER_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Endpoint of the nearby-places radius search
    #[arg(long, value_name = "URL", env = "PARKFINDER_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Key for the nearby-places search API
    #[arg(long, value_name = "KEY", env = "MAPQUEST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Keep new cache entries in memory and write them once on exit
    #[arg(long)]
    pub defer_cache_writes: bool,

    /// Log cache hits and requests to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
