//! Runtime configuration derived from CLI arguments
//!
//! Validates the URLs given on the command line and picks the default cache
//! location when none is given.

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;

/// Cache file name inside the platform cache directory
const CACHE_FILE_NAME: &str = "cache.json";

/// Error types for turning CLI arguments into a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL option could not be parsed
    #[error("Invalid {option} '{value}': {source}")]
    InvalidUrl {
        option: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// No home directory to derive the default cache location from
    #[error("Could not determine a cache directory; pass --cache-file")]
    NoCacheDir,
}

/// Configuration for a parkfinder session
#[derive(Debug, Clone)]
pub struct Config {
    pub cache_path: PathBuf,
    pub catalog_url: Url,
    pub search_url: Url,
    pub api_key: Option<String>,
    /// Save the cache after every new entry instead of once on exit
    pub write_through: bool,
}

/// Default cache file in the XDG-compliant cache directory
///
/// Uses `~/.cache/parkfinder/cache.json` on Linux, or the equivalent path on
/// other platforms. Returns `None` when there is no home directory.
pub fn default_cache_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "parkfinder")?;
    Some(project_dirs.cache_dir().join(CACHE_FILE_NAME))
}

fn parse_url(option: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        option,
        value: value.to_string(),
        source,
    })
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with validated URLs and a cache path
    /// * `Err(ConfigError)` if a URL is invalid or no cache path can be found
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let cache_path = match &cli.cache_file {
            Some(path) => path.clone(),
            None => default_cache_path().ok_or(ConfigError::NoCacheDir)?,
        };

        Ok(Config {
            cache_path,
            catalog_url: parse_url("--catalog-url", &cli.catalog_url)?,
            search_url: parse_url("--search-url", &cli.search_url)?,
            api_key: cli.api_key.clone().filter(|key| !key.trim().is_empty()),
            write_through: !cli.defer_cache_writes,
        })
    }
}
