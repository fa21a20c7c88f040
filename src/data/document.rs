//! Cached HTTP document fetcher
//!
//! Fetches page bodies by URL and memoizes them in the cache store, keyed by
//! the URL itself.

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheError, CacheStore, Namespace};

/// Errors that can occur when fetching a document
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Cache read/write error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Client for fetching page bodies through the cache
#[derive(Debug, Clone, Default)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Create a new DocumentFetcher with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the body of `url`, from the cache when present
    ///
    /// A non-success response is cached and returned like any other body;
    /// callers find out when the page lacks the structure they expect.
    pub async fn fetch(&self, store: &mut CacheStore, url: &str) -> Result<String, FetchError> {
        let client = &self.client;
        store
            .get_or_fetch(Namespace::Documents, url, move || async move {
                info!(url, "making new request");
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    warn!(url, %status, "non-success response, caching body as-is");
                }
                Ok::<_, FetchError>(response.text().await?)
            })
            .await
    }
}
