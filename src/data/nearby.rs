//! Nearby-places search API client
//!
//! Queries the geolocation radius search for places around a park site's
//! postal code. Responses are cached verbatim under the site's name.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::{NearbyResult, ParkSite};
use crate::cache::{CacheError, CacheStore, Namespace};

/// Default endpoint of the radius search
pub const DEFAULT_SEARCH_URL: &str = "http://www.mapquestapi.com/search/v2/radius";

/// Search radius around the origin, in miles
const SEARCH_RADIUS_MILES: u32 = 10;

/// Maximum number of places returned per site
const MAX_MATCHES: u32 = 10;

/// Errors that can occur when looking up nearby places
#[derive(Debug, Error)]
pub enum NearbyError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The response body or a result entry is not the expected JSON
    #[error("Failed to parse search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response has no `searchResults` field
    #[error("Search response has no searchResults")]
    MissingResults,

    /// No API key is configured and the response is not cached
    #[error("No search API key configured (set MAPQUEST_API_KEY or pass --api-key)")]
    MissingApiKey,

    /// Cache read/write error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Client for the nearby-places search API
#[derive(Debug, Clone)]
pub struct NearbyClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl NearbyClient {
    /// Creates a new NearbyClient against the default endpoint
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_SEARCH_URL)
    }

    /// Creates a new NearbyClient with a custom endpoint
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Query parameters for a search around `site`
    fn query(api_key: &str, site: &ParkSite) -> [(&'static str, String); 6] {
        [
            ("key", api_key.to_string()),
            ("origin", site.zipcode.clone()),
            ("radius", SEARCH_RADIUS_MILES.to_string()),
            ("maxMatches", MAX_MATCHES.to_string()),
            ("ambiguities", "ignore".to_string()),
            ("outFormat", "json".to_string()),
        ]
    }

    /// Returns the search response for places near `site`
    ///
    /// Cached in the `Nearby` namespace under `site.name`. The response is not
    /// inspected; errors reported inside the JSON are cached like results.
    pub async fn resolve_nearby(
        &self,
        store: &mut CacheStore,
        site: &ParkSite,
    ) -> Result<NearbyResult, NearbyError> {
        let client = &self.http_client;
        let base_url = self.base_url.as_str();
        let api_key = self.api_key.as_deref();

        store
            .get_or_fetch(Namespace::Nearby, &site.name, move || async move {
                let api_key = api_key.ok_or(NearbyError::MissingApiKey)?;
                info!(site = %site.name, origin = %site.zipcode, "making new request");

                let body = client
                    .get(base_url)
                    .query(&Self::query(api_key, site))
                    .send()
                    .await?
                    .text()
                    .await?;
                let value: Value = serde_json::from_str(&body)?;
                Ok::<_, NearbyError>(NearbyResult(value))
            })
            .await
    }
}
