//! Retrieval pipeline over a single cache store
//!
//! `ParkService` owns the cache store for the lifetime of the process and
//! wires the document fetcher, catalog resolver, site extractor and nearby
//! search together.

use tracing::{debug, info};
use url::Url;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::data::{
    extract_site, extract_site_links, resolve_state_url, DocumentFetcher, ExtractionError,
    NearbyClient, NearbyResult, ParkSite, StateCatalogIndex,
};
use crate::error::ParkError;

/// State → park site → nearby places lookups, memoized in one store
#[derive(Debug)]
pub struct ParkService {
    store: CacheStore,
    fetcher: DocumentFetcher,
    nearby: NearbyClient,
    catalog_url: Url,
    catalog_index: Option<StateCatalogIndex>,
}

impl ParkService {
    pub fn new(
        store: CacheStore,
        fetcher: DocumentFetcher,
        nearby: NearbyClient,
        catalog_url: Url,
    ) -> Self {
        Self {
            store,
            fetcher,
            nearby,
            catalog_url,
            catalog_index: None,
        }
    }

    /// Opens the cache file and builds the clients described by `config`
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::load(&config.cache_path).with_write_through(config.write_through);
        info!(
            path = %store.path().display(),
            entries = store.len(),
            "opened cache"
        );

        Self::new(
            store,
            DocumentFetcher::new(),
            NearbyClient::with_base_url(config.api_key.clone(), config.search_url.as_str()),
            config.catalog_url.clone(),
        )
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    async fn load_state_index(&mut self) -> Result<(), ParkError> {
        if self.catalog_index.is_none() {
            let page = self
                .fetcher
                .fetch(&mut self.store, self.catalog_url.as_str())
                .await?;
            let index = StateCatalogIndex::from_html(&page, &self.catalog_url)?;
            debug!(states = index.len(), "built state catalog index");
            self.catalog_index = Some(index);
        }
        Ok(())
    }

    /// The state catalog, read from the catalog page on first use
    pub async fn state_index(&mut self) -> Result<&StateCatalogIndex, ParkError> {
        self.load_state_index().await?;
        Ok(self.catalog_index.get_or_insert_with(StateCatalogIndex::default))
    }

    /// Park sites of `state_name` in catalog order
    ///
    /// Any site page that cannot be read aborts the whole lookup.
    pub async fn sites_for_state(&mut self, state_name: &str) -> Result<Vec<ParkSite>, ParkError> {
        self.load_state_index().await?;
        let index = self
            .catalog_index
            .get_or_insert_with(StateCatalogIndex::default);

        let state_url = resolve_state_url(&mut self.store, index, state_name)?;
        let state_url = Url::parse(&state_url).map_err(|source| ExtractionError::InvalidLink {
            href: state_url.clone(),
            source,
        })?;

        let state_page = self.fetcher.fetch(&mut self.store, state_url.as_str()).await?;
        let links = extract_site_links(&state_page, &state_url)?;
        debug!(state = state_name, sites = links.len(), "found site links");

        let mut sites = Vec::with_capacity(links.len());
        for link in links {
            let site_page = self.fetcher.fetch(&mut self.store, link.as_str()).await?;
            sites.push(extract_site(&site_page)?);
        }
        Ok(sites)
    }

    /// Search response for places near `site`
    pub async fn nearby(&mut self, site: &ParkSite) -> Result<NearbyResult, ParkError> {
        Ok(self.nearby.resolve_nearby(&mut self.store, site).await?)
    }

    /// Persists entries not yet written to disk
    pub fn flush(&mut self) -> Result<(), ParkError> {
        Ok(self.store.flush()?)
    }
}
