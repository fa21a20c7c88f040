//! State catalog index and state URL resolution
//!
//! The top-level catalog page lists every state with a link to its park
//! listing. That list is read into a [`StateCatalogIndex`] once per process;
//! resolved state URLs are memoized in the cache under the capitalized state
//! name.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::html::{find, selector, text_of, ExtractionError};
use crate::cache::{CacheError, CacheStore, Namespace};

static STATE_DROPDOWN: LazyLock<Selector> =
    LazyLock::new(|| selector(".dropdown-menu.SearchBar-keywordSearch"));
static STATE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// Errors that can occur when resolving a state
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The state is not listed in the catalog
    #[error("Unknown state: '{0}'")]
    UnknownState(String),

    /// Cache read/write error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Lower-cased state name → catalog URL, read from the catalog page
///
/// Held in memory only; rebuilt on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateCatalogIndex {
    states: BTreeMap<String, String>,
}

impl StateCatalogIndex {
    /// Reads the state dropdown of the catalog page
    ///
    /// Relative links are resolved against `base_url`.
    pub fn from_html(index_page: &str, base_url: &Url) -> Result<Self, ExtractionError> {
        let document = Html::parse_document(index_page);
        let dropdown = find(&document, &STATE_DROPDOWN, "state dropdown")?;

        let mut states = BTreeMap::new();
        for item in dropdown.select(&STATE_ITEM) {
            let Some(link) = item.select(&LINK).next() else {
                continue;
            };
            let href = link.value().attr("href").unwrap_or_default();
            let url = base_url
                .join(href)
                .map_err(|source| ExtractionError::InvalidLink {
                    href: href.to_string(),
                    source,
                })?;
            states.insert(text_of(link).to_lowercase(), url.to_string());
        }

        Ok(Self { states })
    }

    /// Catalog URL for `state_name`, matched case-insensitively
    pub fn url_for(&self, state_name: &str) -> Option<&str> {
        self.states
            .get(&state_name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, state_name: &str) -> bool {
        self.url_for(state_name).is_some()
    }

    /// Lower-cased state names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(String, String)> for StateCatalogIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            states: iter
                .into_iter()
                .map(|(name, url)| (name.trim().to_lowercase(), url))
                .collect(),
        }
    }
}

/// Upper-cases the first character and lower-cases the rest
///
/// `"new york"` becomes `"New york"`. This is the cache key for state URLs.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Returns the catalog URL for `state_name`
///
/// Cached in the `States` namespace under [`capitalize`]`(state_name)`. On a
/// miss the state is looked up in `catalog_index`; an unknown state leaves the
/// cache untouched.
pub fn resolve_state_url(
    store: &mut CacheStore,
    catalog_index: &StateCatalogIndex,
    state_name: &str,
) -> Result<String, CatalogError> {
    let state_name = state_name.trim();
    store.get_or_compute(Namespace::States, &capitalize(state_name), || {
        catalog_index
            .url_for(state_name)
            .map(str::to_string)
            .ok_or_else(|| CatalogError::UnknownState(state_name.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const INDEX_PAGE: &str = r#"
        <html><body>
          <div class="dropdown">
            <ul class="dropdown-menu SearchBar-keywordSearch">
              <li><a href="/state/al/index.htm">Alabama</a></li>
              <li><a href="/state/mi/index.htm"> Michigan </a></li>
              <li><a href="/state/ny/index.htm">New York</a></li>
              <li>Spacer without link</li>
            </ul>
          </div>
        </body></html>
    "#;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::load(temp_dir.path().join("cache.json"));
        (store, temp_dir)
    }

    fn michigan_index() -> StateCatalogIndex {
        [("michigan".to_string(), "https://x/state/mi".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("michigan"), "Michigan");
        assert_eq!(capitalize("MICHIGAN"), "Michigan");
        assert_eq!(capitalize("new york"), "New york");
        assert_eq!(capitalize("New York"), "New york");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_from_html_reads_state_links() {
        let base = Url::parse("https://www.nps.gov/index.htm").unwrap();

        let index = StateCatalogIndex::from_html(INDEX_PAGE, &base).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.url_for("michigan"),
            Some("https://www.nps.gov/state/mi/index.htm")
        );
        assert_eq!(
            index.url_for("New York"),
            Some("https://www.nps.gov/state/ny/index.htm")
        );
        assert_eq!(
            index.names().collect::<Vec<_>>(),
            vec!["alabama", "michigan", "new york"]
        );
    }

    #[test]
    fn test_from_html_without_dropdown_fails() {
        let base = Url::parse("https://www.nps.gov/index.htm").unwrap();

        let result = StateCatalogIndex::from_html("<html><body><ul></ul></body></html>", &base);

        assert!(matches!(
            result,
            Err(ExtractionError::MissingAnchor("state dropdown"))
        ));
    }

    #[test]
    fn test_url_for_is_case_insensitive() {
        let index = michigan_index();
        assert!(index.contains("Michigan"));
        assert!(index.contains("  MICHIGAN "));
        assert!(!index.contains("Ohio"));
    }

    #[test]
    fn test_resolve_state_url_caches_under_capitalized_name() {
        let (mut store, _temp_dir) = create_test_store();

        let url = resolve_state_url(&mut store, &michigan_index(), "michigan").unwrap();

        assert_eq!(url, "https://x/state/mi");
        assert_eq!(
            store.get(Namespace::States, "Michigan"),
            Some(&serde_json::json!("https://x/state/mi"))
        );
        assert!(!store.contains(Namespace::States, "michigan"));
    }

    #[test]
    fn test_resolve_state_url_prefers_cache() {
        let (mut store, _temp_dir) = create_test_store();
        store
            .insert(Namespace::States, "Michigan", serde_json::json!("https://cached/mi"))
            .unwrap();

        let url = resolve_state_url(&mut store, &StateCatalogIndex::default(), "MICHIGAN").unwrap();

        assert_eq!(url, "https://cached/mi");
    }

    #[test]
    fn test_resolve_unknown_state_leaves_cache_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("cache.json");
        fs::write(&cache_path, "{}").unwrap();
        let mut store = CacheStore::load(&cache_path);

        let result = resolve_state_url(&mut store, &michigan_index(), "Atlantis");

        assert!(matches!(result, Err(CatalogError::UnknownState(ref s)) if s == "Atlantis"));
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(&cache_path).unwrap(), "{}");
    }
}
