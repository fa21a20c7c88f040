//! Persistent cache store backed by a single JSON file
//!
//! Provides a `CacheStore` that memoizes remote lookups in memory for the
//! lifetime of the process and writes the whole mapping back to disk, either
//! after every new entry (write-through) or on an explicit `flush`.

use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Logical partition of the cache
///
/// Each namespace is stored in its own table, so equal keys in two namespaces
/// never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Raw document bodies keyed by URL
    Documents,
    /// Catalog URLs keyed by capitalized state name
    States,
    /// Search API responses keyed by park site name
    Nearby,
}

impl Namespace {
    /// Name of the namespace's table in the cache file
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Documents => "documents",
            Namespace::States => "states",
            Namespace::Nearby => "nearby",
        }
    }
}

/// Errors that can occur while persisting or decoding cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing the backing file failed
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store could not be serialized
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A cached value does not have the shape the caller asked for
    #[error("Cached {namespace} entry '{key}' has an unexpected shape: {source}")]
    Decode {
        namespace: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Every namespace, in file order
const NAMESPACES: [Namespace; 3] = [Namespace::Documents, Namespace::States, Namespace::Nearby];

/// On-disk layout: one table per namespace
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
struct CacheFile {
    documents: BTreeMap<String, Value>,
    states: BTreeMap<String, Value>,
    nearby: BTreeMap<String, Value>,
}

impl CacheFile {
    /// Reads the namespace tables, ignoring any other top-level key
    fn from_tables(mut entries: Map<String, Value>) -> Self {
        let mut file = CacheFile::default();
        for namespace in NAMESPACES {
            match entries.remove(namespace.as_str()) {
                Some(Value::Object(table)) => {
                    *file.table_mut(namespace) = table.into_iter().collect();
                }
                Some(_) => {
                    warn!(namespace = namespace.as_str(), "dropping cache table that is not an object");
                }
                None => {}
            }
        }
        for key in entries.keys() {
            warn!(%key, "ignoring unknown top-level cache key");
        }
        file
    }

    /// Sorts a flat single-map cache into namespaces
    ///
    /// URL keys are documents, remaining string values are state URLs and
    /// object values are search responses.
    fn from_flat(entries: Map<String, Value>) -> Self {
        let mut file = CacheFile::default();
        for (key, value) in entries {
            if key.starts_with("http://") || key.starts_with("https://") {
                file.documents.insert(key, value);
            } else if value.is_string() {
                file.states.insert(key, value);
            } else if value.is_object() {
                file.nearby.insert(key, value);
            } else {
                warn!(%key, "dropping legacy cache entry of unknown kind");
            }
        }
        file
    }

    /// A file is namespaced as soon as one namespace table is present
    fn parse(content: &str) -> Option<Self> {
        let Value::Object(entries) = serde_json::from_str::<Value>(content).ok()? else {
            return None;
        };
        let namespaced = NAMESPACES
            .iter()
            .any(|namespace| entries.get(namespace.as_str()).is_some_and(Value::is_object));

        if namespaced {
            Some(Self::from_tables(entries))
        } else {
            debug!(entries = entries.len(), "importing flat cache layout");
            Some(Self::from_flat(entries))
        }
    }

    fn table(&self, namespace: Namespace) -> &BTreeMap<String, Value> {
        match namespace {
            Namespace::Documents => &self.documents,
            Namespace::States => &self.states,
            Namespace::Nearby => &self.nearby,
        }
    }

    fn table_mut(&mut self, namespace: Namespace) -> &mut BTreeMap<String, Value> {
        match namespace {
            Namespace::Documents => &mut self.documents,
            Namespace::States => &mut self.states,
            Namespace::Nearby => &mut self.nearby,
        }
    }
}

/// Memoization table for every remote fetch, persisted to one JSON file
///
/// Entries never expire. Open the store once at startup, hand it to each
/// retrieval component by `&mut`, and `flush` it before exiting.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    entries: CacheFile,
    write_through: bool,
    dirty: bool,
}

impl CacheStore {
    /// Loads the store from `path`
    ///
    /// A missing, unreadable or unparsable file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => CacheFile::parse(&content).unwrap_or_else(|| {
                warn!(path = %path.display(), "cache file is not valid JSON, starting empty");
                CacheFile::default()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no cache file, starting empty");
                CacheFile::default()
            }
        };

        Self {
            path,
            entries,
            write_through: true,
            dirty: false,
        }
    }

    /// Sets whether every new entry is saved immediately (the default)
    ///
    /// With write-through off, entries are kept in memory until `flush`.
    pub fn with_write_through(mut self, write_through: bool) -> Self {
        self.write_through = write_through;
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached value for `key`, if any
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<&Value> {
        self.entries.table(namespace).get(key)
    }

    pub fn contains(&self, namespace: Namespace, key: &str) -> bool {
        self.entries.table(namespace).contains_key(key)
    }

    /// Total number of entries across all namespaces
    pub fn len(&self) -> usize {
        self.entries.documents.len() + self.entries.states.len() + self.entries.nearby.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `value` under `key`, saving the file in write-through mode
    pub fn insert(&mut self, namespace: Namespace, key: &str, value: Value) -> Result<(), CacheError> {
        self.entries
            .table_mut(namespace)
            .insert(key.to_string(), value);
        self.dirty = true;

        if self.write_through {
            self.save()?;
        }
        Ok(())
    }

    /// Writes the whole store to the backing file
    ///
    /// Creates parent directories as needed and replaces the file through a
    /// sibling temporary file.
    pub fn save(&mut self) -> Result<(), CacheError> {
        let json = serde_json::to_string(&self.entries)?;
        let write_err = |source: io::Error| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }

        debug!(path = %self.path.display(), entries = self.len(), "saved cache");
        self.dirty = false;
        Ok(())
    }

    /// Saves the store if entries were added since the last save
    pub fn flush(&mut self) -> Result<(), CacheError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// Returns the cached value for `key`, or awaits `fetch` and caches its result
    ///
    /// `fetch` is not invoked on a hit. A failed `fetch` leaves the store
    /// untouched, so the next call retries it.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &mut self,
        namespace: Namespace,
        key: &str,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.cached::<T>(namespace, key)? {
            return Ok(cached);
        }

        debug!(namespace = namespace.as_str(), key, "cache miss");
        let fetched = fetch().await?;
        self.store(namespace, key, &fetched)?;
        Ok(fetched)
    }

    /// Synchronous form of [`CacheStore::get_or_fetch`]
    pub fn get_or_compute<T, E, F>(
        &mut self,
        namespace: Namespace,
        key: &str,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(cached) = self.cached::<T>(namespace, key)? {
            return Ok(cached);
        }

        debug!(namespace = namespace.as_str(), key, "cache miss");
        let computed = compute()?;
        self.store(namespace, key, &computed)?;
        Ok(computed)
    }

    fn cached<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        let Some(value) = self.get(namespace, key) else {
            return Ok(None);
        };

        debug!(namespace = namespace.as_str(), key, "using cache");
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| CacheError::Decode {
                namespace: namespace.as_str(),
                key: key.to_string(),
                source,
            })
    }

    fn store<T: Serialize>(&mut self, namespace: Namespace, key: &str, data: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(data)?;
        self.insert(namespace, key, value)
    }
}
