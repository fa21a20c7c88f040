//! Service-level error type
//!
//! Wraps the per-module errors and classifies them so the interactive shell
//! can decide whether to re-prompt or give up.

use thiserror::Error;

use crate::cache::CacheError;
use crate::data::{CatalogError, ExtractionError, FetchError, NearbyError};

/// How a failure should be handled by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or file I/O failure; not retried
    Transient,
    /// A page or response lacks the structure we read from; aborts the lookup
    Structural,
    /// The operator asked for something that does not exist
    UserInput,
}

/// Errors returned by [`crate::service::ParkService`]
#[derive(Debug, Error)]
pub enum ParkError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Nearby(#[from] NearbyError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ParkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkError::Fetch(FetchError::RequestFailed(_)) => ErrorKind::Transient,
            ParkError::Fetch(FetchError::Cache(e)) => cache_kind(e),
            ParkError::Extraction(_) => ErrorKind::Structural,
            ParkError::Catalog(CatalogError::UnknownState(_)) => ErrorKind::UserInput,
            ParkError::Catalog(CatalogError::Cache(e)) => cache_kind(e),
            ParkError::Nearby(NearbyError::RequestFailed(_)) => ErrorKind::Transient,
            ParkError::Nearby(NearbyError::Decode(_) | NearbyError::MissingResults) => {
                ErrorKind::Structural
            }
            ParkError::Nearby(NearbyError::MissingApiKey) => ErrorKind::UserInput,
            ParkError::Nearby(NearbyError::Cache(e)) => cache_kind(e),
            ParkError::Cache(e) => cache_kind(e),
        }
    }
}

fn cache_kind(error: &CacheError) -> ErrorKind {
    match error {
        CacheError::Write { .. } | CacheError::Serialize(_) => ErrorKind::Transient,
        CacheError::Decode { .. } => ErrorKind::Structural,
    }
}
