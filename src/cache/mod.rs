//! Cache module for memoizing remote lookups on disk
//!
//! This module provides a single persistent store that maps namespaced string
//! keys to JSON values. Entries never expire; every fetch that succeeds once is
//! served from the store on later runs until the backing file is removed.

mod store;

pub use store::{CacheError, CacheStore, Namespace};
