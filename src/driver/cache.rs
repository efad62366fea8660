//! Result caching
//!
//! Two tiers: an external shared cache behind the `CacheStorage` trait,
//! and a local per-process map for duplicate queries, consulted only when
//! no external tier is configured or the external tier misses. Both tiers
//! key by the query's explicit cache key; there is no transactional
//! guarantee across them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::result::ResultSet;

/// External shared result cache.
pub trait CacheStorage {
    /// Returns true if the key is present
    fn has(&self, key: &str) -> bool;

    /// Fetches a cached result
    fn get(&self, key: &str) -> Option<Arc<ResultSet>>;

    /// Stores a result for the given lifetime
    fn set(&mut self, key: &str, value: Arc<ResultSet>, ttl: Option<Duration>);
}

/// Local per-process duplicate-query cache.
///
/// Lives for the driver's lifetime; entries have no expiry because the
/// external tier is the one carrying lifetimes.
#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<String, Arc<ResultSet>>,
}

impl QueryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is present
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Fetches a cached result
    pub fn get(&self, key: &str) -> Option<Arc<ResultSet>> {
        self.entries.get(key).cloned()
    }

    /// Stores a result
    pub fn set(&mut self, key: impl Into<String>, value: Arc<ResultSet>) {
        self.entries.insert(key.into(), value);
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
