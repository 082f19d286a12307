//! Memoization of the load pipeline.
//!
//! A [`ConfigCache`] maps a [`CacheKey`] (the canonical form of every load
//! argument) to the document that load produced. The first load for a key runs
//! the pipeline; later loads with an equal key return the stored
//! `Arc<Document>` without touching the filesystem. Entries are never evicted.
//!
//! Caches are plain values owned by the caller. [`ConfigCache::global`] offers
//! a process-wide instance for callers that want one.
//!
//! Two threads racing on a cold key may both run the pipeline; the first
//! result stored wins and both callers receive it.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::DocfigError;
use crate::types::Document;

/// Canonical text of a load request. Equal requests produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(canonical: impl Into<String>) -> Self {
        CacheKey(canonical.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hit/miss counters for a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, Arc<Document>>,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Default)]
pub struct ConfigCache {
    inner: Mutex<Inner>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn global() -> &'static ConfigCache {
        static GLOBAL: OnceLock<ConfigCache> = OnceLock::new();
        GLOBAL.get_or_init(ConfigCache::new)
    }

    /// Return the cached document for `key`, or run `load` and cache its result.
    ///
    /// Errors are not cached; a failed load is retried on the next call.
    pub fn get_or_load<F>(&self, key: CacheKey, load: F) -> Result<Arc<Document>, DocfigError>
    where
        F: FnOnce() -> Result<Document, DocfigError>,
    {
        if let Some(doc) = self.lookup(&key) {
            tracing::debug!(key = key.as_str(), "config cache hit");
            return Ok(doc);
        }

        tracing::debug!(key = key.as_str(), "config cache miss");
        let loaded = Arc::new(load()?);

        let mut inner = self.inner.lock();
        let stored = inner.entries.entry(key).or_insert(loaded);
        Ok(Arc::clone(stored))
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<Document>> {
        let mut inner = self.inner.lock();
        match inner.entries.get(key).cloned() {
            Some(doc) => {
                inner.hits += 1;
                Some(doc)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        *self.inner.lock() = Inner::default();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}
