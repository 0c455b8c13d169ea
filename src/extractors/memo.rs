// src/extractors/memo.rs
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::extractors::numbers::{self, ExtractionResult};

/// LRU cache in front of [`numbers::extract`], keyed by the exact input.
///
/// Owned by the caller; the extraction functions themselves never cache.
#[derive(Debug)]
pub struct MemoizedExtractor {
    /// `None` when created with capacity 0: every call goes straight through.
    cache: Option<LruCache<String, ExtractionResult>>,
    hits: u64,
    misses: u64,
}

impl MemoizedExtractor {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
            misses: 0,
        }
    }

    pub fn extract(&mut self, text: &str) -> ExtractionResult {
        let Some(cache) = self.cache.as_mut() else {
            self.misses += 1;
            return numbers::extract(text);
        };

        if let Some(cached) = cache.get(text) {
            self.hits += 1;
            tracing::trace!("Cache hit for {} byte input", text.len());
            return cached.clone();
        }

        self.misses += 1;
        let result = numbers::extract(text);
        cache.put(text.to_string(), result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
