//! Bounded least-recently-used memo of transcript text by video id.

use std::future::Future;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::{debug, trace};

use crate::error::TranscriptResult;

/// Default number of transcripts kept per process.
pub const DEFAULT_CAPACITY: usize = 32;

/// Thread-safe LRU memo backed by Moka.
///
/// Transcripts never change for a given id within a session, so entries are
/// only ever evicted for space. Failed lookups are never stored.
#[derive(Debug, Clone)]
pub struct TranscriptCache {
    capacity: usize,
    // None when the capacity is 0
    cache: Option<Cache<String, String>>,
}

impl Default for TranscriptCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TranscriptCache {
    /// Create a cache holding at most `capacity` entries (0 disables caching).
    pub fn new(capacity: usize) -> Self {
        let cache = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity as u64)
                .eviction_policy(EvictionPolicy::lru())
                .build()
        });
        Self { capacity, cache }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored transcripts, after applying pending evictions.
    pub async fn len(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a transcript, marking it most recently used.
    pub async fn get(&self, video_id: &str) -> Option<String> {
        self.cache.as_ref()?.get(video_id).await
    }

    pub async fn insert(&self, video_id: impl Into<String>, text: impl Into<String>) {
        if let Some(cache) = &self.cache {
            cache.insert(video_id.into(), text.into()).await;
        }
    }

    /// Return the memoized transcript or run `fetch` to produce it.
    ///
    /// Concurrent calls for the same id share a single `fetch`. Only `Ok`
    /// results are stored; an error is handed to every waiting caller.
    pub async fn get_or_fetch<F>(&self, video_id: &str, fetch: F) -> TranscriptResult<String>
    where
        F: Future<Output = TranscriptResult<String>>,
    {
        let Some(cache) = &self.cache else {
            return fetch.await;
        };

        trace!(video_id, "Transcript memo lookup");
        let text = cache
            .try_get_with(video_id.to_string(), fetch)
            .await
            .map_err(|e| e.as_ref().clone())?;

        debug!(video_id, "Transcript memo resolved");
        Ok(text)
    }
}
