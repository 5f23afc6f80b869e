//! Per-request orchestration: cache check, provider call, bookkeeping.
//!
//! One request moves through `validate → cache get → (hit: done) |
//! (miss: provider → cache put → done)`. A provider failure is terminal:
//! nothing is cached, no counter moves, and the caller must re-initiate.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::analytics::UsageTracker;
use crate::cache::{AnalysisCache, AnalysisPayload};
use crate::error::Result;
use crate::prompts::{self, Category};
use crate::providers::AnalysisProvider;

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Served from the local cache.
    Cache,
    /// Produced by a fresh provider call.
    Live,
}

/// The result of one analysis request.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub payload: AnalysisPayload,
    pub source: Source,
}

/// Coordinates a single analysis request against the cache, the provider,
/// and the usage tracker.
///
/// The cache mutex is held only around `get`/`put`, never across the
/// provider await, so overlapping requests stay safe and a caller
/// abandoning the future leaks no state.
pub struct Analyzer {
    provider: Arc<dyn AnalysisProvider>,
    cache: Mutex<AnalysisCache>,
    tracker: Arc<UsageTracker>,
}

impl Analyzer {
    /// Wire up an analyzer from its three collaborators.
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        cache: AnalysisCache,
        tracker: Arc<UsageTracker>,
    ) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
            tracker,
        }
    }

    /// Run one analysis request.
    ///
    /// Rejects unknown categories before touching the cache or provider.
    /// On a hit the cached payload comes back tagged [`Source::Cache`];
    /// on a miss the provider result is cached and tagged [`Source::Live`].
    pub async fn request(&self, title: &str, author: &str, category: &str) -> Result<Analysis> {
        let category = Category::from_str(category)?;
        let key = AnalysisCache::cache_key(title, author, category);

        if let Some(payload) = self.cache_get(&key) {
            debug!(%category, title, "cache hit");
            self.tracker.record_event(category.as_str(), true);
            return Ok(Analysis {
                payload,
                source: Source::Cache,
            });
        }

        let prompt = prompts::render(category, title, author);
        let content = self.provider.analyze(&prompt).await?;
        info!(%category, title, provider = self.provider.name(), "analysis fetched");

        let payload = AnalysisPayload {
            title: title.to_string(),
            author: author.to_string(),
            category,
            content,
        };
        self.cache_put(key, payload.clone());
        self.tracker.record_event(category.as_str(), false);

        Ok(Analysis {
            payload,
            source: Source::Live,
        })
    }

    /// Drop every expired cache entry. Called once at session start.
    pub fn sweep_expired(&self) -> usize {
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .sweep_expired()
    }

    /// Remove all cached analyses.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    /// Number of cached analyses.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().expect("cache lock poisoned").len()
    }

    /// Stored-at timestamps by key, for status output.
    pub fn cache_index(&self) -> Vec<(String, u64)> {
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .stored_at_index()
    }

    fn cache_get(&self, key: &str) -> Option<AnalysisPayload> {
        self.cache.lock().expect("cache lock poisoned").get(key)
    }

    fn cache_put(&self, key: String, payload: AnalysisPayload) {
        self.cache
            .lock()
            .expect("cache lock poisoned")
            .put(key, payload);
    }
}
