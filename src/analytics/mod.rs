//! Usage analytics: cache-hit / provider-call counters with per-category
//! totals.
//!
//! The aggregate persists indefinitely to `<data dir>/analytics/usage.json`
//! (best-effort; write errors are logged and ignored). If the file cannot
//! be loaded the tracker starts zero-valued. Every mutation goes through
//! [`UsageTracker::record_event`], which keeps the invariant
//! `cache_hits + api_calls == sum(categories)`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MetaError;

/// The persisted analytics aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Requests served from the cache, across all categories.
    pub cache_hits: u64,
    /// Requests that reached the provider, across all categories.
    pub api_calls: u64,
    /// Per-category request counts; hits and calls share one counter.
    pub categories: HashMap<String, u64>,
}

impl UsageStats {
    /// Total analyses performed. Always equals the category sum.
    pub fn total(&self) -> u64 {
        self.cache_hits + self.api_calls
    }
}

/// Thread-safe, persisted usage counters.
///
/// Internal `Mutex` serializes read-modify-write cycles so overlapping
/// requests cannot corrupt the counters. Persists after every
/// `record_event` outside the critical section.
pub struct UsageTracker {
    state: Mutex<UsageStats>,
    path: PathBuf,
}

impl UsageTracker {
    /// Open the tracker backed by `path`, loading any existing aggregate.
    ///
    /// A missing or malformed file starts the aggregate zero-valued.
    pub fn open(path: PathBuf) -> Self {
        let state = load_state(&path);
        Self {
            state: Mutex::new(state),
            path,
        }
    }

    /// Canonical analytics file location under the given data dir.
    pub fn path_under(data_dir: &Path) -> PathBuf {
        data_dir.join("analytics").join("usage.json")
    }

    /// Record one analysis event.
    ///
    /// Increments `cache_hits` or `api_calls` depending on `cache_hit`,
    /// and the category counter (created at 0 first if absent). Any
    /// string is a valid category key.
    pub fn record_event(&self, category: &str, cache_hit: bool) {
        let mut guard = self.state.lock().expect("usage state lock poisoned");
        if cache_hit {
            guard.cache_hits += 1;
        } else {
            guard.api_calls += 1;
        }
        *guard.categories.entry(category.to_string()).or_insert(0) += 1;

        // Persist best-effort; drop the guard first to keep the critical
        // section short.
        let snapshot = guard.clone();
        drop(guard);
        persist_state(&self.path, &snapshot);
    }

    /// Point-in-time copy of the aggregate. The caller cannot mutate
    /// tracker state through the returned value.
    pub fn snapshot(&self) -> UsageStats {
        self.state
            .lock()
            .expect("usage state lock poisoned")
            .clone()
    }
}

/// Load the aggregate from JSON; zero-valued on any error.
fn load_state(path: &Path) -> UsageStats {
    let data = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return UsageStats::default(),
        Err(e) => {
            warn!("failed to read usage analytics, starting at zero: {}", e);
            return UsageStats::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(stats) => stats,
        Err(e) => {
            warn!("usage analytics file is corrupt, starting at zero: {}", e);
            UsageStats::default()
        }
    }
}

/// Persist the aggregate to `path`. Failures are logged and absorbed;
/// the in-memory update stays visible for the rest of the session.
fn persist_state(path: &Path, state: &UsageStats) {
    if let Err(e) = try_persist(path, state) {
        warn!("{}", e);
    }
}

fn try_persist(path: &Path, state: &UsageStats) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| MetaError::Storage(format!("analytics dir {}: {}", parent.display(), e)))?;
    }
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| MetaError::Storage(format!("analytics serialize: {}", e)))?;
    std::fs::write(path, &json)
        .map_err(|e| MetaError::Storage(format!("analytics write {}: {}", path.display(), e)))
}
