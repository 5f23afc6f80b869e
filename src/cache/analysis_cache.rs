//! Analysis response cache with TTL expiry.
//!
//! Persists to `<data dir>/cache/analyses.json`. Cache key is a SHA-256
//! digest of `(title, author, category)`. Entries expire 24 hours after
//! they are stored; expired entries are dropped lazily on lookup and
//! eagerly by the startup sweep. Storage failures degrade to "not cached"
//! and are never surfaced to callers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::MetaError;
use crate::prompts::Category;

/// Fixed time-to-live for cached analyses: 24 hours, in milliseconds.
pub const ANALYSIS_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// The cached analysis content plus the request triple that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub title: String,
    pub author: String,
    pub category: Category,
    /// The provider's analysis text.
    pub content: String,
}

/// A single cache record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: AnalysisPayload,
    /// Epoch-millis timestamp when the entry was stored.
    pub stored_at_ms: u64,
}

impl CacheEntry {
    /// An entry is servable iff its age is strictly below the TTL.
    fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) >= ttl_ms
    }
}

/// Persistent store serialized to JSON.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: HashMap<String, CacheEntry>,
}

/// Key→entry analysis cache with TTL expiry and JSON persistence.
///
/// Owns its persisted namespace exclusively; all mutation goes through
/// [`get`](Self::get), [`put`](Self::put), [`sweep_expired`](Self::sweep_expired)
/// and [`clear`](Self::clear).
pub struct AnalysisCache {
    store: CacheFile,
    path: PathBuf,
    ttl_ms: u64,
}

impl AnalysisCache {
    /// Open the cache at `path`, loading any existing entries.
    ///
    /// Malformed individual records are dropped; a wholly unreadable file
    /// starts the cache empty.
    pub fn open(path: PathBuf) -> Self {
        let store = Self::load_from_disk(&path);
        Self {
            store,
            path,
            ttl_ms: ANALYSIS_TTL_MS,
        }
    }

    /// Canonical cache file location under the given data dir.
    pub fn path_under(data_dir: &Path) -> PathBuf {
        data_dir.join("cache").join("analyses.json")
    }

    /// Build a deterministic cache key: SHA-256 of `(title, author, category)`.
    ///
    /// Uses length-prefixed encoding so distinct triples never collide
    /// (e.g. `title="a-b", author=""` vs `title="a", author="b"`). No
    /// normalization: equality is exact-string equality on the triple.
    pub fn cache_key(title: &str, author: &str, category: Category) -> String {
        let mut hasher = Sha256::new();
        for field in [title, author, category.as_str()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached payload. Returns `None` if the key is absent or
    /// the entry has expired.
    ///
    /// An expired entry found here is removed from the store as a side
    /// effect; removal is flushed to disk best-effort. An absent key has
    /// no side effect.
    pub fn get(&mut self, key: &str) -> Option<AnalysisPayload> {
        let now = now_ms();
        let expired = self
            .store
            .entries
            .get(key)
            .map(|e| e.is_expired(now, self.ttl_ms))?;
        if expired {
            debug!(key = %&key[..8.min(key.len())], "cache entry expired, removing");
            self.store.entries.remove(key);
            self.save_to_disk();
            return None;
        }
        self.store.entries.get(key).map(|e| e.payload.clone())
    }

    /// Store a payload under `key`, stamped with the current time.
    ///
    /// Overwrites any existing entry for that key unconditionally.
    pub fn put(&mut self, key: String, payload: AnalysisPayload) {
        self.store.entries.insert(
            key,
            CacheEntry {
                payload,
                stored_at_ms: now_ms(),
            },
        );
        self.save_to_disk();
    }

    /// Remove every expired entry. Safe on an empty store; idempotent.
    ///
    /// Returns the number of entries removed. Runs once at session start;
    /// there is no periodic sweep.
    pub fn sweep_expired(&mut self) -> usize {
        let now = now_ms();
        let ttl = self.ttl_ms;
        let before = self.store.entries.len();
        self.store.entries.retain(|_, e| !e.is_expired(now, ttl));
        let removed = before - self.store.entries.len();
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
            self.save_to_disk();
        }
        removed
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.store.entries.clear();
        self.save_to_disk();
    }

    /// Number of entries currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.store.entries.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.entries.is_empty()
    }

    /// Stored-at timestamps by key, for the `cache status` listing.
    pub fn stored_at_index(&self) -> Vec<(String, u64)> {
        self.store
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.stored_at_ms))
            .collect()
    }

    // -- private helpers ---------------------------------------------------

    fn load_from_disk(path: &Path) -> CacheFile {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheFile::default(),
            Err(e) => {
                warn!("failed to read analysis cache, starting empty: {}", e);
                return CacheFile::default();
            }
        };
        // Two-phase parse: a single malformed record is dropped instead of
        // discarding its siblings.
        let raw: Value = match serde_json::from_str(&data) {
            Ok(v) => v,
            Err(e) => {
                warn!("analysis cache file is corrupt, starting empty: {}", e);
                return CacheFile::default();
            }
        };
        let mut entries = HashMap::new();
        if let Some(map) = raw.get("entries").and_then(Value::as_object) {
            for (key, value) in map {
                match serde_json::from_value::<CacheEntry>(value.clone()) {
                    Ok(entry) => {
                        entries.insert(key.clone(), entry);
                    }
                    Err(e) => {
                        warn!(key = %&key[..8.min(key.len())], "dropping malformed cache record: {}", e);
                    }
                }
            }
        } else {
            warn!("analysis cache file has no entries object, starting empty");
        }
        CacheFile { entries }
    }

    /// Flush to disk. Failures degrade to in-memory-only state: logged,
    /// never propagated to the request path.
    fn save_to_disk(&self) {
        if let Err(e) = self.try_save() {
            warn!("{}", e);
        }
    }

    fn try_save(&self) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MetaError::Storage(format!("cache dir {}: {}", parent.display(), e))
            })?;
        }
        let data = serde_json::to_string_pretty(&self.store)
            .map_err(|e| MetaError::Storage(format!("cache serialize: {}", e)))?;
        std::fs::write(&self.path, data)
            .map_err(|e| MetaError::Storage(format!("cache write {}: {}", self.path.display(), e)))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
