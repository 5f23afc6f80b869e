//! Analysis response caching with TTL expiry and JSON persistence.

pub mod analysis_cache;

pub use analysis_cache::{AnalysisCache, AnalysisPayload, CacheEntry, ANALYSIS_TTL_MS};
