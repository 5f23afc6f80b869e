//! High-level session facade for embedding metasurf.
//!
//! `Session` owns the analyzer, the usage tracker, and the currently
//! displayed analysis. It is the only surface the UI talks to:
//! `submit()` runs a request and retains the result, `reset()` clears it
//! for the next round, `analytics()` snapshots the usage summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use metasurf::app::Session;
//! use metasurf::config::Config;
//!
//! let session = Session::from_config(&Config::load())?;
//! let analysis = session.submit("Dune", "Frank Herbert", "literature").await?;
//! println!("{}", analysis.payload.content);
//! println!("{:?}", session.analytics());
//! session.reset();
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::analytics::{UsageStats, UsageTracker};
use crate::analyzer::{Analysis, Analyzer};
use crate::cache::AnalysisCache;
use crate::config::Config;
use crate::error::{MetaError, Result};
use crate::providers::{AnalysisProvider, GeminiProvider};

/// The provider's published limits. Displayed in the UI footer only,
/// never enforced locally.
pub const PROVIDER_RATE_LIMITS: &str = "15 RPM, 32,000 TPM, 1,500 RPD";

/// Disclaimer shown alongside every analysis.
pub const AI_DISCLAIMER: &str =
    "Metasurf is an AI-powered app that can make mistakes. Please double-check the responses.";

/// One user-facing session: services wired once at start, expired cache
/// entries swept once, then any number of submit/reset rounds.
pub struct Session {
    analyzer: Analyzer,
    tracker: Arc<UsageTracker>,
    current: Mutex<Option<Analysis>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session from configuration, using the Gemini provider.
    ///
    /// Fails only when no API key can be resolved; storage problems
    /// degrade silently inside the stores.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = GeminiProvider::from_config(
            config.provider.api_key.as_deref(),
            &config.provider.model,
        )
        .ok_or_else(|| {
            MetaError::Config(
                "no Gemini API key found: set provider.api_key in config.json \
                 or the GEMINI_API_KEY environment variable"
                    .to_string(),
            )
        })?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Build a session with an injected provider (tests, embedding).
    pub fn new(provider: Arc<dyn AnalysisProvider>, config: &Config) -> Self {
        let data_dir = config.data_dir();
        let cache = AnalysisCache::open(AnalysisCache::path_under(&data_dir));
        let tracker = Arc::new(UsageTracker::open(UsageTracker::path_under(&data_dir)));
        let analyzer = Analyzer::new(provider, cache, Arc::clone(&tracker));

        // One-shot startup sweep; there is no periodic scheduler.
        let swept = analyzer.sweep_expired();
        if swept > 0 {
            info!(swept, "removed expired analyses at session start");
        } else {
            debug!("no expired analyses at session start");
        }

        Self {
            analyzer,
            tracker,
            current: Mutex::new(None),
        }
    }

    /// Run an analysis request and retain the result as the current
    /// analysis. Failures leave the current analysis untouched.
    pub async fn submit(&self, title: &str, author: &str, category: &str) -> Result<Analysis> {
        let analysis = self.analyzer.request(title, author, category).await?;
        *self.current.lock().expect("current lock poisoned") = Some(analysis.clone());
        Ok(analysis)
    }

    /// Clear the current analysis (the "analyze another work" path).
    pub fn reset(&self) {
        *self.current.lock().expect("current lock poisoned") = None;
    }

    /// The analysis currently on display, if any.
    pub fn current(&self) -> Option<Analysis> {
        self.current.lock().expect("current lock poisoned").clone()
    }

    /// Usage summary for the statistics panel.
    pub fn analytics(&self) -> UsageStats {
        self.tracker.snapshot()
    }

    /// Maintenance access to the underlying cache.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Source;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct EchoProvider;

    #[async_trait]
    impl AnalysisProvider for EchoProvider {
        async fn analyze(&self, prompt: &str) -> Result<String> {
            Ok(format!("analysis of: {prompt}"))
        }

        fn name(&self) -> &str {
            "mock-echo"
        }
    }

    fn session_in_tmpdir(tmp: &TempDir) -> Session {
        let config = Config {
            data_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        Session::new(Arc::new(EchoProvider), &config)
    }

    #[tokio::test]
    async fn test_submit_sets_current_and_reset_clears_it() {
        let tmp = TempDir::new().unwrap();
        let session = session_in_tmpdir(&tmp);
        assert!(session.current().is_none());

        let analysis = session
            .submit("Dune", "Frank Herbert", "literature")
            .await
            .unwrap();
        assert_eq!(analysis.source, Source::Live);
        assert_eq!(
            session.current().unwrap().payload.title,
            "Dune",
            "submit must retain the result"
        );

        session.reset();
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_previous_analysis() {
        let tmp = TempDir::new().unwrap();
        let session = session_in_tmpdir(&tmp);
        session
            .submit("Dune", "Frank Herbert", "literature")
            .await
            .unwrap();

        let err = session
            .submit("The Thinker", "Rodin", "sculpture")
            .await
            .unwrap_err();
        assert!(matches!(err, MetaError::InvalidCategory(_)));
        assert_eq!(session.current().unwrap().payload.title, "Dune");
    }

    #[tokio::test]
    async fn test_analytics_reflects_session_activity() {
        let tmp = TempDir::new().unwrap();
        let session = session_in_tmpdir(&tmp);
        session
            .submit("Dune", "Frank Herbert", "literature")
            .await
            .unwrap();
        session
            .submit("Dune", "Frank Herbert", "literature")
            .await
            .unwrap();

        let stats = session.analytics();
        assert_eq!(stats.api_calls, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.categories.get("literature"), Some(&2));
    }

    #[tokio::test]
    async fn test_startup_sweep_runs_once_per_session() {
        let tmp = TempDir::new().unwrap();
        // Seed a cache file with one already-expired entry.
        {
            let session = session_in_tmpdir(&tmp);
            session
                .submit("Dune", "Frank Herbert", "literature")
                .await
                .unwrap();
        }
        let cache_path = AnalysisCache::path_under(tmp.path());
        let mut file: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&cache_path).unwrap()).unwrap();
        for entry in file["entries"].as_object_mut().unwrap().values_mut() {
            entry["stored_at_ms"] = serde_json::json!(0);
        }
        std::fs::write(&cache_path, serde_json::to_string(&file).unwrap()).unwrap();

        let session = session_in_tmpdir(&tmp);
        assert_eq!(
            session.analyzer().cache_len(),
            0,
            "expired entry must be swept at session start"
        );
    }

    #[tokio::test]
    async fn test_cache_survives_across_sessions() {
        let tmp = TempDir::new().unwrap();
        {
            let session = session_in_tmpdir(&tmp);
            session
                .submit("Dune", "Frank Herbert", "literature")
                .await
                .unwrap();
        }
        let session = session_in_tmpdir(&tmp);
        let analysis = session
            .submit("Dune", "Frank Herbert", "literature")
            .await
            .unwrap();
        assert_eq!(
            analysis.source,
            Source::Cache,
            "fresh session must serve the persisted entry"
        );
    }

    #[test]
    fn test_from_config_without_key_fails_with_config_error() {
        // Only run where the environment cannot supply a key.
        if std::env::var("GEMINI_API_KEY").is_ok() || std::env::var("GOOGLE_API_KEY").is_ok() {
            return;
        }
        let config = Config::default();
        let err = Session::from_config(&config).unwrap_err();
        assert!(matches!(err, MetaError::Config(_)));
    }
}
