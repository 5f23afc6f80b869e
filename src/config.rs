//! Configuration loading.
//!
//! JSON config at `~/.metasurf/config.json`. A missing file yields the
//! defaults; a malformed one logs a warning and falls back to defaults so
//! the app still starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::providers::gemini::DEFAULT_GEMINI_MODEL;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    /// Override for the cache/analytics data directory. Defaults to the
    /// config directory itself.
    pub data_dir: Option<PathBuf>,
}

/// Provider settings. The API key here loses to nothing; the environment
/// is only consulted when it is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Configuration directory: `~/.metasurf`.
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".metasurf")
    }

    /// Configuration file path: `~/.metasurf/config.json`.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load the config file, falling back to defaults when it is missing
    /// or malformed.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load from an explicit path (used by tests).
    pub fn load_from(path: &std::path::Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                warn!("config {} is malformed, using defaults: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The directory holding the cache and analytics namespaces.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("nope.json"));
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.model, DEFAULT_GEMINI_MODEL);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.provider.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "provider": { "api_key": "k-123" } }"#).unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.provider.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.provider.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
            ..Default::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/elsewhere"));
    }
}
