//! Error types for metasurf.
//!
//! Request-level failures are tagged variants so callers branch on kind
//! instead of parsing message text. Storage failures never travel the
//! request path: the stores absorb them and degrade to "not cached" /
//! "zero-valued aggregate".

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MetaError>;

/// All metasurf error kinds.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Category string is not one of the known artistic-work domains.
    /// The request never reaches the cache or the provider.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// The provider answered with a rate-limit status (429).
    /// Surfaced as-is; never retried automatically.
    #[error("{0}")]
    RateLimited(String),

    /// Any other non-success provider status. The status code is part of
    /// the user-visible message.
    #[error("API request failed with status {status}: {message}")]
    ProviderRequestFailed { status: u16, message: String },

    /// Provider returned success but the payload carried no result text.
    #[error("Unexpected API response format: {0}")]
    UnexpectedProviderFormat(String),

    /// Cache or analytics persistence failed. Absorbed inside the stores
    /// (logged, in-memory state wins); exists for internal helper
    /// signatures only and must not reach the UI.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error at the CLI boundary.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MetaError {
    /// True for the error kinds that are allowed to reach the UI.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_category_display_names_the_category() {
        let err = MetaError::InvalidCategory("sculpture".into());
        assert_eq!(err.to_string(), "Invalid category: sculpture");
    }

    #[test]
    fn test_provider_failed_display_includes_status() {
        let err = MetaError::ProviderRequestFailed {
            status: 503,
            message: "service unavailable".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"), "status code must be visible: {msg}");
    }

    #[test]
    fn test_rate_limited_message_is_verbatim() {
        let err = MetaError::RateLimited("wait and retry".into());
        assert_eq!(err.to_string(), "wait and retry");
    }

    #[test]
    fn test_storage_errors_are_not_user_visible() {
        assert!(!MetaError::Storage("disk full".into()).is_user_visible());
        assert!(MetaError::RateLimited("429".into()).is_user_visible());
        assert!(MetaError::InvalidCategory("x".into()).is_user_visible());
    }
}
