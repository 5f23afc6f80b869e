//! The external analysis provider boundary.
//!
//! The orchestrator only needs `analyze(prompt) -> text | failure`; the
//! concrete Gemini implementation lives in [`gemini`]. Non-success HTTP
//! statuses are classified by [`classify_status`] before they reach the
//! orchestrator's caller.

pub mod gemini;

use async_trait::async_trait;

use crate::error::{MetaError, Result};

pub use gemini::GeminiProvider;

/// A remote text-generation service producing the analysis content.
///
/// One request, one response; no streaming, no retries. The provider
/// surfaces its own failure (including rate-limit status) synchronously
/// at the await point.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Run the rendered prompt and return the analysis text.
    async fn analyze(&self, prompt: &str) -> Result<String>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}

/// Classify a non-success provider status into a tagged error.
///
/// 429 becomes [`MetaError::RateLimited`] with a retry-later message;
/// everything else keeps its status code in
/// [`MetaError::ProviderRequestFailed`].
pub fn classify_status(status: u16, message: &str) -> MetaError {
    if status == 429 {
        MetaError::RateLimited(
            "You've exceeded the API rate limit. Please wait and try again later.".to_string(),
        )
    } else {
        MetaError::ProviderRequestFailed {
            status,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_429_as_rate_limited() {
        let err = classify_status(429, "Resource has been exhausted");
        assert!(matches!(err, MetaError::RateLimited(_)));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn test_classify_other_statuses_keep_code() {
        for status in [400, 401, 403, 500, 503] {
            let err = classify_status(status, "boom");
            match err {
                MetaError::ProviderRequestFailed { status: s, .. } => assert_eq!(s, status),
                other => panic!("expected ProviderRequestFailed, got {other:?}"),
            }
        }
    }
}
