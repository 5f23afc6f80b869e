//! Gemini implementation of the analysis provider.
//!
//! Auth priority: config key → GEMINI_API_KEY → GOOGLE_API_KEY.
//!
//! Speaks the v1beta `generateContent` REST API with the generation
//! settings the app has always used (temperature 0.7, topK 40, topP 0.95,
//! 1024 output tokens, dangerous-content safety filter). A success
//! response that carries no usable text is an
//! [`MetaError::UnexpectedProviderFormat`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{MetaError, Result};

use super::{classify_status, AnalysisProvider};

/// Gemini v1beta REST API base.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Gemini provider speaking the REST API directly with an API key.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    /// Build a provider with an explicit API key.
    pub fn new_with_key(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Self::build_client(),
        }
    }

    /// Build from an optional configured key, falling back to the
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment variables.
    ///
    /// Returns `None` when no credentials are available.
    pub fn from_config(api_key: Option<&str>, model: &str) -> Option<Self> {
        let env_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok();
        let key = resolve_api_key(api_key, env_key.as_deref())?;
        Some(Self::new_with_key(&key, model))
    }

    fn build_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client")
    }

    /// Build the `generateContent` request body for a single analysis
    /// prompt.
    pub fn build_request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 1024,
            },
            "safetySettings": [{
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "threshold": "BLOCK_MEDIUM_AND_ABOVE"
            }]
        })
    }

    /// Extract the analysis text from a Gemini response.
    ///
    /// Joins the text of all parts in the first candidate. Returns `None`
    /// when the candidate/content/parts path is missing or yields no text.
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response["candidates"][0]["content"]["parts"].as_array()?;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join(""))
        }
    }

    /// Full API URL for `generateContent` on the configured model.
    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

/// Resolve the API key in priority order: explicit config key, then env.
fn resolve_api_key(explicit: Option<&str>, env: Option<&str>) -> Option<String> {
    if let Some(k) = explicit.filter(|k| !k.is_empty()) {
        return Some(k.to_string());
    }
    env.filter(|k| !k.is_empty()).map(String::from)
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        let body = Self::build_request_body(prompt);

        debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| MetaError::ProviderRequestFailed {
                status: 0,
                message: format!("Gemini request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            // Prefer the message field of the Gemini error body when present.
            let message = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(error_text);
            return Err(classify_status(status, &message));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| MetaError::UnexpectedProviderFormat(e.to_string()))?;

        Self::extract_text(&json)
            .ok_or_else(|| MetaError::UnexpectedProviderFormat("no result text".to_string()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
