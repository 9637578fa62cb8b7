//! Embedding clients.
//!
//! [`Embedder`] is the seam the pipeline talks through, so tests can inject
//! deterministic fakes. The production implementation calls the OpenAI
//! embeddings endpoint synchronously, one chunk per request, truncating
//! over-long input to the service limit. Nothing here retries: a failed call
//! is reported to the caller, which skips that chunk and moves on.

use serde::Deserialize;

use crate::error::{ConfigError, EmbedError};

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Vector length the default model produces.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// Longest input sent per request, in characters. Longer text is truncated
/// silently, matching the service limit.
pub const MAX_INPUT_CHARS: usize = 8000;

/// One text in, one fixed-length vector out.
pub trait Embedder {
    /// Embed a single chunk of text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Model name recorded in the output envelope.
    fn model(&self) -> &str;

    /// Vector length every embedding must have.
    fn dimensions(&self) -> usize;
}

/// Configuration for the OpenAI embeddings client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key. Empty means not configured; the client refuses to start.
    pub api_key: String,
    /// Base URL for the API (overridable for test servers and compatible providers).
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Expected vector length.
    pub dimensions: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Input truncation limit in characters.
    pub max_input_chars: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            timeout_secs: 60,
            max_input_chars: MAX_INPUT_CHARS,
        }
    }
}

impl OpenAiConfig {
    /// Default configuration with the key taken from `OPENAI_API_KEY`.
    ///
    /// A missing variable leaves the key empty; [`OpenAiEmbedder::new`]
    /// is where that becomes an error.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Client for the OpenAI embeddings endpoint.
#[derive(Debug)]
pub struct OpenAiEmbedder {
    config: OpenAiConfig,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Create a client. The API key is the one precondition checked here,
    /// before any chunk is processed.
    pub fn new(config: OpenAiConfig) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        // ureq pools connections per agent; one agent serves every request.
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build();
        Ok(Self { config, agent })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let input = truncate_chars(text, self.config.max_input_chars);

        let url = format!("{}/embeddings", self.config.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "input": input,
        });
        let body_str = serde_json::to_string(&body).map_err(|e| EmbedError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| EmbedError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| EmbedError::ParseError {
            message: e.to_string(),
        })?;

        let parsed: EmbeddingResponse =
            serde_json::from_str(&resp_str).map_err(|e| EmbedError::ParseError {
                message: e.to_string(),
            })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbedError::ParseError {
                message: "empty 'data' array".into(),
            })?;

        if embedding.len() != self.config.dimensions {
            return Err(EmbedError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

/// Truncate to at most `max` characters, never splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
