//! Gemini embedding and generation backends over the Generative Language REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{Prompt, TextGenerator};

/// The Generative Language API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Output width of `text-embedding-004`.
const DEFAULT_DIMENSIONS: usize = 768;

/// The default chat model.
const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

/// Maximum number of texts per `batchEmbedContents` request.
const MAX_BATCH: usize = 100;

fn api_key_from_env() -> Option<String> {
    std::env::var("GOOGLE_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY")).ok()
}

// Gemini API request/response types

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// POST `body` to `{base}/models/{model}:{method}` and decode the JSON reply.
///
/// Failures are reported as plain messages; callers wrap them in the
/// matching [`RagError`] variant.
async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    method: &str,
    body: &B,
) -> std::result::Result<R, String> {
    let url = format!("{GEMINI_BASE_URL}/models/{model}:{method}");
    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail =
            serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
        return Err(format!("API returned {status}: {detail}"));
    }

    response.json().await.map_err(|e| format!("failed to parse response: {e}"))
}

/// An [`EmbeddingProvider`] backed by the Gemini embedding API.
///
/// Documents are embedded with the `RETRIEVAL_DOCUMENT` task type and
/// single queries with `RETRIEVAL_QUERY`.
///
/// # Example
///
/// ```rust,ignore
/// use scout_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::from_env()?;
/// let embedding = provider.embed("box-to-box midfielder").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl GeminiEmbeddingProvider {
    /// Create a provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "Gemini".into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a provider from `GOOGLE_API_KEY` or `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from_env().ok_or_else(|| RagError::Embedding {
            provider: "Gemini".into(),
            message: "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Use a different embedding model with the given output width.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    fn request<'a>(&self, text: &'a str, task_type: &'a str) -> EmbedRequest<'a> {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content { role: None, parts: vec![Part { text }] },
            task_type,
        }
    }

    fn failure(message: String) -> RagError {
        error!(provider = "Gemini", error = %message, "embedding request failed");
        RagError::Embedding { provider: "Gemini".into(), message }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding query");
        let body = self.request(text, "RETRIEVAL_QUERY");
        let response: EmbedResponse =
            post_json(&self.client, &self.api_key, &self.model, "embedContent", &body)
                .await
                .map_err(Self::failure)?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            debug!(provider = "Gemini", batch_size = batch.len(), "embedding batch");
            let body = BatchEmbedRequest {
                requests: batch.iter().map(|t| self.request(t, "RETRIEVAL_DOCUMENT")).collect(),
            };
            let response: BatchEmbedResponse =
                post_json(&self.client, &self.api_key, &self.model, "batchEmbedContents", &body)
                    .await
                    .map_err(Self::failure)?;
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// A [`TextGenerator`] backed by the Gemini `generateContent` API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiGenerator {
    /// Create a generator with the given API key, the default model and a
    /// temperature of 0.3.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Generation {
                model: DEFAULT_CHAT_MODEL.into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_CHAT_MODEL.into(),
            temperature: 0.3,
        })
    }

    /// Create a generator from `GOOGLE_API_KEY` or `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from_env().ok_or_else(|| RagError::Generation {
            model: DEFAULT_CHAT_MODEL.into(),
            message: "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let text = prompt.render();
        debug!(model = %self.model, prompt_len = text.len(), "generating answer");

        let body = GenerateRequest {
            contents: vec![Content { role: Some("user"), parts: vec![Part { text: &text }] }],
            generation_config: GenerationConfig { temperature: self.temperature },
        };
        let response: GenerateResponse =
            post_json(&self.client, &self.api_key, &self.model, "generateContent", &body)
                .await
                .map_err(|message| {
                    error!(model = %self.model, error = %message, "generation request failed");
                    RagError::Generation { model: self.model.clone(), message }
                })?;

        let answer: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if answer.trim().is_empty() {
            return Err(RagError::Generation {
                model: self.model.clone(),
                message: "response contained no text".into(),
            });
        }
        Ok(answer)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
