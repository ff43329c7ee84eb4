//! Embedding providers
//!
//! [`ApiEmbedder`] calls an OpenAI-compatible `/embeddings` endpoint and
//! degrades to [`FallbackEmbedder`] on any failure: transport error, non-2xx
//! status, non-zero service code, malformed payload, or timeout. Callers
//! therefore always get a vector of the configured dimensionality.
//!
//! The fallback is deterministic: a 32-bit rolling hash of the normalized
//! text seeds a trigonometric vector which is then L2-normalized. It carries
//! no semantics beyond identity of the normalized text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::{Result, SmError};
use crate::search::normalize::normalize;

/// Pluggable embedding backend interface
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text. Never fails; degraded backends return the fallback vector.
    async fn embed(&self, text: &str) -> Vec<f32>;

    /// Embed several texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await);
        }
        out
    }

    fn dims(&self) -> usize;

    fn name(&self) -> &str;
}

/// Build the configured embedding provider.
///
/// `api` without an endpoint runs offline on the fallback embedder.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    if config.dims == 0 {
        return Err(SmError::Config(
            "embedding.dims must be greater than 0".to_string(),
        ));
    }

    let backend = config.backend.trim().to_lowercase();
    match backend.as_str() {
        "" | "fallback" | "hash" => Ok(Arc::new(FallbackEmbedder::new(config.dims))),
        "api" => match config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            Some(endpoint) => {
                let embedder = ApiEmbedder::new(
                    endpoint,
                    &config.model,
                    config.api_key.clone(),
                    config.dims,
                )?
                .with_timeout(Duration::from_secs(config.timeout_secs));
                Ok(Arc::new(embedder))
            }
            None => {
                debug!("no embedding endpoint configured, using fallback embedder");
                Ok(Arc::new(FallbackEmbedder::new(config.dims)))
            }
        },
        other => Err(SmError::Config(format!(
            "unknown embedding backend: {other}"
        ))),
    }
}

/// Deterministic offline embedder
#[derive(Debug, Clone)]
pub struct FallbackEmbedder {
    dims: usize,
}

impl Default for FallbackEmbedder {
    fn default() -> Self {
        Self { dims: 1024 }
    }
}

impl FallbackEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    /// Embed text synchronously. The text is normalized first.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let hash = rolling_hash(&normalize(text));
        let h = f64::from(hash);
        let shifted = f64::from(hash >> 8);

        let mut values: Vec<f64> = (0..self.dims)
            .map(|i| {
                let k = (i + 1) as f64;
                (h * k * 0.01).sin() + (h * k * 0.02).cos() + (shifted * k * 0.005).sin()
            })
            .collect();

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut values {
                *value /= norm;
            }
        }

        values.into_iter().map(|v| v as f32).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for FallbackEmbedder {
    async fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_text(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// 32-bit rolling hash over UTF-16 code units: `h = h * 31 + c`, wrapping.
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Embedding service client with fallback
pub struct ApiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dims: usize,
    timeout: Duration,
    fallback: FallbackEmbedder,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: EmbeddingInput<'a>,
    encoding_format: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<EmbeddingDatum>,
    #[serde(default)]
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    #[serde(default)]
    total_tokens: u64,
}

impl ApiEmbedder {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        dims: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skillmart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SmError::Config(format!("build embedding client: {err}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            dims,
            timeout: Duration::from_secs(30),
            fallback: FallbackEmbedder::new(dims),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self) -> String {
        if self.endpoint.ends_with("/embeddings") {
            self.endpoint.clone()
        } else {
            format!("{}/embeddings", self.endpoint)
        }
    }

    /// One request, bounded by the configured timeout.
    async fn request(&self, input: EmbeddingInput<'_>, expected: usize) -> Result<Vec<Vec<f32>>> {
        match tokio::time::timeout(self.timeout, self.send(input, expected)).await {
            Ok(result) => result,
            Err(_) => Err(SmError::EmbeddingTimeout(self.timeout.as_secs())),
        }
    }

    async fn send(&self, input: EmbeddingInput<'_>, expected: usize) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.model,
            input,
            encoding_format: "float",
        };

        let mut request = self.client.post(self.url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| SmError::Embedding(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmError::Embedding(format!("service returned HTTP {status}")));
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| SmError::Embedding(format!("malformed response: {err}")))?;

        self.extract(payload, expected)
    }

    /// Validate a response and return vectors in input order.
    fn extract(&self, payload: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
        if payload.code != 0 {
            return Err(SmError::Embedding(format!(
                "service code {}: {}",
                payload.code,
                payload.message.as_deref().unwrap_or("no message")
            )));
        }

        let mut data = payload.data;
        if data.len() != expected {
            return Err(SmError::Embedding(format!(
                "expected {expected} embeddings, got {}",
                data.len()
            )));
        }

        data.sort_by_key(|d| d.index);
        if data.iter().enumerate().any(|(pos, d)| d.index != pos) {
            return Err(SmError::Embedding(
                "response indices do not cover the input".to_string(),
            ));
        }
        if let Some(bad) = data.iter().find(|d| d.embedding.len() != self.dims) {
            return Err(SmError::Embedding(format!(
                "expected {} dimensions, got {}",
                self.dims,
                bad.embedding.len()
            )));
        }

        if let Some(usage) = payload.usage {
            debug!(tokens = usage.total_tokens, count = expected, "embedding request served");
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    async fn embed(&self, text: &str) -> Vec<f32> {
        let normalized = normalize(text);
        match self.request(EmbeddingInput::Single(&normalized), 1).await {
            Ok(mut vectors) => vectors.pop().unwrap_or_else(|| self.fallback.embed_text(&normalized)),
            Err(err) => {
                warn!(error = %err, "embedding service unavailable, using fallback");
                self.fallback.embed_text(&normalized)
            }
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let normalized: Vec<String> = texts.iter().map(|t| normalize(t)).collect();
        match self.request(EmbeddingInput::Batch(&normalized), normalized.len()).await {
            Ok(vectors) => vectors,
            Err(err) => {
                warn!(
                    error = %err,
                    count = normalized.len(),
                    "batch embedding failed, using fallback"
                );
                normalized.iter().map(|t| self.fallback.embed_text(t)).collect()
            }
        }
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "api"
    }
}
