//! Text embedding.
//!
//! [`Embedder`] turns text into vectors. [`EmbeddingsClient`] is the blocking
//! client for an OpenAI-compatible `/embeddings` endpoint, used both to build
//! the index and to embed queries against it.

use crate::error::{Result, ScribeError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure reported by an embedding backend.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embedding request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("embedding request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("embedding backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

/// Trait for embedding models.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in input order.
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbedError>;

    /// Model identifier recorded in the index.
    fn model_name(&self) -> &str;
}

/// Blocking client for an OpenAI-compatible embeddings endpoint.
pub struct EmbeddingsClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingsClient {
    pub fn new(
        api_base: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ScribeError::ConfigurationError(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> EmbedError {
        if e.is_timeout() {
            EmbedError::Timeout {
                url: self.endpoint.clone(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            EmbedError::Transport {
                url: self.endpoint.clone(),
                message: e.to_string(),
            }
        }
    }
}

impl Embedder for EmbeddingsClient {
    fn embed(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, inputs = texts.len(), "embedding texts");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| EmbedError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbedError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
