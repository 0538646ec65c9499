//! Text-completion backends.
//!
//! The assembler talks to a backend through [`CompletionBackend`]: one prompt
//! in, one string out, with generation parameters fixed by configuration.
//! There is no retry, streaming, or partial-result handling at this layer.

mod openai;

pub use openai::ChatCompletionsBackend;

use thiserror::Error;

/// Fixed generation settings sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Model identifier, e.g. `gpt-4`.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Failure reported by a completion backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request never completed (connection refused, DNS, TLS).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the payload was unusable.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// A service that turns a prompt into generated text.
pub trait CompletionBackend: Send + Sync {
    /// Send one prompt and return the generated text unmodified.
    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
