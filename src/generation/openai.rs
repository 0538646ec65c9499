//! OpenAI-compatible chat-completions backend.
//!
//! Sends the assembled prompt as a single user message to
//! `{api_base}/chat/completions` and returns the first choice's content.
//! Works against any server that speaks the same wire format.

use super::{BackendError, CompletionBackend, GenerationParams};
use crate::error::{Result, ScribeError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ChatCompletionsBackend {
    /// Create a backend for `api_base` (e.g. `https://api.openai.com/v1`).
    pub fn new(api_base: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ScribeError::ConfigurationError(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                url: self.endpoint.clone(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            BackendError::Transport {
                url: self.endpoint.clone(),
                message: e.to_string(),
            }
        }
    }
}

impl CompletionBackend for ChatCompletionsBackend {
    fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> std::result::Result<String, BackendError> {
        let request = ChatRequest {
            model: &params.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        tracing::info!(
            endpoint = %self.endpoint,
            model = %params.model,
            prompt_chars = prompt.chars().count(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: detail,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::MalformedResponse("no content in choices".to_string()))
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}
