//! Config section types and their default values.

use serde::{Deserialize, Serialize};

/// Settings for the chat-completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Model identifier sent with every request.
    pub model: String,

    /// Sampling temperature, between 0 and 2.
    pub temperature: f32,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub api_base: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout for each backend call.
    pub timeout_seconds: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: 0.7,
            max_tokens: 2000,
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_seconds: 120,
        }
    }
}

/// Settings for context retrieval and index building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// When false, generation never retrieves context.
    pub enabled: bool,

    /// Index file, relative to the workspace root.
    pub index_path: String,

    /// Number of passages joined into the context.
    pub top_k: usize,

    /// Embedding model used when building an index.
    pub embedding_model: String,

    /// Base URL for the embeddings endpoint; falls back to `generation.api_base`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Maximum chunk length in characters.
    pub chunk_size: usize,

    /// Characters shared between neighbouring chunks.
    pub chunk_overlap: usize,

    /// Chunks embedded per request while building.
    pub batch_size: usize,

    /// Glob patterns selecting files inside source directories.
    pub include: Vec<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            index_path: default_index_path(),
            top_k: 3,
            embedding_model: default_embedding_model(),
            api_base: None,
            chunk_size: 500,
            chunk_overlap: 100,
            batch_size: 64,
            include: default_include(),
        }
    }
}

/// Settings for the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub enabled: bool,

    /// Audit log file, relative to the workspace root.
    pub path: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_events_path(),
        }
    }
}

pub(crate) fn default_model() -> String {
    "gpt-4".to_string()
}

pub(crate) fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

pub(crate) fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub(crate) fn default_index_path() -> String {
    ".scribe/index.json".to_string()
}

pub(crate) fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

pub(crate) fn default_include() -> Vec<String> {
    vec!["**/*.txt".to_string(), "**/*.md".to_string()]
}

pub(crate) fn default_events_path() -> String {
    ".scribe/events.ndjson".to_string()
}
