//! Config loading, validation, and derived settings.

use super::model::Config;
use crate::error::{Result, ScribeError};
use crate::generation::GenerationParams;
use crate::template::TemplateRegistry;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ScribeError::ConfigurationError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScribeError::ConfigurationError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            ScribeError::ConfigurationError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ScribeError::ConfigurationError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `generation.temperature` must be within 0..=2
    /// - `generation.max_tokens`, `generation.timeout_seconds` must be positive
    /// - `retrieval.top_k`, `retrieval.chunk_size`, `retrieval.batch_size` must be positive
    /// - `retrieval.chunk_overlap` must be smaller than `retrieval.chunk_size`
    /// - template overrides must declare the same placeholders as the built-ins
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        let retrieval = &self.retrieval;

        require_non_empty("generation.model", &generation.model)?;
        require_non_empty("generation.api_base", &generation.api_base)?;
        require_non_empty("generation.api_key_env", &generation.api_key_env)?;

        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(invalid(format!(
                "generation.temperature must be between 0 and 2 (found {})",
                generation.temperature
            )));
        }
        if generation.max_tokens == 0 {
            return Err(invalid("generation.max_tokens must be greater than 0"));
        }
        if generation.timeout_seconds == 0 {
            return Err(invalid("generation.timeout_seconds must be greater than 0"));
        }

        require_non_empty("retrieval.index_path", &retrieval.index_path)?;
        require_non_empty("retrieval.embedding_model", &retrieval.embedding_model)?;

        if retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k must be greater than 0"));
        }
        if retrieval.chunk_size == 0 {
            return Err(invalid("retrieval.chunk_size must be greater than 0"));
        }
        if retrieval.chunk_overlap >= retrieval.chunk_size {
            return Err(invalid(format!(
                "retrieval.chunk_overlap ({}) must be smaller than retrieval.chunk_size ({})",
                retrieval.chunk_overlap, retrieval.chunk_size
            )));
        }
        if retrieval.batch_size == 0 {
            return Err(invalid("retrieval.batch_size must be greater than 0"));
        }

        require_non_empty("events.path", &self.events.path)?;

        self.template_registry().map(|_| ())
    }

    /// Build the template registry: built-ins plus configured overrides.
    pub fn template_registry(&self) -> Result<TemplateRegistry> {
        TemplateRegistry::with_overrides(&self.templates)
    }

    /// Generation parameters sent with every backend request.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
        }
    }

    /// Timeout applied to every backend request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.timeout_seconds)
    }

    /// Base URL for the embeddings endpoint.
    pub fn retrieval_api_base(&self) -> &str {
        self.retrieval
            .api_base
            .as_deref()
            .unwrap_or(&self.generation.api_base)
    }

    /// Resolve the API key through `lookup` (an environment accessor).
    ///
    /// A missing or blank key is a configuration error naming the variable.
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = &self.generation.api_key_env;
        match lookup(name) {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ScribeError::ConfigurationError(format!(
                "missing backend credentials: environment variable {} is not set",
                name
            ))),
        }
    }

    /// Resolve the API key from the process environment.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }
}

fn invalid(message: impl Into<String>) -> ScribeError {
    ScribeError::ConfigurationError(format!("config validation failed: {}", message.into()))
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}
