//! Error types for the scribe CLI.
//!
//! Uses thiserror for derive macros. Validation and configuration errors are
//! raised before any network call; generation errors carry the backend's
//! diagnostic verbatim.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for scribe operations.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// User provided invalid arguments or an input could not be read.
    #[error("{0}")]
    UserError(String),

    /// Unsupported template combination, invalid config, or missing credentials.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// One or more required template fields were missing or empty.
    #[error("Missing required field(s): {}", .missing.join(", "))]
    ValidationError {
        /// Names of the missing fields, in template declaration order.
        missing: Vec<String>,
    },

    /// No usable similarity index.
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// The completion backend failed.
    #[error("Generation failed: {0}")]
    GenerationError(String),
}

impl ScribeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScribeError::UserError(_) => exit_codes::USER_ERROR,
            ScribeError::ValidationError { .. } => exit_codes::VALIDATION_FAILURE,
            ScribeError::ConfigurationError(_) => exit_codes::CONFIGURATION_FAILURE,
            ScribeError::GenerationError(_) => exit_codes::GENERATION_FAILURE,
            ScribeError::RetrievalUnavailable(_) => exit_codes::RETRIEVAL_UNAVAILABLE,
        }
    }
}

/// Result type alias for scribe operations.
pub type Result<T> = std::result::Result<T, ScribeError>;
