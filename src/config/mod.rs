//! Configuration model for scribe.
//!
//! This module defines the Config struct that represents `scribe.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values including
//! template overrides.

mod model;
mod operations;
pub mod types;


pub use model::Config;
pub use types::{EventSettings, GenerationSettings, RetrievalSettings};
