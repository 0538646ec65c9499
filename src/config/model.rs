//! Config struct definition.

use super::types::{EventSettings, GenerationSettings, RetrievalSettings};
use crate::template::TemplateOverrides;
use serde::{Deserialize, Serialize};

/// Configuration for scribe.
///
/// This struct represents the contents of `scribe.yaml`. Every section is
/// optional and unknown fields are ignored, so a partial file only overrides
/// what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat-completion backend settings.
    pub generation: GenerationSettings,

    /// Context retrieval and index building settings.
    pub retrieval: RetrievalSettings,

    /// Audit log settings.
    pub events: EventSettings,

    /// Replacement template bodies, keyed by content type then language.
    ///
    /// Each body must use exactly the placeholders of the built-in template
    /// it replaces.
    #[serde(skip_serializing_if = "TemplateOverrides::is_empty")]
    pub templates: TemplateOverrides,
}
