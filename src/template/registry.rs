//! Static registration table of prompt templates.
//!
//! Templates are registered once at startup and checked for completeness
//! there: every content type must have a template for every language. A gap
//! or a malformed body is a configuration error raised before any request is
//! served, so `select` never has to guess at request time.

use super::builtin::builtin_body;
use super::engine::placeholders;
use crate::content::{ContentType, Language};
use crate::error::{Result, ScribeError};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a template: one per (content type, language) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId {
    pub content_type: ContentType,
    pub language: Language,
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.content_type.key(), self.language.key())
    }
}

/// Where a registered template body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// Compiled into the binary.
    Builtin,
    /// Supplied by the `templates` section of the config file.
    Override,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Builtin => f.write_str("builtin"),
            TemplateSource::Override => f.write_str("override"),
        }
    }
}

/// A registered prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    /// Declared placeholders, in the content type's field order.
    pub placeholders: Vec<String>,
    pub body: String,
    pub source: TemplateSource,
}

/// Template overrides keyed by content type, then language.
pub type TemplateOverrides = BTreeMap<ContentType, BTreeMap<Language, String>>;

/// Mapping from (content type, language) to template.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateId, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in template, checked for completeness.
    pub fn builtin() -> Result<Self> {
        Self::with_overrides(&TemplateOverrides::new())
    }

    /// Built-in templates with config-supplied bodies layered on top.
    pub fn with_overrides(overrides: &TemplateOverrides) -> Result<Self> {
        let mut registry = Self::new();

        for content_type in ContentType::ALL {
            for language in Language::ALL {
                registry.register(
                    content_type,
                    language,
                    builtin_body(content_type, language),
                    TemplateSource::Builtin,
                )?;
            }
        }

        for (content_type, by_language) in overrides {
            for (language, body) in by_language {
                registry.register(*content_type, *language, body, TemplateSource::Override)?;
                tracing::debug!(
                    content_type = content_type.key(),
                    language = language.key(),
                    "registered template override"
                );
            }
        }

        registry.validate_complete()?;
        Ok(registry)
    }

    /// Register (or replace) the template for a content type and language.
    ///
    /// The body must reference exactly the placeholders the content type
    /// declares, no more and no fewer.
    pub fn register(
        &mut self,
        content_type: ContentType,
        language: Language,
        body: &str,
        source: TemplateSource,
    ) -> Result<()> {
        let id = TemplateId {
            content_type,
            language,
        };

        let found = placeholders(body).map_err(|e| {
            ScribeError::ConfigurationError(format!("template {} is malformed: {}", id, e))
        })?;
        let declared: Vec<String> = content_type
            .placeholder_names()
            .into_iter()
            .map(String::from)
            .collect();

        let missing: Vec<&str> = declared
            .iter()
            .filter(|name| !found.contains(name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ScribeError::ConfigurationError(format!(
                "template {} is missing placeholder(s): {}",
                id,
                missing.join(", ")
            )));
        }

        let undeclared: Vec<&str> = found
            .iter()
            .filter(|name| !declared.contains(name))
            .map(String::as_str)
            .collect();
        if !undeclared.is_empty() {
            return Err(ScribeError::ConfigurationError(format!(
                "template {} references undeclared placeholder(s): {} (declared: {})",
                id,
                undeclared.join(", "),
                declared.join(", ")
            )));
        }

        self.templates.insert(
            id,
            Template {
                id,
                placeholders: declared,
                body: body.to_string(),
                source,
            },
        );
        Ok(())
    }

    /// Check that every content type has a template for every language.
    pub fn validate_complete(&self) -> Result<()> {
        let gaps: Vec<String> = ContentType::ALL
            .iter()
            .flat_map(|&content_type| {
                Language::ALL.iter().map(move |&language| TemplateId {
                    content_type,
                    language,
                })
            })
            .filter(|id| !self.templates.contains_key(id))
            .map(|id| id.to_string())
            .collect();

        if gaps.is_empty() {
            Ok(())
        } else {
            Err(ScribeError::ConfigurationError(format!(
                "no template registered for: {}",
                gaps.join(", ")
            )))
        }
    }

    /// Select the template for a content type and language.
    pub fn select(&self, content_type: ContentType, language: Language) -> Result<&Template> {
        let id = TemplateId {
            content_type,
            language,
        };
        self.templates.get(&id).ok_or_else(|| {
            ScribeError::ConfigurationError(format!("no template registered for {}", id))
        })
    }

    /// Iterate over all templates in (content type, language) order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
