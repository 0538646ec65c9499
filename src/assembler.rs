//! Prompt assembly and generation.
//!
//! [`PromptAssembler::assemble_and_generate`] runs four steps in order:
//!
//! 1. Select the template for the request's (content type, language)
//! 2. Check every declared field has a non-empty value
//! 3. Substitute values into the body in a single pass
//! 4. Send the result to the backend once and return its text unmodified
//!
//! Steps 1-3 never touch the network, so a bad request costs nothing.

use crate::content::{CONTEXT_FIELD, ContentType, Language};
use crate::error::{Result, ScribeError};
use crate::generation::{CompletionBackend, GenerationParams};
use crate::template::{Template, TemplateId, TemplateRegistry, render_template};
use std::collections::HashMap;

/// One generation request, built per user action and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content_type: ContentType,
    pub language: Language,
    /// Field name -> user-supplied value.
    pub fields: HashMap<String, String>,
    /// Retrieved context; may be empty.
    pub context: String,
}

impl GenerationRequest {
    /// Create a request with no fields and empty context.
    pub fn new(content_type: ContentType, language: Language) -> Self {
        Self {
            content_type,
            language,
            fields: HashMap::new(),
            context: String::new(),
        }
    }

    /// Set the retrieved context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// A fully substituted prompt ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub template_id: TemplateId,
    pub text: String,
}

/// Selects templates, substitutes fields, and invokes the backend.
pub struct PromptAssembler {
    registry: TemplateRegistry,
    backend: Box<dyn CompletionBackend>,
    params: GenerationParams,
}

impl PromptAssembler {
    pub fn new(
        registry: TemplateRegistry,
        backend: Box<dyn CompletionBackend>,
        params: GenerationParams,
    ) -> Self {
        Self {
            registry,
            backend,
            params,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Check the request's fields against its template without substituting.
    pub fn validate(&self, request: &GenerationRequest) -> Result<()> {
        let template = self
            .registry
            .select(request.content_type, request.language)?;
        collect_variables(template, request).map(|_| ())
    }

    /// Select, validate, and substitute without calling the backend.
    pub fn assemble(&self, request: &GenerationRequest) -> Result<AssembledPrompt> {
        let template = self
            .registry
            .select(request.content_type, request.language)?;

        let variables = collect_variables(template, request)?;

        let text = render_template(&template.body, &variables).map_err(|e| {
            // Registration already checked the body against its declared placeholders.
            ScribeError::ConfigurationError(format!(
                "template {} failed to render: {}",
                template.id, e
            ))
        })?;

        Ok(AssembledPrompt {
            template_id: template.id,
            text,
        })
    }

    /// Send an assembled prompt to the backend exactly once.
    pub fn generate(&self, prompt: &AssembledPrompt) -> Result<String> {
        tracing::debug!(
            template = %prompt.template_id,
            backend = self.backend.name(),
            "invoking completion backend"
        );
        self.backend
            .complete(&prompt.text, &self.params)
            .map_err(|e| ScribeError::GenerationError(e.to_string()))
    }

    /// Assemble the request and generate content from it.
    pub fn assemble_and_generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = self.assemble(request)?;
        self.generate(&prompt)
    }
}

/// Build the substitution map, rejecting the request if any declared field is
/// absent or blank. Context is the only placeholder allowed to be empty.
fn collect_variables(
    template: &Template,
    request: &GenerationRequest,
) -> Result<HashMap<String, String>> {
    let mut variables = HashMap::with_capacity(template.placeholders.len());
    let mut missing = Vec::new();

    for name in &template.placeholders {
        if name == CONTEXT_FIELD {
            variables.insert(name.clone(), request.context.clone());
            continue;
        }
        match request.fields.get(name) {
            Some(value) if !value.trim().is_empty() => {
                variables.insert(name.clone(), value.clone());
            }
            _ => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(ScribeError::ValidationError { missing });
    }

    for name in request.fields.keys() {
        if !template.placeholders.contains(name) {
            tracing::debug!(field = %name, template = %template.id, "ignoring unused field");
        }
    }

    Ok(variables)
}
