//! End-to-end content generation: retrieval, then assembly, then one backend
//! call.
//!
//! Fields are validated before retrieval so an incomplete request never
//! reaches the embedding or completion backends. Retrieved passages belong to
//! a single run; nothing is cached between runs, so a retry after a failed
//! generation retrieves again.

use crate::assembler::{AssembledPrompt, GenerationRequest, PromptAssembler};
use crate::content::{ContentType, Language};
use crate::error::Result;
use crate::retrieval::{ContextRetriever, Passage, join_context};
use crate::template::TemplateId;
use std::collections::HashMap;

/// A prompt that has been assembled but not sent.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub prompt: AssembledPrompt,
    /// Passages spliced into the prompt, best first.
    pub passages: Vec<Passage>,
}

/// The result of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub template_id: TemplateId,
    /// Backend output, unmodified.
    pub content: String,
    pub passages: Vec<Passage>,
}

pub struct ContentPipeline {
    retriever: ContextRetriever,
    assembler: PromptAssembler,
}

impl ContentPipeline {
    pub fn new(retriever: ContextRetriever, assembler: PromptAssembler) -> Self {
        Self {
            retriever,
            assembler,
        }
    }

    /// Validate the fields, retrieve context when the content type uses it,
    /// and assemble the prompt.
    pub fn prepare(
        &self,
        content_type: ContentType,
        language: Language,
        fields: HashMap<String, String>,
    ) -> Result<PreparedPrompt> {
        let (request, passages) = self.contextualize(content_type, language, fields)?;
        let prompt = self.assembler.assemble(&request)?;
        Ok(PreparedPrompt { prompt, passages })
    }

    /// Validate, retrieve, and hand the request to the assembler for one
    /// backend call.
    pub fn run(
        &self,
        content_type: ContentType,
        language: Language,
        fields: HashMap<String, String>,
    ) -> Result<GenerationOutcome> {
        let (request, passages) = self.contextualize(content_type, language, fields)?;
        let template_id = self.assembler.registry().select(content_type, language)?.id;
        let content = self.assembler.assemble_and_generate(&request)?;
        Ok(GenerationOutcome {
            template_id,
            content,
            passages,
        })
    }

    /// Build the request with retrieved context spliced in.
    ///
    /// Fields are checked first so a bad request never reaches retrieval.
    fn contextualize(
        &self,
        content_type: ContentType,
        language: Language,
        fields: HashMap<String, String>,
    ) -> Result<(GenerationRequest, Vec<Passage>)> {
        let mut request = GenerationRequest::new(content_type, language);
        request.fields = fields;
        self.assembler.validate(&request)?;

        let passages = match content_type.query_field() {
            Some(field) => {
                let query = request.fields.get(field).map(String::as_str).unwrap_or("");
                self.retriever.retrieve_passages(query)
            }
            None => Vec::new(),
        };

        Ok((request.with_context(join_context(&passages)), passages))
    }
}
