//! Implementation of the `scribe generate` command.
//!
//! Collects the template fields from `-f NAME=VALUE` arguments, fills in
//! declared defaults (e.g. the social media platform), and runs the content
//! pipeline. The generated text is printed verbatim and optionally written to
//! a file.

use super::{build_backend, build_embedder, load_workspace, output_error, record_event, write_block};
use crate::assembler::PromptAssembler;
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::content::ContentType;
use crate::error::{Result, ScribeError};
use crate::events::{Event, EventAction};
use crate::fs::atomic_write_file;
use crate::generation::{BackendError, CompletionBackend, GenerationParams};
use crate::pipeline::ContentPipeline;
use crate::retrieval::{ContextRetriever, LazyRetrievalIndex, RetrievalIndex};
use crate::workspace::Workspace;
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;

/// Execute the `scribe generate` command.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let (workspace, config) = load_workspace()?;

    let retriever = build_retriever(&workspace, &config, args.no_context);
    let backend: Box<dyn CompletionBackend> = if args.dry_run {
        Box::new(OfflineBackend)
    } else {
        build_backend(&config)?
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_generate(&workspace, &config, &args, retriever, backend, &mut out)
}

/// A retriever over the workspace index, loaded on first use.
///
/// Retrieval is disabled outright by `--no-context` or `retrieval.enabled: false`.
fn build_retriever(workspace: &Workspace, config: &Config, no_context: bool) -> ContextRetriever {
    if no_context || !config.retrieval.enabled {
        tracing::debug!(no_context, "retrieval disabled for this run");
        return ContextRetriever::disabled();
    }

    let index_path = workspace.index_path(config);
    let loader_config = config.clone();
    let lazy = LazyRetrievalIndex::new(move || {
        RetrievalIndex::load(&index_path, |model| build_embedder(&loader_config, model))
    });
    ContextRetriever::new(lazy, config.retrieval.top_k)
}

/// Field values from the command line, with declared defaults filled in for
/// fields the user left out.
fn collect_fields(content_type: ContentType, pairs: &[(String, String)]) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = pairs.iter().cloned().collect();

    for field in content_type.fields() {
        if let Some(default) = field.default
            && !fields.contains_key(field.name)
        {
            fields.insert(field.name.to_string(), default.to_string());
        }
    }

    for name in fields.keys() {
        if !content_type.fields().iter().any(|field| field.name == name.as_str()) {
            tracing::warn!(field = %name, content_type = %content_type, "ignoring unknown field");
        }
    }

    fields
}

fn run_generate(
    workspace: &Workspace,
    config: &Config,
    args: &GenerateArgs,
    retriever: ContextRetriever,
    backend: Box<dyn CompletionBackend>,
    out: &mut impl Write,
) -> Result<()> {
    let registry = config.template_registry()?;
    let assembler = PromptAssembler::new(registry, backend, config.generation_params());
    let pipeline = ContentPipeline::new(retriever, assembler);
    let fields = collect_fields(args.content_type, &args.fields);

    if args.dry_run {
        let prepared = pipeline.prepare(args.content_type, args.language, fields)?;
        tracing::info!(
            template = %prepared.prompt.template_id,
            passages = prepared.passages.len(),
            "assembled prompt (dry run)"
        );
        return write_block(out, &prepared.prompt.text);
    }

    let outcome = match pipeline.run(args.content_type, args.language, fields) {
        Ok(outcome) => outcome,
        Err(e @ ScribeError::GenerationError(_)) => {
            record_event(
                workspace,
                config,
                Event::new(EventAction::GenerateFailed).with_details(json!({
                    "content_type": args.content_type.key(),
                    "language": args.language.key(),
                    "model": config.generation.model,
                    "error": e.to_string(),
                })),
            );
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    if let Some(path) = &args.out {
        let path = if path.is_absolute() {
            path.clone()
        } else {
            std::env::current_dir().map_err(output_error)?.join(path)
        };
        atomic_write_file(&path, &outcome.content)?;
        tracing::info!(path = %path.display(), "wrote generated content");
    }

    let sources: Vec<&str> = outcome.passages.iter().map(|p| p.source.as_str()).collect();
    record_event(
        workspace,
        config,
        Event::new(EventAction::Generate).with_details(json!({
            "template": outcome.template_id.to_string(),
            "model": config.generation.model,
            "passages": outcome.passages.len(),
            "sources": sources,
            "output_chars": outcome.content.chars().count(),
            "out": args.out.as_ref().map(|p| p.display().to_string()),
        })),
    );

    write_block(out, &outcome.content)
}

/// Backend used by `--dry-run`, which assembles prompts without sending them.
struct OfflineBackend;

impl CompletionBackend for OfflineBackend {
    fn complete(&self, _prompt: &str, _params: &GenerationParams) -> std::result::Result<String, BackendError> {
        Err(BackendError::MalformedResponse(
            "dry run: no backend configured".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
