//! Implementation of the `scribe index build` and `scribe index query`
//! commands.

use super::{build_embedder, load_workspace, output_error, record_event};
use crate::cli::{IndexBuildArgs, IndexQueryArgs};
use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::events::{Event, EventAction};
use crate::retrieval::build::{IndexBuilder, SourceDocument, collect_documents, sample_documents};
use crate::retrieval::embed::Embedder;
use crate::retrieval::splitter::TextSplitter;
use crate::retrieval::{ContextRetriever, RetrievalIndex};
use crate::workspace::Workspace;
use serde_json::json;
use std::io::Write;

/// Execute the `scribe index build` command.
///
/// Replaces any existing index at the configured path.
pub fn cmd_index_build(args: IndexBuildArgs) -> Result<()> {
    let (workspace, config) = load_workspace()?;
    let embedder = build_embedder(&config, &config.retrieval.embedding_model)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_index_build(&workspace, &config, &args, embedder.as_ref(), &mut out)
}

/// Execute the `scribe index query` command.
///
/// Unlike `generate`, a missing or unreadable index is an error here.
pub fn cmd_index_query(args: IndexQueryArgs) -> Result<()> {
    let (workspace, config) = load_workspace()?;
    let index = RetrievalIndex::load(&workspace.index_path(&config), |model| {
        build_embedder(&config, model)
    });
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_index_query(index, &args.query, top_k, &mut out)
}

/// Documents named on the command line plus, with `--sample`, the built-in
/// sample knowledge.
fn gather_documents(config: &Config, args: &IndexBuildArgs) -> Result<Vec<SourceDocument>> {
    if args.paths.is_empty() && !args.sample {
        return Err(ScribeError::UserError(
            "nothing to index: pass files or directories, or --sample".to_string(),
        ));
    }

    let include = if args.include.is_empty() {
        &config.retrieval.include
    } else {
        &args.include
    };

    let mut documents = collect_documents(&args.paths, include)?;
    if args.sample {
        documents.extend(sample_documents());
    }
    if documents.is_empty() {
        return Err(ScribeError::UserError(format!(
            "no files matched the include patterns: {}",
            include.join(", ")
        )));
    }
    Ok(documents)
}

fn run_index_build(
    workspace: &Workspace,
    config: &Config,
    args: &IndexBuildArgs,
    embedder: &dyn Embedder,
    out: &mut impl Write,
) -> Result<()> {
    let documents = gather_documents(config, args)?;

    let splitter = TextSplitter::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
    let builder = IndexBuilder::new(splitter, embedder, config.retrieval.batch_size);
    let index = builder.build(&documents)?;

    let path = workspace.index_path(config);
    index.save(&path)?;
    tracing::info!(path = %path.display(), entries = index.len(), "index saved");

    let sources: Vec<&str> = documents.iter().map(|d| d.source.as_str()).collect();
    record_event(
        workspace,
        config,
        Event::new(EventAction::IndexBuild).with_details(json!({
            "path": path.display().to_string(),
            "model": index.model,
            "dimension": index.dimension,
            "documents": documents.len(),
            "chunks": index.len(),
            "sources": sources,
        })),
    );

    writeln!(
        out,
        "Indexed {} chunk(s) from {} document(s) with {} ({} dimensions)",
        index.len(),
        documents.len(),
        index.model,
        index.dimension
    )
    .map_err(output_error)?;
    writeln!(out, "Saved to {}", path.display()).map_err(output_error)?;
    Ok(())
}

fn run_index_query(
    index: RetrievalIndex,
    query: &str,
    top_k: usize,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(reason) = index.disabled_reason() {
        return Err(ScribeError::RetrievalUnavailable(reason.to_string()));
    }
    if top_k == 0 {
        return Err(ScribeError::UserError(
            "--top-k must be at least 1".to_string(),
        ));
    }

    let retriever = ContextRetriever::with_index(index, top_k);
    let passages = retriever.retrieve_passages(query);

    if passages.is_empty() {
        writeln!(out, "No passages found.").map_err(output_error)?;
        return Ok(());
    }

    for (rank, passage) in passages.iter().enumerate() {
        writeln!(
            out,
            "{}. [{:.4}] {}",
            rank + 1,
            passage.score,
            passage.source
        )
        .map_err(output_error)?;
        for line in passage.text.lines() {
            writeln!(out, "   {}", line).map_err(output_error)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::read_events;
    use crate::retrieval::DisabledReason;
    use crate::retrieval::index::VectorIndex;
    use crate::test_support::{StubEmbedder, StubSearch};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn build_args(paths: Vec<PathBuf>, sample: bool) -> IndexBuildArgs {
        IndexBuildArgs {
            paths,
            include: Vec::new(),
            sample,
        }
    }

    #[test]
    fn test_build_requires_a_source() {
        let err = gather_documents(&Config::default(), &build_args(Vec::new(), false)).unwrap_err();
        assert!(matches!(err, ScribeError::UserError(_)));
    }

    #[test]
    fn test_build_sample_index_writes_file_and_event() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::resolve_from(temp_dir.path());
        let config = Config::default();
        let embedder = StubEmbedder::new("text-embedding-3-small");
        let mut out = Vec::new();

        run_index_build(
            &workspace,
            &config,
            &build_args(Vec::new(), true),
            &embedder,
            &mut out,
        )
        .unwrap();

        let index = VectorIndex::load(&workspace.index_path(&config)).unwrap();
        assert!(!index.is_empty());
        assert_eq!(index.model, "text-embedding-3-small");
        assert!(index.entries.iter().all(|e| e.source == "sample"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with(&format!("Indexed {} chunk(s) from 1 document(s)", index.len())));

        let events = read_events(&workspace.events_path(&config)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::IndexBuild);
        assert_eq!(events[0].details["chunks"], index.len());
    }

    #[test]
    fn test_build_uses_config_include_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("docs");
        std::fs::create_dir_all(docs.join("nested")).unwrap();
        std::fs::write(docs.join("a.md"), "Alpha notes.").unwrap();
        std::fs::write(docs.join("nested").join("b.txt"), "Beta notes.").unwrap();
        std::fs::write(docs.join("skip.json"), "{}").unwrap();

        let workspace = Workspace::resolve_from(temp_dir.path());
        let config = Config::default();
        let mut out = Vec::new();

        run_index_build(
            &workspace,
            &config,
            &build_args(vec![docs], false),
            &StubEmbedder::new("stub"),
            &mut out,
        )
        .unwrap();

        let index = VectorIndex::load(&workspace.index_path(&config)).unwrap();
        let texts: Vec<&str> = index.entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha notes.", "Beta notes."]);
    }

    #[test]
    fn test_build_with_no_matching_files_fails() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("data.csv"), "x,y").unwrap();
        let mut args = build_args(vec![temp_dir.path().to_path_buf()], false);
        args.include = vec!["**/*.md".to_string()];

        let err = gather_documents(&Config::default(), &args).unwrap_err();
        assert!(err.to_string().contains("**/*.md"));
    }

    #[test]
    fn test_build_embed_failure_is_user_error_and_leaves_no_index() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::resolve_from(temp_dir.path());
        let config = Config::default();
        let mut out = Vec::new();

        let err = run_index_build(
            &workspace,
            &config,
            &build_args(Vec::new(), true),
            &StubEmbedder::failing("connection refused"),
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, ScribeError::UserError(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
        assert!(err.to_string().contains("connection refused"));
        assert!(!workspace.index_path(&config).exists());
        assert!(!workspace.events_path(&config).exists());
    }

    #[test]
    fn test_query_prints_ranked_passages() {
        let index = RetrievalIndex::Available(Box::new(StubSearch::new(vec![
            ("low", 0.1),
            ("high", 0.9),
            ("mid", 0.5),
        ])));
        let mut out = Vec::new();

        run_index_query(index, "anything", 2, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1. [0.9000] stub\n   high\n2. [0.5000] stub\n   mid\n"
        );
    }

    #[test]
    fn test_query_disabled_index_is_retrieval_unavailable() {
        let index = RetrievalIndex::Disabled(DisabledReason::Absent(PathBuf::from(
            ".scribe/index.json",
        )));
        let mut out = Vec::new();

        let err = run_index_query(index, "anything", 3, &mut out).unwrap_err();

        assert_eq!(err.exit_code(), crate::exit_codes::RETRIEVAL_UNAVAILABLE);
        assert!(out.is_empty());
    }

    #[test]
    fn test_query_failed_search_prints_none_found() {
        let index = RetrievalIndex::Available(Box::new(StubSearch::failing()));
        let mut out = Vec::new();

        run_index_query(index, "anything", 3, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "No passages found.\n");
    }
}
