//! Command implementations for scribe.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers commands share for building backends
//! and recording audit events.

mod config_cmd;
mod generate;
mod index;
mod init;
mod templates;

use crate::cli::{Command, IndexAction, IndexCommand};
use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::events::{Event, append_event};
use crate::generation::{ChatCompletionsBackend, CompletionBackend};
use crate::retrieval::embed::{Embedder, EmbeddingsClient};
use crate::workspace::Workspace;
use std::io::Write;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Templates(args) => templates::cmd_templates(args),
        Command::Index(index_cmd) => dispatch_index(index_cmd),
        Command::Config(args) => config_cmd::cmd_config(args),
    }
}

/// Dispatch index subcommands.
fn dispatch_index(index_cmd: IndexCommand) -> Result<()> {
    match index_cmd.action {
        IndexAction::Build(args) => index::cmd_index_build(args),
        IndexAction::Query(args) => index::cmd_index_query(args),
    }
}

/// Resolve the workspace from the working directory and load its config.
fn load_workspace() -> Result<(Workspace, Config)> {
    let workspace = Workspace::resolve()?;
    let config = workspace.load_config()?;
    Ok((workspace, config))
}

/// Chat-completion backend configured from `config`.
///
/// Fails with a configuration error when the API key is not set.
fn build_backend(config: &Config) -> Result<Box<dyn CompletionBackend>> {
    let api_key = config.api_key()?;
    let backend = ChatCompletionsBackend::new(
        &config.generation.api_base,
        api_key,
        config.request_timeout(),
    )?;
    Ok(Box::new(backend))
}

/// Embeddings client for `model`, configured from `config`.
fn build_embedder(config: &Config, model: &str) -> Result<Box<dyn Embedder>> {
    let api_key = config.api_key()?;
    let embedder = EmbeddingsClient::new(
        config.retrieval_api_base(),
        api_key,
        model,
        config.request_timeout(),
    )?;
    Ok(Box::new(embedder))
}

/// Append `event` to the workspace audit log when events are enabled.
///
/// A failed write is logged, not returned: the command's own result stands.
fn record_event(workspace: &Workspace, config: &Config, event: Event) {
    if !config.events.enabled {
        return;
    }
    let path = workspace.events_path(config);
    if let Err(e) = append_event(&path, &event) {
        tracing::warn!(error = %e, action = %event.action, "failed to record audit event");
    }
}

/// Map a write to the output stream into a user error.
fn output_error(e: std::io::Error) -> ScribeError {
    ScribeError::UserError(format!("failed to write output: {}", e))
}

/// Write `text` followed by a newline unless it already ends with one.
fn write_block(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).map_err(output_error)?;
    if !text.ends_with('\n') {
        out.write_all(b"\n").map_err(output_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventAction, read_events};
    use tempfile::TempDir;

    #[test]
    fn build_backend_requires_api_key() {
        let mut config = Config::default();
        config.generation.api_key_env = "SCRIBE_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        match build_backend(&config) {
            Err(ScribeError::ConfigurationError(message)) => {
                assert!(message.contains("SCRIBE_TEST_KEY_THAT_IS_NEVER_SET"))
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("backend built without a key"),
        }
    }

    #[test]
    fn record_event_respects_enabled_flag() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::resolve_from(temp_dir.path());
        let mut config = Config::default();

        config.events.enabled = false;
        record_event(&workspace, &config, Event::new(EventAction::Generate));
        assert!(!workspace.events_path(&config).exists());

        config.events.enabled = true;
        record_event(&workspace, &config, Event::new(EventAction::Generate));
        let events = read_events(&workspace.events_path(&config)).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn write_block_adds_missing_newline_only() {
        let mut out = Vec::new();
        write_block(&mut out, "one").unwrap();
        write_block(&mut out, "two\n").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
    }
}
