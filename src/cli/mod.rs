//! CLI argument parsing for scribe.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::content::{ContentType, Language};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Scribe: multilingual content generation with retrieval-augmented prompts.
///
/// Picks a prompt template by content type and language, splices in passages
/// retrieved from a local knowledge index, and sends the result to a
/// chat-completion backend.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Overridden by SCRIBE_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for scribe.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default scribe.yaml in the current directory.
    ///
    /// Refuses to overwrite an existing file.
    Init,

    /// Generate content.
    ///
    /// Retrieves context for the topic (or keyword), fills the template for
    /// the content type and language, and prints the backend's response.
    Generate(GenerateArgs),

    /// List the registered templates, or print one.
    Templates(TemplatesArgs),

    /// Knowledge index commands.
    Index(IndexCommand),

    /// Print the effective configuration as YAML.
    Config(ConfigArgs),
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Kind of content to generate.
    #[arg(value_enum)]
    pub content_type: ContentType,

    /// Language to write in.
    #[arg(short, long, value_enum, default_value_t = Language::English)]
    pub language: Language,

    /// Template field as NAME=VALUE (repeatable), e.g. -f topic="Remote work".
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Skip retrieval and generate with empty context.
    #[arg(long)]
    pub no_context: bool,

    /// Also write the generated text to this file.
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the assembled prompt instead of calling the backend.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `templates` command.
#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    /// Only list templates for this content type.
    #[arg(short, long, value_enum)]
    pub content_type: Option<ContentType>,

    /// Only list templates for this language.
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Print template bodies, not only their identities.
    #[arg(long)]
    pub show: bool,
}

/// Index subcommands.
#[derive(Parser, Debug)]
pub struct IndexCommand {
    #[command(subcommand)]
    pub action: IndexAction,
}

/// Available index actions.
#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Build the knowledge index from files and directories.
    ///
    /// Text is split on blank lines into overlapping chunks, embedded, and
    /// saved to the configured index path, replacing any existing index.
    Build(IndexBuildArgs),

    /// Show the passages retrieved for a query.
    Query(IndexQueryArgs),
}

/// Arguments for `index build`.
#[derive(Parser, Debug)]
pub struct IndexBuildArgs {
    /// Files or directories to index.
    pub paths: Vec<PathBuf>,

    /// Glob patterns selecting files inside directories (overrides config).
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Also index the built-in sample knowledge.
    #[arg(long)]
    pub sample: bool,
}

/// Arguments for `index query`.
#[derive(Parser, Debug)]
pub struct IndexQueryArgs {
    /// Free-text query.
    pub query: String,

    /// Number of passages to show (defaults to retrieval.top_k).
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for the `config` command.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the config file path instead of its contents.
    #[arg(long)]
    pub path: bool,
}

/// Parse a `NAME=VALUE` field argument. The value may itself contain `=`.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name is empty in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["scribe", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_generate_minimal() {
        let cli =
            Cli::try_parse_from(["scribe", "generate", "blog-post", "-f", "topic=AI"]).unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.content_type, ContentType::BlogPost);
            assert_eq!(args.language, Language::English);
            assert_eq!(args.fields, vec![("topic".to_string(), "AI".to_string())]);
            assert!(!args.no_context);
            assert!(!args.dry_run);
            assert!(args.out.is_none());
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_generate_full() {
        let cli = Cli::try_parse_from([
            "scribe",
            "-vv",
            "generate",
            "product-description",
            "--language",
            "tamil",
            "--field",
            "product_name=X200",
            "-f",
            "features=fast, light",
            "--no-context",
            "--out",
            "x200.md",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.content_type, ContentType::ProductDescription);
            assert_eq!(args.language, Language::Tamil);
            assert_eq!(args.fields.len(), 2);
            assert_eq!(args.fields[1].1, "fast, light");
            assert!(args.no_context);
            assert!(args.dry_run);
            assert_eq!(args.out, Some(PathBuf::from("x200.md")));
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_field_keeps_equals_in_value() {
        assert_eq!(
            parse_field("topic=a=b").unwrap(),
            ("topic".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_field("topic=").unwrap(),
            ("topic".to_string(), String::new())
        );
    }

    #[test]
    fn parse_field_rejects_malformed() {
        assert!(parse_field("topic").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn parse_generate_rejects_unknown_content_type() {
        assert!(Cli::try_parse_from(["scribe", "generate", "poem"]).is_err());
    }

    #[test]
    fn parse_templates_filters() {
        let cli = Cli::try_parse_from([
            "scribe",
            "templates",
            "--content-type",
            "seo-content",
            "--language",
            "english",
            "--show",
        ])
        .unwrap();
        if let Command::Templates(args) = cli.command {
            assert_eq!(args.content_type, Some(ContentType::SeoContent));
            assert_eq!(args.language, Some(Language::English));
            assert!(args.show);
        } else {
            panic!("Expected Templates command");
        }
    }

    #[test]
    fn parse_index_build() {
        let cli = Cli::try_parse_from([
            "scribe",
            "index",
            "build",
            "docs",
            "notes.txt",
            "--include",
            "**/*.md,**/*.rst",
            "--sample",
        ])
        .unwrap();
        if let Command::Index(IndexCommand {
            action: IndexAction::Build(args),
        }) = cli.command
        {
            assert_eq!(
                args.paths,
                vec![PathBuf::from("docs"), PathBuf::from("notes.txt")]
            );
            assert_eq!(args.include, vec!["**/*.md", "**/*.rst"]);
            assert!(args.sample);
        } else {
            panic!("Expected Index Build command");
        }
    }

    #[test]
    fn parse_index_query() {
        let cli = Cli::try_parse_from(["scribe", "index", "query", "healthy diet", "-k", "5"])
            .unwrap();
        if let Command::Index(IndexCommand {
            action: IndexAction::Query(args),
        }) = cli.command
        {
            assert_eq!(args.query, "healthy diet");
            assert_eq!(args.top_k, Some(5));
        } else {
            panic!("Expected Index Query command");
        }
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["scribe", "config", "--path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { path: true })));
    }
}
