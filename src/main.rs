//! Scribe: multilingual content generation with retrieval-augmented prompts.
//!
//! This is the main entry point for the `scribe` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod assembler;
mod cli;
mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod generation;
mod pipeline;
pub mod retrieval;
pub mod template;
pub mod workspace;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `scribe=debug`.
const LOG_ENV: &str = "SCRIBE_LOG";

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "scribe=warn",
        1 => "scribe=info",
        _ => "scribe=debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries only generated content.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already hold the key.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
