//! Implementation of the `scribe config` command.

use super::{load_workspace, output_error, write_block};
use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::Result;
use crate::workspace::Workspace;
use std::io::Write;

/// Execute the `scribe config` command.
///
/// Prints the effective configuration (file values over defaults), or with
/// `--path` the location of the config file.
pub fn cmd_config(args: ConfigArgs) -> Result<()> {
    let (workspace, config) = load_workspace()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_config(&workspace, &config, args.path, &mut out)
}

fn write_config(
    workspace: &Workspace,
    config: &Config,
    path_only: bool,
    out: &mut impl Write,
) -> Result<()> {
    if path_only {
        if workspace.config_found {
            writeln!(out, "{}", workspace.config_path.display()).map_err(output_error)?;
        } else {
            writeln!(
                out,
                "{} (not found; using defaults)",
                workspace.config_path.display()
            )
            .map_err(output_error)?;
        }
        return Ok(());
    }

    write_block(out, &config.to_yaml()?)
}
