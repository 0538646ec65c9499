//! Implementation of the `scribe templates` command.
//!
//! Lists every registered template with its source and declared placeholders,
//! optionally narrowed to one content type or language. `--show` prints the
//! bodies as well.

use super::{load_workspace, output_error, write_block};
use crate::cli::TemplatesArgs;
use crate::error::{Result, ScribeError};
use crate::template::{Template, TemplateRegistry};
use std::io::Write;

/// Execute the `scribe templates` command.
pub fn cmd_templates(args: TemplatesArgs) -> Result<()> {
    let (_, config) = load_workspace()?;
    let registry = config.template_registry()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_templates(&registry, &args, &mut out)
}

fn matches_filter(template: &Template, args: &TemplatesArgs) -> bool {
    args.content_type
        .is_none_or(|ct| template.id.content_type == ct)
        && args.language.is_none_or(|lang| template.id.language == lang)
}

fn write_templates(
    registry: &TemplateRegistry,
    args: &TemplatesArgs,
    out: &mut impl Write,
) -> Result<()> {
    let selected: Vec<&Template> = registry
        .iter()
        .filter(|template| matches_filter(template, args))
        .collect();

    if selected.is_empty() {
        return Err(ScribeError::UserError(
            "no templates match the given filters".to_string(),
        ));
    }

    for template in selected {
        writeln!(
            out,
            "{} ({}) placeholders: {}",
            template.id,
            template.source,
            template.placeholders.join(", ")
        )
        .map_err(output_error)?;

        if args.show {
            writeln!(out, "{}", "-".repeat(80)).map_err(output_error)?;
            write_block(out, &template.body)?;
            writeln!(out).map_err(output_error)?;
        }
    }

    Ok(())
}
