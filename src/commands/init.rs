//! Implementation of the `scribe init` command.
//!
//! Writes a `scribe.yaml` holding every default value to the current
//! directory, which makes that directory a workspace root. An existing file
//! is never overwritten.

use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::fs::atomic_write_file;
use crate::workspace::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

const CONFIG_HEADER: &str = "\
# scribe configuration
#
# Every key is optional; omitted keys keep the defaults shown here.
# The API key itself is read from the environment variable named by
# generation.api_key_env (a .env file in the working directory is loaded).
";

/// Execute the `scribe init` command.
pub fn cmd_init() -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        ScribeError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    let path = init_at(&cwd)?;
    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  scribe index build --sample           # seed the knowledge index");
    println!("  scribe generate blog-post -f topic=AI # generate content");
    Ok(())
}

/// Write the default config into `dir`, returning its path.
fn init_at(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(ScribeError::UserError(format!(
            "{} already exists at '{}'; edit it or remove it first",
            CONFIG_FILE_NAME,
            path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&path, &format!("{}\n{}", CONFIG_HEADER, yaml))?;
    Ok(path)
}
