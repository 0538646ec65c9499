//! Project workspace resolution for scribe.
//!
//! A workspace is the directory holding `scribe.yaml`. It is found by walking
//! up from the working directory, so commands behave the same from any
//! subdirectory of a project. When no config file exists anywhere above, the
//! working directory itself is the workspace and defaults apply.
//!
//! Relative paths in the config (index, audit log) are resolved against the
//! workspace root, never against the working directory.

use crate::config::Config;
use crate::error::{Result, ScribeError};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the config file that marks a workspace root.
pub const CONFIG_FILE_NAME: &str = "scribe.yaml";

/// Directory (under the root) holding the index and audit log by default.
pub const STATE_DIR: &str = ".scribe";

/// Resolved workspace paths. All paths are absolute when resolved from an
/// absolute directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing `scribe.yaml`, or the starting directory if none.
    pub root: PathBuf,

    /// Path of the config file (it may not exist).
    pub config_path: PathBuf,

    /// Whether `config_path` was found on disk.
    pub config_found: bool,
}

impl Workspace {
    /// Resolve the workspace from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            ScribeError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::resolve_from(&cwd))
    }

    /// Resolve the workspace from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Self {
        let start = start.as_ref();

        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self {
                    root: dir.to_path_buf(),
                    config_path: candidate,
                    config_found: true,
                };
            }
        }

        Self {
            root: start.to_path_buf(),
            config_path: start.join(CONFIG_FILE_NAME),
            config_found: false,
        }
    }

    /// Load the workspace config, or defaults when there is no config file.
    pub fn load_config(&self) -> Result<Config> {
        if self.config_found {
            tracing::debug!(path = %self.config_path.display(), "loading config");
            Config::load(&self.config_path)
        } else {
            tracing::debug!(root = %self.root.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Resolve a config-relative path against the workspace root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    pub fn index_path(&self, config: &Config) -> PathBuf {
        self.resolve_path(&config.retrieval.index_path)
    }

    pub fn events_path(&self, config: &Config) -> PathBuf {
        self.resolve_path(&config.events.path)
    }
}
