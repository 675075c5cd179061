//! Layered configuration
//!
//! Lowest to highest precedence: built-in defaults, the user config file,
//! the repository's `.merge-radar.toml`, then command-line flags.

use crate::error::{Error, Result};
use crate::merge::DEFAULT_CONCURRENCY;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the per-repository config at the repository root.
pub const REPO_CONFIG_FILE: &str = ".merge-radar.toml";

/// Directory name under the platform config dir.
const APP_DIR: &str = "merge-radar";

/// Filename of the user config.
const USER_CONFIG_FILE: &str = "config.toml";

/// Effective settings after all layers are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base branch to diff against (auto-detected when unset)
    pub base: Option<String>,
    /// Branches to analyze (worktree branches when empty)
    pub branches: Vec<String>,
    /// Glob patterns for paths excluded from overlap detection
    pub ignore: Vec<String>,
    /// Maximum simultaneous git operations
    pub concurrency: usize,
    /// Dry-merge only pairs sharing an overlapping file
    pub only_overlapping: bool,
    /// Timeout for a whole dry-merge batch, in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: None,
            branches: Vec::new(),
            ignore: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            only_overlapping: true,
            timeout_secs: None,
        }
    }
}

/// One config file; every field optional so layers can be merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    /// See [`Config::base`]
    pub base: Option<String>,
    /// See [`Config::branches`]
    pub branches: Option<Vec<String>>,
    /// See [`Config::ignore`]
    pub ignore: Option<Vec<String>>,
    /// See [`Config::concurrency`]
    pub concurrency: Option<usize>,
    /// See [`Config::only_overlapping`]
    pub only_overlapping: Option<bool>,
    /// See [`Config::timeout_secs`]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Apply a layer on top of the current settings
    ///
    /// Scalars present in the layer replace the current value. `ignore`
    /// patterns accumulate across layers; `branches` replace.
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(base) = layer.base {
            self.base = Some(base);
        }
        if let Some(branches) = layer.branches {
            self.branches = branches;
        }
        if let Some(ignore) = layer.ignore {
            for pattern in ignore {
                if !self.ignore.contains(&pattern) {
                    self.ignore.push(pattern);
                }
            }
        }
        if let Some(concurrency) = layer.concurrency {
            self.concurrency = concurrency.max(1);
        }
        if let Some(only_overlapping) = layer.only_overlapping {
            self.only_overlapping = only_overlapping;
        }
        if let Some(timeout) = layer.timeout_secs {
            self.timeout_secs = Some(timeout);
        }
    }

    /// Load defaults, then the user config, then the repository config
    pub fn load(repo_root: &Path) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = user_config_path() {
            config.apply(load_layer(&path)?);
        }
        config.apply(load_layer(&repo_config_path(repo_root))?);
        Ok(config)
    }
}

/// Path of the user config file, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(USER_CONFIG_FILE))
}

/// Path of the repository config file
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(REPO_CONFIG_FILE)
}

/// Load one config file.
///
/// Returns an empty layer if the file doesn't exist.
pub fn load_layer(path: &Path) -> Result<ConfigLayer> {
    if !path.exists() {
        return Ok(ConfigLayer::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}
