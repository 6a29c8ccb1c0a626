//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treebal/treebal.toml`
//! 3. Local config: `<config_dir>/.treebal.toml` (default: current directory)
//! 4. Environment variables: `TREEBAL_*` prefix
//!
//! Command-line flags are applied on top by the command layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CheckerConfig, Strategy, DEFAULT_MAX_DEPTH, MAX_RECURSIVE_DEPTH};

/// Levels rendered by `show` unless configured otherwise.
pub const DEFAULT_DISPLAY_DEPTH: usize = 32;

/// Upper bound for `display_depth`; rendering recurses once per level.
pub const MAX_DISPLAY_DEPTH: usize = 1024;

/// Unified configuration for treebal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Traversal depth limit for balance checks
    pub max_depth: usize,
    /// Traversal strategy (recursive or iterative)
    pub strategy: Strategy,
    /// Levels rendered when displaying a tree
    pub display_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: Strategy::default(),
            display_depth: DEFAULT_DISPLAY_DEPTH,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub max_depth: Option<usize>,
    pub strategy: Option<Strategy>,
    pub display_depth: Option<usize>,
}

/// Get the XDG config directory for treebal.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treebal").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treebal.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treebal.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where it is specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            strategy: overlay.strategy.unwrap_or(self.strategy),
            display_depth: overlay.display_depth.unwrap_or(self.display_depth),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding a local `.treebal.toml` (default: cwd)
    pub fn load(config_dir: Option<&Path>) -> ApplicationResult<Self> {
        let local_dir = match config_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => std::env::current_dir().ok(),
        };
        Self::load_from(global_config_path().as_deref(), local_dir.as_deref())
    }

    /// Load settings from explicit global file and local directory.
    ///
    /// Missing files are skipped; present but malformed files are errors.
    pub fn load_from(global: Option<&Path>, local_dir: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply TREEBAL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEBAL").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = parse_count("TREEBAL_MAX_DEPTH", &val)?;
        }
        if let Ok(val) = config.get_string("strategy") {
            settings.strategy = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("TREEBAL_STRATEGY: {}", e),
            })?;
        }
        if let Ok(val) = config.get_string("display_depth") {
            settings.display_depth = parse_count("TREEBAL_DISPLAY_DEPTH", &val)?;
        }

        Ok(settings)
    }

    /// Reject settings no check could run with.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.checker_config().exceeds_stack_budget() {
            return Err(ApplicationError::Config {
                message: format!(
                    "max_depth must be at most {} with the recursive strategy",
                    MAX_RECURSIVE_DEPTH
                ),
            });
        }
        if !(1..=MAX_DISPLAY_DEPTH).contains(&self.display_depth) {
            return Err(ApplicationError::Config {
                message: format!("display_depth must be between 1 and {}", MAX_DISPLAY_DEPTH),
            });
        }
        Ok(())
    }

    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            max_depth: self.max_depth,
            strategy: self.strategy,
        }
    }

    /// Render as TOML (the format of the config files).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn parse_count(name: &str, val: &str) -> ApplicationResult<usize> {
    val.trim()
        .parse::<usize>()
        .map_err(|e| ApplicationError::Config {
            message: format!("{}: '{}': {}", name, val, e),
        })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
