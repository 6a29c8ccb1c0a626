//! Balance check service
//!
//! Loads trees from the supported inputs and runs the balance check with the configured
//! limits.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    BalanceChecker, NodeTable, Report, Side, Strategy, TreeArena, TreeBuilder, TreeDisplay,
    MAX_RECURSIVE_DEPTH,
};
use crate::infrastructure::traits::FileSystem;

/// Where a tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    /// Level-order notation given inline
    LevelOrder(String),
    /// File containing level-order notation
    LevelOrderFile(PathBuf),
    /// TOML node table
    TableFile(PathBuf),
}

/// A loaded tree, in whichever representation its source produces.
#[derive(Debug, Clone)]
pub enum LoadedTree {
    Arena(TreeArena<i64>),
    Table(NodeTable<i64>),
}

impl LoadedTree {
    pub fn check(&self, checker: &BalanceChecker) -> ApplicationResult<Report> {
        let report = match self {
            LoadedTree::Arena(tree) => checker.check(tree)?,
            LoadedTree::Table(table) => checker.check(table)?,
        };
        Ok(report)
    }

    pub fn render(&self, max_depth: usize) -> String {
        match self {
            LoadedTree::Arena(tree) => tree.to_tree_string(max_depth).to_string(),
            LoadedTree::Table(table) => table.to_tree_string(max_depth).to_string(),
        }
    }
}

/// Per-invocation overrides of the configured checker settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOverrides {
    pub max_depth: Option<usize>,
    pub strategy: Option<Strategy>,
}

/// Service running balance checks.
pub struct BalanceService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
}

impl BalanceService {
    pub fn new(settings: Arc<Settings>, fs: Arc<dyn FileSystem>) -> Self {
        Self { settings, fs }
    }

    /// Checker from settings with `overrides` applied.
    pub fn checker(&self, overrides: &CheckOverrides) -> ApplicationResult<BalanceChecker> {
        let mut config = self.settings.checker_config();
        if let Some(max_depth) = overrides.max_depth {
            if max_depth == 0 {
                return Err(ApplicationError::Config {
                    message: "max_depth must be at least 1".to_string(),
                });
            }
            config.max_depth = max_depth;
        }
        if let Some(strategy) = overrides.strategy {
            config.strategy = strategy;
        }
        if config.exceeds_stack_budget() {
            return Err(ApplicationError::Config {
                message: format!(
                    "max_depth {} is above {} for the recursive strategy, use --strategy iterative",
                    config.max_depth, MAX_RECURSIVE_DEPTH
                ),
            });
        }
        Ok(BalanceChecker::new(config))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, source: &TreeSource) -> ApplicationResult<LoadedTree> {
        let builder = TreeBuilder::new();
        let tree = match source {
            TreeSource::LevelOrder(text) => LoadedTree::Arena(builder.from_level_order(text)?),
            TreeSource::LevelOrderFile(path) => {
                let text = self.read(path)?;
                LoadedTree::Arena(builder.from_level_order(&text)?)
            }
            TreeSource::TableFile(path) => {
                let text = self.read(path)?;
                let table =
                    NodeTable::from_toml_str(&text).map_err(|e| ApplicationError::InvalidTable {
                        path: path.clone(),
                        message: e.message().to_string(),
                    })?;
                LoadedTree::Table(table)
            }
        };
        Ok(tree)
    }

    /// Load the tree and check it.
    #[instrument(level = "debug", skip(self))]
    pub fn check(
        &self,
        source: &TreeSource,
        overrides: &CheckOverrides,
    ) -> ApplicationResult<Report> {
        let checker = self.checker(overrides)?;
        let tree = self.load(source)?;
        let report = tree.check(&checker)?;
        debug!(?report, "checked {:?}", source);
        Ok(report)
    }

    /// Build a degenerate chain of `length` nodes and check it.
    #[instrument(level = "debug", skip(self))]
    pub fn check_chain(
        &self,
        length: usize,
        side: Side,
        overrides: &CheckOverrides,
    ) -> ApplicationResult<Report> {
        let checker = self.checker(overrides)?;
        let tree = TreeArena::chain(length, side);
        Ok(checker.check(&tree)?)
    }

    /// Terminal rendering, limited to the configured display depth.
    pub fn render(&self, source: &TreeSource) -> ApplicationResult<String> {
        let tree = self.load(source)?;
        Ok(tree.render(self.settings.display_depth))
    }

    /// Level-order notation of an inline or file source. Node tables have none.
    pub fn level_order(&self, source: &TreeSource) -> ApplicationResult<Option<String>> {
        match self.load(source)? {
            LoadedTree::Arena(tree) => Ok(Some(TreeBuilder::new().to_level_order(&tree))),
            LoadedTree::Table(_) => Ok(None),
        }
    }

    fn read(&self, path: &Path) -> ApplicationResult<String> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("read tree: {}", path.display()),
                source: "not a regular file".into(),
            });
        }
        self.fs
            .read_to_string(path)
            .with_path_context("read tree", path)
    }
}
