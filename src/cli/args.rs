//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{Side, Strategy};

/// Height-balance verification for binary trees
#[derive(Parser, Debug)]
#[command(name = "treebal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .treebal.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a tree is height-balanced
    Check {
        #[command(flatten)]
        input: TreeInput,

        #[command(flatten)]
        limits: CheckArgs,
    },

    /// Display a tree
    Show {
        #[command(flatten)]
        input: TreeInput,

        /// Print level-order notation instead of a drawing
        #[arg(long)]
        flat: bool,
    },

    /// Build a degenerate single-child chain and check it
    Chain {
        /// Number of nodes
        #[arg(short, long)]
        length: usize,

        /// Side every child hangs off
        #[arg(short, long, default_value = "left")]
        side: Side,

        #[command(flatten)]
        limits: CheckArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Tree input: inline level-order text, a level-order file or a TOML node table.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TreeInput {
    /// Level-order notation, e.g. "[1,2,3,null,4]"
    pub tree: Option<String>,

    /// File containing level-order notation
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// TOML node table (root + [[nodes]] with value/left/right)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub table: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Maximum traversal depth (overrides config). At most 8192 with the recursive
    /// strategy; deeper limits need --strategy iterative
    #[arg(short, long)]
    pub max_depth: Option<usize>,

    /// Traversal strategy: recursive or iterative (overrides config)
    #[arg(long)]
    pub strategy: Option<Strategy>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
