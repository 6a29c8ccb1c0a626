//! treebal: height-balance verification for binary trees
//!
//! Layers:
//! - `domain`: tree representations and the balance check
//! - `application`: services loading trees and running checks
//! - `infrastructure`: filesystem seam and service wiring
//! - `cli`: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    BalanceChecker, BalanceError, BinaryTree, CheckerConfig, Height, NodeTable, Report, Side,
    Strategy, TreeArena, TreeBuilder, Verdict, DEFAULT_MAX_DEPTH,
};
