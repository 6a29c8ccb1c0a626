//! Domain layer: tree structures and the balance check
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod balance;
pub mod builder;
pub mod error;
pub mod height;
pub mod table;
pub mod traits;

pub use arena::{BinaryNode, Side, TreeArena};
pub use balance::{
    BalanceChecker, CheckerConfig, Report, Strategy, Verdict, DEFAULT_MAX_DEPTH,
    MAX_RECURSIVE_DEPTH,
};
pub use builder::TreeBuilder;
pub use error::{BalanceError, DomainError, TreeResult};
pub use height::Height;
pub use table::{NodeTable, TableNode};
pub use traits::{BinaryTree, NodeView, TreeDisplay};
