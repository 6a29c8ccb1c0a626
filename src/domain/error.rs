//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent misuse of the tree structures and malformed tree input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in arena: {0:?}")]
    NodeNotFound(Index),

    #[error("node already has a parent or is the root: {0:?}")]
    AlreadyAttached(Index),

    #[error("attaching {child:?} below {parent:?} would create a cycle")]
    CycleDetected { parent: Index, child: Index },

    #[error("invalid tree syntax at token {position}: {message}")]
    InvalidSyntax { position: usize, message: String },

    #[error("unknown traversal strategy: {0} (expected 'recursive' or 'iterative')")]
    UnknownStrategy(String),

    #[error("unknown side: {0} (expected 'left' or 'right')")]
    UnknownSide(String),
}

/// Failures that abort a balance check.
///
/// These are distinct from the negative verdict: an unbalanced tree is a valid answer,
/// while each of these means no answer could be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("depth limit exceeded: traversal reached depth {depth}, limit is {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("height overflow: subtree height would exceed {limit}")]
    HeightOverflow { limit: String },

    #[error("invalid child reference: {reference}")]
    InvalidReference { reference: String },

    #[error("not a tree: more nodes reached than the {nodes} stored, a node is shared or on a cycle")]
    NotATree { nodes: usize },
}

impl BalanceError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BalanceError::DepthExceeded { .. } => "DepthExceeded",
            BalanceError::HeightOverflow { .. } => "HeightOverflow",
            BalanceError::InvalidReference { .. } => "InvalidReference",
            BalanceError::NotATree { .. } => "NotATree",
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
