//! Level-order tree notation.
//!
//! Trees are written as their breadth-first node sequence with `null` for absent
//! children, e.g. `[1,2,3,null,4]`: children are assigned two at a time to the present
//! nodes of the previous level, left first. Brackets are optional, whitespace is ignored
//! and trailing `null`s may be dropped.

use std::collections::VecDeque;
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{Side, TreeArena};
use crate::domain::error::{DomainError, TreeResult};

const NULL_MARKERS: [&str; 3] = ["null", "none", "#"];

/// Builds arena trees from level-order notation and writes them back.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    pub fn from_level_order(&self, text: &str) -> TreeResult<TreeArena<i64>> {
        let tokens = tokenize(text)?;
        let mut tree = TreeArena::with_capacity(tokens.len());

        let mut tokens = tokens.into_iter().enumerate();
        let root = match tokens.next() {
            None | Some((_, None)) => {
                if let Some((position, _)) = tokens.find(|(_, t)| t.is_some()) {
                    return Err(DomainError::InvalidSyntax {
                        position,
                        message: "value after an empty root".to_string(),
                    });
                }
                return Ok(tree);
            }
            Some((_, Some(value))) => tree.insert(value),
        };
        tree.set_root(Some(root))?;

        let mut parents: VecDeque<Index> = VecDeque::from([root]);
        let mut slots: VecDeque<(Index, Side)> = VecDeque::new();
        for (position, token) in tokens {
            if slots.is_empty() {
                match parents.pop_front() {
                    Some(parent) => {
                        slots.push_back((parent, Side::Left));
                        slots.push_back((parent, Side::Right));
                    }
                    None => {
                        return Err(DomainError::InvalidSyntax {
                            position,
                            message: "no parent left for this position".to_string(),
                        })
                    }
                }
            }
            let Some((parent, side)) = slots.pop_front() else {
                continue;
            };
            if let Some(value) = token {
                let child = tree.insert_child(parent, side, value)?;
                parents.push_back(child);
            }
        }

        debug!(nodes = tree.len(), "parsed level-order tree");
        Ok(tree)
    }

    /// Level-order notation of `tree`, trailing `null`s trimmed.
    pub fn to_level_order<T: fmt::Display>(&self, tree: &TreeArena<T>) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut queue: VecDeque<Option<Index>> = VecDeque::from([tree.root()]);
        if tree.root().is_none() {
            return "[]".to_string();
        }
        while let Some(entry) = queue.pop_front() {
            match entry.and_then(|idx| tree.get(idx)) {
                Some(node) => {
                    out.push(node.value.to_string());
                    queue.push_back(node.left);
                    queue.push_back(node.right);
                }
                None => out.push("null".to_string()),
            }
        }
        while out.last().is_some_and(|t| t == "null") {
            out.pop();
        }
        format!("[{}]", out.join(","))
    }
}

/// Split into values (`Some`) and absent markers (`None`).
fn tokenize(text: &str) -> TreeResult<Vec<Option<i64>>> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .enumerate()
        .map(|(position, raw)| {
            let token = raw.trim();
            if token.is_empty() {
                return Err(DomainError::InvalidSyntax {
                    position,
                    message: "empty token".to_string(),
                });
            }
            if NULL_MARKERS.iter().any(|m| token.eq_ignore_ascii_case(m)) {
                return Ok(None);
            }
            token
                .parse::<i64>()
                .map(Some)
                .map_err(|e| DomainError::InvalidSyntax {
                    position,
                    message: format!("'{}': {}", token, e),
                })
        })
        .collect()
}
