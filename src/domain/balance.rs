//! Height-balance verification.
//!
//! A tree is balanced when, at every node, the heights of the two child subtrees differ by
//! at most one. Heights are counted in nodes: the empty subtree has height 0, a single node
//! height 1.
//!
//! The check is a single post-order pass that computes heights bottom-up and stops at the
//! first unbalanced node; the right subtree of a node whose left subtree is already
//! unbalanced is never visited. Two guards turn resource problems into errors: a depth
//! limit (deep input) and a checked height increment (narrow height types).
//! A link the tree cannot resolve aborts the check with `InvalidReference`. Trees that
//! report a node count (unvalidated tables) are also held to it: resolving more nodes than
//! stored means a shared node or a cycle, reported as `NotATree`.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{BalanceError, DomainError};
use crate::domain::height::Height;
use crate::domain::traits::{BinaryTree, NodeView};

/// Default traversal depth limit, well below what the native stack can take.
pub const DEFAULT_MAX_DEPTH: usize = 2048;

/// Deepest limit accepted for the recursive strategy. Deeper inputs need
/// `Strategy::Iterative`, whose stack lives on the heap.
pub const MAX_RECURSIVE_DEPTH: usize = 8192;

/// How the tree is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Native recursion, one stack frame per level
    #[default]
    Recursive,
    /// Explicit work-list on the heap; depth is limited only by `max_depth`
    Iterative,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Recursive => write!(f, "recursive"),
            Strategy::Iterative => write!(f, "iterative"),
        }
    }
}

impl FromStr for Strategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(Strategy::Recursive),
            "iterative" => Ok(Strategy::Iterative),
            _ => Err(DomainError::UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Number of levels the traversal may enter; the root is level 0.
    pub max_depth: usize,
    pub strategy: Strategy,
}

impl CheckerConfig {
    /// Whether a recursive check could run out of native stack before the depth guard
    /// trips.
    pub fn exceeds_stack_budget(&self) -> bool {
        self.strategy == Strategy::Recursive && self.max_depth > MAX_RECURSIVE_DEPTH
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: Strategy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<H = u64> {
    Balanced { height: H },
    Unbalanced,
}

impl<H: Copy> Verdict<H> {
    pub fn is_balanced(&self) -> bool {
        matches!(self, Verdict::Balanced { .. })
    }

    pub fn height(&self) -> Option<H> {
        match self {
            Verdict::Balanced { height } => Some(*height),
            Verdict::Unbalanced => None,
        }
    }
}

/// Outcome of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report<H = u64> {
    pub verdict: Verdict<H>,
    /// Nodes resolved before the check finished or short-circuited
    pub nodes_visited: usize,
}

/// Balance checker, generic over the height representation.
#[derive(Debug, Clone, Copy)]
pub struct BalanceChecker<H = u64> {
    config: CheckerConfig,
    _height: PhantomData<H>,
}

impl<H: Height> Default for BalanceChecker<H> {
    fn default() -> Self {
        Self::new(CheckerConfig::default())
    }
}

impl<H: Height> BalanceChecker<H> {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            _height: PhantomData,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check the whole tree, starting at its root.
    pub fn check<B: BinaryTree>(&self, tree: &B) -> Result<Report<H>, BalanceError> {
        self.check_from(tree, tree.root())
    }

    pub fn is_balanced<B: BinaryTree>(&self, tree: &B) -> Result<bool, BalanceError> {
        self.check(tree).map(|report| report.verdict.is_balanced())
    }

    /// Check the subtree hanging off `root` (`None` is the empty tree).
    #[instrument(level = "debug", skip_all, fields(strategy = %self.config.strategy, max_depth = self.config.max_depth))]
    pub fn check_from<B: BinaryTree>(
        &self,
        tree: &B,
        root: Option<B::Handle>,
    ) -> Result<Report<H>, BalanceError> {
        let mut tally = Tally {
            visited: 0,
            limit: tree.node_count(),
        };
        let outcome = match self.config.strategy {
            Strategy::Recursive => self.visit(tree, root, 0, &mut tally),
            Strategy::Iterative => self.walk(tree, root, &mut tally),
        };
        let nodes_visited = tally.visited;
        let verdict = match outcome {
            Ok(Some(height)) => Verdict::Balanced { height },
            Ok(None) => Verdict::Unbalanced,
            Err(e) => {
                debug!(kind = e.kind(), nodes_visited, "check aborted: {}", e);
                return Err(e);
            }
        };
        debug!(?verdict, nodes_visited, "check finished");
        Ok(Report {
            verdict,
            nodes_visited,
        })
    }

    /// Recursive post-order pass. `Ok(None)` means "unbalanced below here".
    fn visit<B: BinaryTree>(
        &self,
        tree: &B,
        link: Option<B::Handle>,
        depth: usize,
        tally: &mut Tally,
    ) -> Result<Option<H>, BalanceError> {
        let Some(handle) = link else {
            return Ok(Some(H::ZERO));
        };
        let node = self.enter(tree, handle, depth, tally)?;

        let Some(left) = self.visit(tree, node.left, depth + 1, tally)? else {
            return Ok(None);
        };
        let Some(right) = self.visit(tree, node.right, depth + 1, tally)? else {
            return Ok(None);
        };
        combine(left, right)
    }

    /// Same pass as `visit`, driven by an explicit stack of pending nodes.
    fn walk<B: BinaryTree>(
        &self,
        tree: &B,
        root: Option<B::Handle>,
        tally: &mut Tally,
    ) -> Result<Option<H>, BalanceError> {
        struct Frame<L, H> {
            depth: usize,
            right: Option<L>,
            left_height: Option<H>,
        }

        let mut stack: Vec<Frame<B::Handle, H>> = Vec::new();
        let mut pending = Some((root, 0usize));
        // height of the subtree finished most recently
        let mut finished = H::ZERO;

        loop {
            if let Some((link, depth)) = pending.take() {
                match link {
                    Some(handle) => {
                        let node = self.enter(tree, handle, depth, tally)?;
                        stack.push(Frame {
                            depth,
                            right: node.right,
                            left_height: None,
                        });
                        pending = Some((node.left, depth + 1));
                        continue;
                    }
                    None => finished = H::ZERO,
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(Some(finished));
            };
            match frame.left_height {
                None => {
                    frame.left_height = Some(finished);
                    pending = Some((frame.right, frame.depth + 1));
                }
                Some(left) => {
                    stack.pop();
                    match combine(left, finished)? {
                        Some(height) => finished = height,
                        None => return Ok(None),
                    }
                }
            }
        }
    }

    fn enter<'t, B: BinaryTree>(
        &self,
        tree: &'t B,
        handle: B::Handle,
        depth: usize,
        tally: &mut Tally,
    ) -> Result<NodeView<'t, B::Handle, B::Value>, BalanceError> {
        if depth >= self.config.max_depth {
            trace!(depth, max_depth = self.config.max_depth, "depth guard tripped");
            return Err(BalanceError::DepthExceeded {
                depth,
                max_depth: self.config.max_depth,
            });
        }
        let node = tree.node(handle).ok_or_else(|| {
            trace!(?handle, depth, "unresolvable child reference");
            BalanceError::InvalidReference {
                reference: format!("{:?}", handle),
            }
        })?;
        tally.visited += 1;
        if let Some(nodes) = tally.limit {
            if tally.visited > nodes {
                trace!(?handle, depth, nodes, "node reached twice");
                return Err(BalanceError::NotATree { nodes });
            }
        }
        Ok(node)
    }
}

/// Nodes resolved so far, and the most a proper tree could yield.
struct Tally {
    visited: usize,
    limit: Option<usize>,
}

fn combine<H: Height>(left: H, right: H) -> Result<Option<H>, BalanceError> {
    if left.differs_by_more_than_one(right) {
        trace!(%left, %right, "subtree heights differ by more than one");
        return Ok(None);
    }
    match left.max(right).checked_succ() {
        Some(height) => Ok(Some(height)),
        None => Err(BalanceError::HeightOverflow {
            limit: H::MAX.to_string(),
        }),
    }
}
