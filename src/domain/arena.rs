use std::fmt;
use std::str::FromStr;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::traits::{BinaryTree, NodeView};

/// Child slot of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(DomainError::UnknownSide(s.to_string())),
        }
    }
}

/// Tree node in the arena-based binary tree.
#[derive(Debug, Clone)]
pub struct BinaryNode<T> {
    /// Payload, opaque to the balance check
    pub value: T,
    /// Index of parent node in the arena, None for the root and detached nodes
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

impl<T> BinaryNode<T> {
    fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Index> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-based binary tree.
///
/// Parents own their children through arena indices. Every link is validated when it is
/// made: a node can have at most one parent and no node can become its own ancestor, so a
/// tree built through this API is always a proper tree. Handles to released nodes go stale
/// (generation mismatch) instead of dangling.
#[derive(Debug, Clone)]
pub struct TreeArena<T> {
    arena: Arena<BinaryNode<T>>,
    root: Option<Index>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            root: None,
        }
    }

    /// Insert a detached node. It becomes reachable once attached or made the root.
    pub fn insert(&mut self, value: T) -> Index {
        self.arena.insert(BinaryNode {
            value,
            parent: None,
            left: None,
            right: None,
        })
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<Index>) -> TreeResult<()> {
        if let Some(idx) = root {
            let node = self.get(idx).ok_or(DomainError::NodeNotFound(idx))?;
            if node.parent.is_some() {
                return Err(DomainError::AlreadyAttached(idx));
            }
        }
        self.root = root;
        Ok(())
    }

    pub fn get(&self, idx: Index) -> Option<&BinaryNode<T>> {
        self.arena.get(idx)
    }

    pub fn value(&self, idx: Index) -> Option<&T> {
        self.arena.get(idx).map(|n| &n.value)
    }

    pub fn value_mut(&mut self, idx: Index) -> Option<&mut T> {
        self.arena.get_mut(idx).map(|n| &mut n.value)
    }

    pub fn left(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.left)
    }

    pub fn right(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.right)
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Link `child` into the `side` slot of `parent`.
    ///
    /// Returns the previous occupant of the slot, now detached. `child = None` clears the
    /// slot. Rejects children that already hang somewhere (or are the root) and links that
    /// would close a cycle.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(
        &mut self,
        parent: Index,
        side: Side,
        child: Option<Index>,
    ) -> TreeResult<Option<Index>> {
        if !self.arena.contains(parent) {
            return Err(DomainError::NodeNotFound(parent));
        }
        if let Some(c) = child {
            let node = self.arena.get(c).ok_or(DomainError::NodeNotFound(c))?;
            if node.parent.is_some() || self.root == Some(c) {
                return Err(DomainError::AlreadyAttached(c));
            }
            if self.is_ancestor_or_self(c, parent) {
                return Err(DomainError::CycleDetected { parent, child: c });
            }
        }

        let previous = match self.arena.get_mut(parent) {
            Some(p) => std::mem::replace(p.slot_mut(side), child),
            None => return Err(DomainError::NodeNotFound(parent)),
        };
        if let Some(prev) = previous {
            if let Some(n) = self.arena.get_mut(prev) {
                n.parent = None;
            }
        }
        if let Some(c) = child {
            if let Some(n) = self.arena.get_mut(c) {
                n.parent = Some(parent);
            }
        }
        Ok(previous)
    }

    pub fn detach(&mut self, parent: Index, side: Side) -> TreeResult<Option<Index>> {
        self.attach(parent, side, None)
    }

    pub fn insert_child(&mut self, parent: Index, side: Side, value: T) -> TreeResult<Index> {
        if !self.arena.contains(parent) {
            return Err(DomainError::NodeNotFound(parent));
        }
        let child = self.insert(value);
        // fresh node: cannot already hang somewhere or be an ancestor of `parent`
        let previous = match self.arena.get_mut(parent) {
            Some(p) => p.slot_mut(side).replace(child),
            None => return Err(DomainError::NodeNotFound(parent)),
        };
        if let Some(n) = self.arena.get_mut(child) {
            n.parent = Some(parent);
            // slot was occupied: the old subtree goes below the new node
            *n.slot_mut(side) = previous;
        }
        if let Some(prev) = previous.and_then(|idx| self.arena.get_mut(idx)) {
            prev.parent = Some(child);
        }
        Ok(child)
    }

    /// Insert a new root above the current one; the old root hangs off `side`.
    pub fn push_root(&mut self, value: T, side: Side) -> Index {
        let new_root = self.insert(value);
        if let Some(old_root) = self.root {
            if let Some(n) = self.arena.get_mut(new_root) {
                *n.slot_mut(side) = Some(old_root);
            }
            if let Some(n) = self.arena.get_mut(old_root) {
                n.parent = Some(new_root);
            }
        }
        self.root = Some(new_root);
        new_root
    }

    /// Release a subtree: removes `idx` and all its descendants, unlinking it from its
    /// parent. Handles into the released subtree go stale. Returns the number of nodes
    /// removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        let Some(node) = self.arena.get(idx) else {
            return 0;
        };
        if let Some(parent) = node.parent {
            if let Some(p) = self.arena.get_mut(parent) {
                if p.left == Some(idx) {
                    p.left = None;
                }
                if p.right == Some(idx) {
                    p.right = None;
                }
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                removed += 1;
                stack.extend(node.left);
                stack.extend(node.right);
            }
        }
        removed
    }

    /// Height of the tree in nodes (empty tree 0), computed without recursion.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get(idx) {
                stack.extend(node.left.map(|c| (c, depth + 1)));
                stack.extend(node.right.map(|c| (c, depth + 1)));
            }
        }
        max_depth
    }

    pub fn iter_preorder(&self) -> PreOrderIterator<'_, T> {
        PreOrderIterator::new(self)
    }

    fn is_ancestor_or_self(&self, candidate: Index, mut idx: Index) -> bool {
        loop {
            if idx == candidate {
                return true;
            }
            match self.parent(idx) {
                Some(p) => idx = p,
                None => return false,
            }
        }
    }
}

impl TreeArena<usize> {
    /// Degenerate, list-shaped tree of `len` nodes where each node has a single child on
    /// `side`. Values count up from the root.
    #[instrument(level = "debug")]
    pub fn chain(len: usize, side: Side) -> Self {
        let mut tree = Self::with_capacity(len);
        let mut tail: Option<Index> = None;
        for value in 0..len {
            let idx = tree.insert(value);
            match tail {
                Some(parent) => {
                    if let Some(p) = tree.arena.get_mut(parent) {
                        *p.slot_mut(side) = Some(idx);
                    }
                    if let Some(n) = tree.arena.get_mut(idx) {
                        n.parent = Some(parent);
                    }
                }
                None => tree.root = Some(idx),
            }
            tail = Some(idx);
        }
        tree
    }
}

impl<T> BinaryTree for TreeArena<T> {
    type Handle = Index;
    type Value = T;

    fn root(&self) -> Option<Index> {
        self.root
    }

    fn node(&self, handle: Index) -> Option<NodeView<'_, Index, T>> {
        self.arena.get(handle).map(|n| NodeView {
            value: &n.value,
            left: n.left,
            right: n.right,
        })
    }
}

/// Pre-order (node, left, right) traversal driven by an explicit stack.
pub struct PreOrderIterator<'a, T> {
    tree: &'a TreeArena<T>,
    stack: Vec<Index>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(tree: &'a TreeArena<T>) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (Index, &'a BinaryNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // right first so that left is visited first
                self.stack.extend(node.child(Side::Right));
                self.stack.extend(node.child(Side::Left));
                return Some((current, node));
            }
        }
        None
    }
}
