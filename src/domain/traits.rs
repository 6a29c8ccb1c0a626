//! Read-only access to binary trees, and tree display.

use std::fmt;

use termtree::Tree;

/// Borrowed view of a single node: its payload and both child links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView<'a, H, T> {
    pub value: &'a T,
    pub left: Option<H>,
    pub right: Option<H>,
}

/// Capability consumed by the balance checker: given a node, obtain its children and value.
///
/// `node` returns `None` when a handle does not resolve to a live node. Implementations
/// backed by untrusted input report dangling links this way instead of panicking.
pub trait BinaryTree {
    type Handle: Copy + fmt::Debug;
    type Value;

    fn root(&self) -> Option<Self::Handle>;

    fn node(&self, handle: Self::Handle) -> Option<NodeView<'_, Self::Handle, Self::Value>>;

    /// Number of stored nodes, for trees whose links are not validated on construction.
    ///
    /// A traversal of a proper tree resolves each node at most once, so visiting more
    /// nodes than this means some node is shared or sits on a cycle.
    fn node_count(&self) -> Option<usize> {
        None
    }
}

/// Rendering of a tree for terminal output.
pub trait TreeDisplay {
    /// Render at most `max_depth` levels. Deeper levels are elided, unresolvable
    /// links are marked.
    fn to_tree_string(&self, max_depth: usize) -> Tree<String>;
}

impl<B> TreeDisplay for B
where
    B: BinaryTree,
    B::Value: fmt::Display,
{
    fn to_tree_string(&self, max_depth: usize) -> Tree<String> {
        fn build<B>(tree: &B, handle: B::Handle, depth: usize, max_depth: usize) -> Tree<String>
        where
            B: BinaryTree,
            B::Value: fmt::Display,
        {
            let Some(node) = tree.node(handle) else {
                return Tree::new(format!("<invalid {:?}>", handle));
            };
            let mut current = Tree::new(node.value.to_string());
            if node.left.is_none() && node.right.is_none() {
                return current;
            }
            if depth + 1 >= max_depth {
                current.push(Tree::new("...".to_string()));
                return current;
            }
            for (label, child) in [("L", node.left), ("R", node.right)] {
                match child {
                    Some(c) => {
                        let mut sub = build(tree, c, depth + 1, max_depth);
                        sub.root = format!("{}: {}", label, sub.root);
                        current.push(sub);
                    }
                    None => {
                        current.push(Tree::new(format!("{}: -", label)));
                    }
                }
            }
            current
        }

        match self.root() {
            Some(root) => build(self, root, 0, max_depth.max(1)),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
