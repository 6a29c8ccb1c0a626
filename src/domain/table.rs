//! Flat node tables: trees supplied from outside, addressed by position.
//!
//! Nothing is validated on load. Links may point past the end of the table and nodes may
//! be shared or form cycles; the balance check reports the former as `InvalidReference`
//! and the latter as `NotATree` once it resolves more nodes than the table holds.

use serde::{Deserialize, Serialize};

use crate::domain::traits::{BinaryTree, NodeView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableNode<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
}

impl<T> TableNode<T> {
    pub fn leaf(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    pub fn new(value: T, left: Option<usize>, right: Option<usize>) -> Self {
        Self { value, left, right }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeTable<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<usize>,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<TableNode<T>>,
}

impl<T> Default for NodeTable<T> {
    fn default() -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
        }
    }
}

impl<T> NodeTable<T> {
    pub fn new(root: Option<usize>, nodes: Vec<TableNode<T>>) -> Self {
        Self { root, nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T: for<'de> Deserialize<'de>> NodeTable<T> {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl<T> BinaryTree for NodeTable<T> {
    type Handle = usize;
    type Value = T;

    fn root(&self) -> Option<usize> {
        self.root
    }

    fn node(&self, handle: usize) -> Option<NodeView<'_, usize, T>> {
        self.nodes.get(handle).map(|n| NodeView {
            value: &n.value,
            left: n.left,
            right: n.right,
        })
    }

    fn node_count(&self) -> Option<usize> {
        Some(self.nodes.len())
    }
}
