use std::fmt;
use std::sync::Arc;

use crate::balance::{self, BalanceStrategy};
use crate::error::Result;
use crate::map::NodeMap;
use crate::node::{self, Link, Node};
use crate::split;

/// An immutable rope. Every edit returns a new `Rope` that shares unchanged subtrees with
/// the original; cloning is a reference count bump.
///
/// Positions are char offsets and are clamped to the text: splitting or inserting past the
/// end acts at the end.
#[derive(Clone, Debug, Default)]
pub struct Rope {
    root: Link,
}

impl Rope {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// A branch over two optional ropes. `None` and ropes without a root become absent children.
    pub fn branch(left: Option<Rope>, right: Option<Rope>) -> Self {
        let link = |rope: Option<Rope>| rope.and_then(|rope| rope.root);

        Self { root: Some(Node::branch(link(left), link(right))) }
    }

    pub fn from_node(root: Arc<Node>) -> Self {
        Self { root: Some(root) }
    }

    pub fn root(&self) -> Option<&Arc<Node>> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        node::size(self.root())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        node::height(self.root())
    }

    pub fn is_balanced(&self) -> bool {
        self.root.as_ref().map_or(true, |root| root.is_balanced())
    }

    /// Leaf fragments in order, skipping empty ones.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks { stack: self.root.as_deref().into_iter().collect() }
    }

    /// Returns the text before `position` and the text at or after it.
    pub fn split_at(&self, position: usize) -> (Rope, Rope) {
        let (left, right) = split::split(self.root(), position);
        (Rope::from_node(left), Rope::from_node(right))
    }

    pub fn insert(&self, location: usize, text: &str) -> Rope {
        Rope::from_node(split::insert(self.root(), text, location))
    }

    /// Removes the chars in `start..end`.
    ///
    /// # Errors
    ///
    /// Returns [`RopeError::InvalidRange`](crate::RopeError::InvalidRange) if `end < start`.
    pub fn delete_range(&self, start: usize, end: usize) -> Result<Rope> {
        split::delete_range(self.root(), start, end).map(Rope::from_node)
    }

    pub fn concat(&self, other: &Rope) -> Rope {
        Self { root: split::concat(self.root.clone(), other.root.clone()) }
    }

    /// Rebalances with the default [`BalanceStrategy`].
    pub fn rebalance(&self) -> Rope {
        self.rebalance_with(BalanceStrategy::default())
    }

    pub fn rebalance_with(&self, strategy: BalanceStrategy) -> Rope {
        Self { root: balance::rebalance(self.root(), strategy) }
    }

    /// Debug dump of the tree shape. `None` for a rope with no root.
    pub fn to_map(&self) -> Option<NodeMap> {
        self.root.as_deref().map(NodeMap::from_node)
    }

    pub fn from_map(map: &NodeMap) -> Self {
        Rope::from_node(map.to_node())
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Rope::from_node(Node::leaf(text))
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Rope::from_node(Node::leaf(text))
    }
}

impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }

        Ok(())
    }
}

pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf { text, .. } if !text.is_empty() => return Some(text.as_str()),
                Node::Leaf { .. } => {}
                Node::Branch { children: [left, right], .. } => {
                    self.stack.extend(right.as_deref());
                    self.stack.extend(left.as_deref());
                }
            }
        }

        None
    }
}
