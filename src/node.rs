use std::sync::Arc;

use crate::balance::BalanceStrategy;

/// A possibly-absent shared subtree. An absent child is a valid empty state.
pub type Link = Option<Arc<Node>>;

/// Which child of a branch. Split, rotation and join are written once against a `Side`
/// instead of twice with left and right swapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Immutable rope node. Nodes are never changed after construction; edits build new
/// parents around shared, untouched subtrees.
///
/// Variants can only be built through [`Node::leaf`] and [`Node::branch`], which keep the
/// cached size and height consistent with the children.
#[derive(Debug)]
pub enum Node {
    #[non_exhaustive]
    Leaf {
        text: String,
        /// Length of `text` in chars.
        len: usize,
    },
    #[non_exhaustive]
    Branch {
        children: [Link; 2],
        /// Sum of the sizes of both children.
        size: usize,
        /// `1 + max(child heights)`, absent children counting 0.
        height: usize,
        /// Set only by a rebalance pass, on a node built by that pass.
        marker: Option<BalanceStrategy>,
    },
}

impl Node {
    pub fn leaf(text: impl Into<String>) -> Arc<Self> {
        let text = text.into();
        Arc::new(Node::Leaf { len: text.chars().count(), text })
    }

    pub fn empty() -> Arc<Self> {
        Node::leaf(String::new())
    }

    pub fn branch(left: Link, right: Link) -> Arc<Self> {
        Node::build([left, right], None)
    }

    /// Builds a branch with `near` as its `side` child and `far` as the other one.
    pub fn join(side: Side, near: Link, far: Link) -> Arc<Self> {
        match side {
            Side::Left => Node::branch(near, far),
            Side::Right => Node::branch(far, near),
        }
    }

    fn build(children: [Link; 2], marker: Option<BalanceStrategy>) -> Arc<Self> {
        let [left, right] = &children;
        let size = size(left.as_ref()) + size(right.as_ref());
        let height = 1 + height(left.as_ref()).max(height(right.as_ref()));
        Arc::new(Node::Branch { children, size, height, marker })
    }

    /// Copy of this branch carrying `strategy` as its balanced marker. Leaves are returned as-is.
    pub(crate) fn mark(self: &Arc<Self>, strategy: BalanceStrategy) -> Arc<Self> {
        match self.as_ref() {
            Node::Leaf { .. } => self.clone(),
            Node::Branch { children, .. } => Node::build(children.clone(), Some(strategy)),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Node::Leaf { len, .. } => *len,
            Node::Branch { size, .. } => *size,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { height, .. } => *height,
        }
    }

    pub fn child(&self, side: Side) -> Option<&Arc<Node>> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { children, .. } => children[side.index()].as_ref(),
        }
    }

    pub fn left(&self) -> Option<&Arc<Node>> {
        self.child(Side::Left)
    }

    pub fn right(&self) -> Option<&Arc<Node>> {
        self.child(Side::Right)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Leaf { text, .. } => Some(text.as_str()),
            Node::Branch { .. } => None,
        }
    }

    pub fn marker(&self) -> Option<BalanceStrategy> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { marker, .. } => *marker,
        }
    }

    /// Whether no subtree has children whose heights differ by more than one.
    pub fn is_balanced(&self) -> bool {
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            if let Node::Branch { children: [left, right], .. } = node {
                if height(left.as_ref()).abs_diff(height(right.as_ref())) > 1 {
                    return false;
                }
                pending.extend(left.as_deref());
                pending.extend(right.as_deref());
            }
        }

        true
    }
}

impl Drop for Node {
    // Dropping a tall, uniquely owned spine recursively would exhaust the stack, so
    // children this node owns outright are detached and released from a heap queue.
    fn drop(&mut self) {
        let Node::Branch { children, .. } = self else {
            return;
        };

        let mut orphans: Vec<Arc<Node>> = children.iter_mut().filter_map(Option::take).collect();
        while let Some(child) = orphans.pop() {
            if let Ok(mut child) = Arc::try_unwrap(child) {
                if let Node::Branch { children, .. } = &mut child {
                    orphans.extend(children.iter_mut().filter_map(Option::take));
                }
            }
        }
    }
}

pub fn size(link: Option<&Arc<Node>>) -> usize {
    link.map_or(0, |node| node.size())
}

pub fn height(link: Option<&Arc<Node>>) -> usize {
    link.map_or(0, |node| node.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_counts_chars_not_bytes() {
        let leaf = Node::leaf("héllo");
        assert_eq!(leaf.size(), 5);
        assert_eq!(leaf.height(), 1);
        assert!(leaf.is_balanced());
    }

    #[test]
    fn branch_caches_size_and_height() {
        let inner = Node::branch(Some(Node::leaf("ab")), Some(Node::leaf("cde")));
        let outer = Node::branch(Some(inner), None);

        assert_eq!(outer.size(), 5);
        assert_eq!(outer.height(), 3);
        assert!(!outer.is_balanced());
        assert_eq!(outer.marker(), None);
    }

    #[test]
    fn absent_children_count_nothing() {
        assert_eq!(size(None), 0);
        assert_eq!(height(None), 0);

        let bare = Node::branch(None, None);
        assert_eq!(bare.size(), 0);
        assert_eq!(bare.height(), 1);
        assert!(bare.is_balanced());
    }

    #[test]
    fn join_places_near_on_requested_side() {
        let a = Node::leaf("a");
        let b = Node::leaf("b");

        let left = Node::join(Side::Left, Some(a.clone()), Some(b.clone()));
        assert_eq!(left.left().and_then(|n| n.text()), Some("a"));

        let right = Node::join(Side::Right, Some(a), Some(b));
        assert_eq!(right.left().and_then(|n| n.text()), Some("b"));
        assert_eq!(right.right().and_then(|n| n.text()), Some("a"));
    }

    #[test]
    fn mark_rebuilds_with_same_children() {
        let child = Node::leaf("x");
        let branch = Node::branch(Some(child.clone()), None);
        let marked = branch.mark(BalanceStrategy::Height);

        assert_eq!(marked.marker(), Some(BalanceStrategy::Height));
        assert!(Arc::ptr_eq(marked.left().unwrap(), &child));
        assert_eq!(branch.marker(), None);
    }

    fn deep_chain(depth: usize) -> Arc<Node> {
        (0..depth).fold(Node::leaf("x"), |tree, _| Node::branch(Some(tree), Some(Node::leaf("y"))))
    }

    #[test]
    fn deep_chain_checks_and_drops_without_recursing() {
        let tree = deep_chain(200_000);

        assert_eq!(tree.height(), 200_001);
        assert!(!tree.is_balanced());
        drop(tree);
    }

    #[test]
    fn drop_keeps_shared_subtrees_alive() {
        let shared = deep_chain(3);
        let tree = Node::branch(Some(shared.clone()), None);

        drop(tree);
        assert_eq!(shared.size(), 4);
        assert_eq!(Arc::strong_count(&shared), 1);
        assert!(shared.left().is_some());
    }
}
