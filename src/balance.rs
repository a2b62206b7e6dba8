use std::sync::Arc;
use tracing::{debug, trace};

use crate::node::{self, Link, Node, Side};

/// How `rebalance` repairs a tree. Both strategies rebuild branches only; leaves are never
/// re-split, so the represented text is unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BalanceStrategy {
    /// Rotate toward the smaller child while that shrinks the size gap between the two
    /// children. Cheap, but the result is not guaranteed to be height-balanced.
    SizeHeuristic,
    /// AVL join of the rebalanced children. The result always satisfies `is_balanced`.
    #[default]
    Height,
}

impl BalanceStrategy {
    fn trusts(self, marker: Option<BalanceStrategy>) -> bool {
        match self {
            BalanceStrategy::SizeHeuristic => marker.is_some(),
            BalanceStrategy::Height => marker == Some(BalanceStrategy::Height),
        }
    }
}

pub(crate) fn rebalance(link: Option<&Arc<Node>>, strategy: BalanceStrategy) -> Link {
    let before = node::height(link);
    let balanced = match strategy {
        BalanceStrategy::SizeHeuristic => balance_by_size(link),
        BalanceStrategy::Height => balance_by_height(link),
    };

    debug!(?strategy, before, after = node::height(balanced.as_ref()), "rebalanced rope");
    balanced
}

/// Rotates `node` so that its root moves down toward `toward` and the opposite child takes
/// its place. Returns the node unchanged when that child is absent or a leaf.
pub(crate) fn rotate(node: &Arc<Node>, toward: Side) -> Arc<Node> {
    let Node::Branch { children, .. } = node.as_ref() else {
        return node.clone();
    };
    let Some(Node::Branch { children: pivot, .. }) = children[toward.opposite().index()].as_deref() else {
        return node.clone();
    };

    let demoted = Node::join(toward, children[toward.index()].clone(), pivot[toward.index()].clone());
    Node::join(toward, Some(demoted), pivot[toward.opposite().index()].clone())
}

fn size_gap(node: &Node) -> usize {
    node::size(node.left()).abs_diff(node::size(node.right()))
}

enum Visit<'a> {
    Enter(Option<&'a Arc<Node>>),
    Combine,
}

/// Rebuilds every branch under `link` from its rebuilt children, children first. Branches
/// carrying a marker `strategy` trusts are kept whole. Pending work lives on the heap, so
/// tree height is not limited by the call stack.
fn rebuild_bottom_up(
    link: Option<&Arc<Node>>,
    strategy: BalanceStrategy,
    mut combine: impl FnMut(Link, Link) -> Link,
) -> Link {
    let mut pending = vec![Visit::Enter(link)];
    let mut built: Vec<Link> = Vec::new();

    while let Some(visit) = pending.pop() {
        match visit {
            Visit::Enter(None) => built.push(None),
            Visit::Enter(Some(node)) => match node.as_ref() {
                Node::Branch { children: [left, right], marker, .. } if !strategy.trusts(*marker) => {
                    pending.push(Visit::Combine);
                    pending.push(Visit::Enter(right.as_ref()));
                    pending.push(Visit::Enter(left.as_ref()));
                }
                _ => built.push(Some(node.clone())),
            },
            Visit::Combine => {
                let right = built.pop().flatten();
                let left = built.pop().flatten();
                built.push(combine(left, right));
            }
        }
    }

    built.pop().flatten()
}

fn balance_by_size(link: Option<&Arc<Node>>) -> Link {
    rebuild_bottom_up(link, BalanceStrategy::SizeHeuristic, |left, right| {
        let mut current = Node::branch(left, right);
        loop {
            let toward =
                if node::size(current.left()) > node::size(current.right()) { Side::Right } else { Side::Left };
            let next = rotate(&current, toward);

            // The gap is a non-negative integer that must strictly shrink, so this ends.
            if size_gap(&next) >= size_gap(&current) {
                break;
            }
            trace!(?toward, gap = size_gap(&next), "rotated");
            current = next;
        }

        Some(current.mark(BalanceStrategy::SizeHeuristic))
    })
}

fn balance_by_height(link: Option<&Arc<Node>>) -> Link {
    rebuild_bottom_up(link, BalanceStrategy::Height, |left, right| {
        avl_join(left, right).map(|joined| joined.mark(BalanceStrategy::Height))
    })
}

/// Concatenates two height-balanced trees into one height-balanced tree.
fn avl_join(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, other) | (other, None) => other,
        (Some(left), Some(right)) => {
            let (left_height, right_height) = (left.height(), right.height());

            Some(if left_height > right_height + 1 {
                join_heavy(Side::Left, &left, right)
            } else if right_height > left_height + 1 {
                join_heavy(Side::Right, &right, left)
            } else {
                Node::branch(Some(left), Some(right))
            })
        }
    }
}

/// Joins `short` onto the `heavy.opposite()` flank of `tall`, where `tall` sits on the
/// `heavy` side and is at least two levels taller. Descends the inner spine of `tall` until
/// the heights meet, then repairs with a single or double rotation on the way back up.
fn join_heavy(heavy: Side, tall: &Arc<Node>, short: Arc<Node>) -> Arc<Node> {
    let toward = heavy.opposite();
    let outer = tall.child(heavy).cloned();
    let outer_height = node::height(outer.as_ref());

    match tall.child(toward) {
        Some(inner) if inner.height() > short.height() + 1 => {
            let spine = join_heavy(heavy, inner, short);
            let spine_height = spine.height();
            let joined = Node::join(heavy, outer, Some(spine));

            if spine_height <= outer_height + 1 {
                joined
            } else {
                rotate(&joined, heavy)
            }
        }
        inner => {
            let spine = Node::join(heavy, inner.cloned(), Some(short));
            if spine.height() <= outer_height + 1 {
                return Node::join(heavy, outer, Some(spine));
            }

            let spine = rotate(&spine, toward);
            rotate(&Node::join(heavy, outer, Some(spine)), heavy)
        }
    }
}
