use std::sync::Arc;

use tracing::warn;

use crate::error::{Result, RopeError};
use crate::node::{self, Link, Node, Side};

/// Splits the text under `link` into everything before `position` and everything at or
/// after it. Never fails: positions past the end give an empty right part.
///
/// Subtrees that the cut does not cross are shared with the input, not copied. The descent
/// keeps its path on the heap, so tree height is not limited by the call stack.
pub(crate) fn split(link: Option<&Arc<Node>>, position: usize) -> (Arc<Node>, Arc<Node>) {
    let mut path: Vec<(&Arc<Node>, Side)> = Vec::new();
    let (mut link, mut position) = (link, position);

    let (mut before, mut after) = loop {
        let Some(node) = link else {
            break (Node::empty(), Node::empty());
        };

        match node.as_ref() {
            Node::Leaf { text, len } => break split_leaf(node, text, *len, position),
            Node::Branch { children, size, .. } => {
                if position >= *size {
                    break (node.clone(), Node::empty());
                }

                let left_size = node::size(children[0].as_ref());
                let side = if position > left_size {
                    position -= left_size;
                    Side::Right
                } else {
                    Side::Left
                };

                path.push((node, side));
                link = children[side.index()].as_ref();
            }
        }
    };

    // The part facing away from `side` gets the untouched sibling reattached at each level.
    while let Some((node, side)) = path.pop() {
        let other = side.opposite();
        let mut parts = [before, after];
        parts[other.index()] = Node::join(side, Some(parts[other.index()].clone()), node.child(other).cloned());
        [before, after] = parts;
    }

    (before, after)
}

fn split_leaf(node: &Arc<Node>, text: &str, len: usize, position: usize) -> (Arc<Node>, Arc<Node>) {
    if position == 0 {
        return (Node::empty(), node.clone());
    }
    if position >= len {
        return (node.clone(), Node::empty());
    }

    let at = byte_offset(text, position);
    (Node::leaf(&text[..at]), Node::leaf(&text[at..]))
}

/// Returns a tree holding `text` spliced in at `location`. Locations past the end append.
pub(crate) fn insert(link: Option<&Arc<Node>>, text: &str, location: usize) -> Arc<Node> {
    let (before, after) = split(link, location);
    let spliced = Node::branch(Some(before), Some(Node::leaf(text)));

    Node::branch(Some(spliced), Some(after))
}

/// Returns a tree without the chars in `start..end`. An `end` past the rope deletes to
/// the end of the text.
pub(crate) fn delete_range(link: Option<&Arc<Node>>, start: usize, end: usize) -> Result<Arc<Node>> {
    if end < start {
        warn!(start, end, "rejecting delete with end before start");
        return Err(RopeError::InvalidRange { start, end });
    }

    let (before, _) = split(link, start);
    let (_, after) = split(link, end);

    Ok(Node::branch(Some(before), Some(after)))
}

/// Joins two trees without rebalancing. An absent side yields the other side unchanged.
pub(crate) fn concat(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, other) | (other, None) => other,
        (left, right) => Some(Node::branch(left, right)),
    }
}

fn byte_offset(text: &str, position: usize) -> usize {
    text.char_indices().nth(position).map_or(text.len(), |(at, _)| at)
}
