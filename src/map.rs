//! Nested-record dump of a tree, for inspecting its shape.
//!
//! A [`NodeMap`] mirrors the tree one record per node and serializes as
//! `{"kind":"branch","size":11,"left":{"kind":"leaf","text":"hello"},...}`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::node::{Link, Node};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeMap {
    Leaf {
        text: String,
    },
    Branch {
        size: usize,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        balanced: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<Box<NodeMap>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<Box<NodeMap>>,
    },
}

impl NodeMap {
    pub(crate) fn from_node(node: &Node) -> Self {
        match node {
            Node::Leaf { text, .. } => NodeMap::Leaf { text: text.clone() },
            Node::Branch { children: [left, right], size, marker, .. } => NodeMap::Branch {
                size: *size,
                balanced: marker.is_some(),
                left: left.as_deref().map(|child| Box::new(NodeMap::from_node(child))),
                right: right.as_deref().map(|child| Box::new(NodeMap::from_node(child))),
            },
        }
    }

    /// Builds a fresh tree with this shape. Recorded sizes are recomputed from the leaves
    /// and balanced flags are dropped, since neither can be trusted from outside.
    pub(crate) fn to_node(&self) -> Arc<Node> {
        match self {
            NodeMap::Leaf { text } => Node::leaf(text.as_str()),
            NodeMap::Branch { left, right, .. } => Node::branch(to_link(left), to_link(right)),
        }
    }
}

fn to_link(map: &Option<Box<NodeMap>>) -> Link {
    map.as_deref().map(NodeMap::to_node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_branch_shape() {
        let tree = Node::branch(Some(Node::leaf("hello")), None);
        let map = NodeMap::from_node(&tree);

        assert_eq!(
            map,
            NodeMap::Branch {
                size: 5,
                balanced: false,
                left: Some(Box::new(NodeMap::Leaf { text: "hello".into() })),
                right: None,
            }
        );
    }

    #[test]
    fn serializes_like_a_nested_record() {
        let tree = Node::branch(Some(Node::leaf("hi")), Some(Node::leaf("!")));
        let json = serde_json::to_value(NodeMap::from_node(&tree)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "branch",
                "size": 3,
                "left": { "kind": "leaf", "text": "hi" },
                "right": { "kind": "leaf", "text": "!" },
            })
        );
    }

    #[test]
    fn rebuild_recomputes_sizes() {
        let json = r#"{"kind":"branch","size":999,"balanced":true,"right":{"kind":"leaf","text":"abc"}}"#;
        let map: NodeMap = serde_json::from_str(json).unwrap();
        let node = map.to_node();

        assert_eq!(node.size(), 3);
        assert_eq!(node.marker(), None);
        assert!(node.left().is_none());
    }
}
