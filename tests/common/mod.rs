#![allow(dead_code)]

use text_rope::{NodeMap, Rope};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

/// Checks every cached branch size against its children and returns the subtree size.
pub fn checked_size(map: &NodeMap) -> usize {
    match map {
        NodeMap::Leaf { text } => text.chars().count(),
        NodeMap::Branch { size, left, right, .. } => {
            let sum = left.as_deref().map_or(0, checked_size) + right.as_deref().map_or(0, checked_size);
            assert_eq!(*size, sum, "cached size disagrees with children");
            sum
        }
    }
}

pub fn assert_sizes(rope: &Rope) {
    let total = rope.to_map().as_ref().map_or(0, checked_size);
    assert_eq!(total, rope.len());
}

/// Chars `start..end` of `text`, clamped to its length.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
