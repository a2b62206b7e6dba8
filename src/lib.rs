//! An immutable rope: a binary tree of text fragments that can be split, spliced and
//! rebalanced without copying the whole text.
//!
//! Every operation on a [`Rope`] returns a new rope. Subtrees an edit does not touch are
//! shared between the old and the new tree through [`Arc`](std::sync::Arc), so a rope can be
//! cloned cheaply and read from several threads at once.
//!
//! ```
//! use text_rope::Rope;
//!
//! let rope = Rope::from("hello").concat(&Rope::from(" world"));
//!
//! let (left, right) = rope.split_at(5);
//! assert_eq!(left.to_string(), "hello");
//! assert_eq!(right.to_string(), " world");
//!
//! let edited = rope.insert(5, "!!").delete_range(0, 1)?.rebalance();
//! assert_eq!(edited.to_string(), "ello!! world");
//! assert!(edited.is_balanced());
//! # Ok::<(), text_rope::RopeError>(())
//! ```

mod balance;
mod error;
mod macros;
mod map;
mod node;
mod rope;
mod split;

pub use self::balance::BalanceStrategy;
pub use self::error::{Result, RopeError};
pub use self::map::NodeMap;
pub use self::node::{Link, Node, Side};
pub use self::rope::{Chunks, Rope};
