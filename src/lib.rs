//! `rb-ordered-tree` is an ordered set engine based on a red-black tree.
//!
//! Elements are arranged by a comparator chosen when the tree is built, stored at
//! most once per equivalence class, and reachable through detached [`Position`]s,
//! borrowing [`Cursor`]s and double-ended iterators. Insertion, lookup and removal
//! take O(logN) time.
//!
//! Nodes live in a [`NodeArena`]: an index-addressed vector that plays the role of
//! the tree's allocator. Child and parent links are indices into it, so the tree owns
//! no raw pointers and is `Send` whenever its elements and comparator are. Nodes never
//! move while they are alive, which keeps every position valid across insertions and
//! across removals of other elements.
//!
//! # Example
//!
//! ```rust
//! use rb_ordered_tree::RbTree;
//!
//! let mut tree = RbTree::new();
//! for value in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.erase(tree.find(&5)), Some(5));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 7, 8, 9]);
//! assert_eq!(tree.get(tree.lower_bound(&6)), Some(&7));
//! ```
//!

mod arena;
mod check;
mod compare;
mod cursor;
mod error;
#[cfg(feature = "graphviz")]
mod graphviz;
mod index;
mod iter;
mod node;
mod tree;

#[cfg(test)]
mod tests;

pub use arena::NodeArena;
pub use compare::{Compare, Natural};
pub use cursor::{Cursor, Position};
pub use error::{AllocError, InsertError, InvariantViolation};
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::{IntoIter, Iter, Range};
pub use tree::RbTree;
