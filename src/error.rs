//! Errors reported by `RbTree`.
//!
//! Looking up or removing a missing element is not an error: those operations answer
//! with `Position::end()`, `None` or `false`.

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;

/// A node could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// Every index of the arena's index type is in use
    CapacityExhausted {
        /// Number of nodes the index type can address
        limit: usize,
    },
    /// The arena could not grow its storage
    OutOfMemory,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityExhausted { limit } => {
                write!(f, "reached maximum number of nodes ({limit})")
            }
            AllocError::OutOfMemory => f.write_str("failed to reserve memory for a node"),
        }
    }
}

impl Error for AllocError {}

impl From<TryReserveError> for AllocError {
    #[inline]
    fn from(_: TryReserveError) -> Self {
        AllocError::OutOfMemory
    }
}

/// A failed [`RbTree::try_insert`](crate::RbTree::try_insert).
///
/// The tree is left exactly as it was and the rejected value is handed back.
pub struct InsertError<T> {
    /// Why the node could not be allocated
    pub error: AllocError,
    /// The value that was not inserted
    pub value: T,
}

impl<T> InsertError<T> {
    /// Recover the value that was not inserted.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to insert value: {}", self.error)
    }
}

impl<T> Error for InsertError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// A broken red-black or linkage invariant, found by
/// [`RbTree::validate`](crate::RbTree::validate).
///
/// Any of these means the rebalancing code itself is defective.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// The root is red
    RedRoot,
    /// A red node has a red parent
    RedChildOfRed {
        /// Arena slot of the offending child
        node: usize,
    },
    /// Two paths from the root to a null link cross a different number of black nodes
    BlackHeight {
        /// Black-height of the leftmost path
        expected: usize,
        /// Black-height found on another path
        found: usize,
    },
    /// A child does not point back at its parent
    ParentLink {
        /// Arena slot of the offending child
        node: usize,
    },
    /// In-order traversal is not strictly increasing under the comparator
    Order {
        /// Arena slot of the first out of order node
        node: usize,
    },
    /// The stored length disagrees with the number of reachable nodes
    Length {
        /// Stored length
        expected: usize,
        /// Reachable nodes
        found: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RedRoot => f.write_str("root is red"),
            InvariantViolation::RedChildOfRed { node } => {
                write!(f, "red child {node} has red parent")
            }
            InvariantViolation::BlackHeight { expected, found } => write!(
                f,
                "number of black nodes volatile: expected {expected}, found {found}"
            ),
            InvariantViolation::ParentLink { node } => {
                write!(f, "node {node} does not point back at its parent")
            }
            InvariantViolation::Order { node } => write!(f, "node {node} is out of order"),
            InvariantViolation::Length { expected, found } => {
                write!(f, "length is {expected} but {found} nodes are reachable")
            }
        }
    }
}

impl Error for InvariantViolation {}
