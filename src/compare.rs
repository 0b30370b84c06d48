//! Orderings used to arrange the elements of an `RbTree`.
//!
//! A comparator must be a strict weak order: two elements are equivalent when
//! the comparator answers `Ordering::Equal`, and the tree stores at most one element
//! of each equivalence class.

use std::cmp::Ordering;

/// A total order over `T` supplied when the tree is constructed.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator.
///
/// # Example
/// ```rust
/// use rb_ordered_tree::RbTree;
///
/// let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Compare two elements.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;

    /// Whether `lhs` sorts strictly before `rhs`.
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self.compare(lhs, rhs) == Ordering::Less
    }

    /// Whether neither element sorts before the other.
    #[inline]
    fn equivalent(&self, lhs: &T, rhs: &T) -> bool {
        self.compare(lhs, rhs) == Ordering::Equal
    }
}

/// The order given by `T: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}
