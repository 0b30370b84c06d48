use std::fmt;
use std::iter::FusedIterator;

use crate::cursor::Position;
use crate::index::{IndexType, NodeIndex};
use crate::node::{Dir, Node};
use crate::tree::RbTree;

/// An iterator over the elements of an `RbTree`, in ascending order.
///
/// Every step follows parent and child links of the current node, no stack is kept.
pub struct Iter<'a, T, C, Ix> {
    /// Reference to the tree
    tree_ref: &'a RbTree<T, C, Ix>,
    /// Next node from the front
    front: Option<NodeIndex<Ix>>,
    /// Next node from the back
    back: Option<NodeIndex<Ix>>,
    /// Elements not yet yielded from either end
    remaining: usize,
}

impl<'a, T, C, Ix> Iter<'a, T, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_ref: &'a RbTree<T, C, Ix>) -> Self {
        Iter {
            tree_ref,
            front: tree_ref.advance(None, Dir::Right),
            back: tree_ref.advance(None, Dir::Left),
            remaining: tree_ref.len(),
        }
    }
}

impl<'a, T, C, Ix> Iterator for Iter<'a, T, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front?;
        self.remaining -= 1;
        self.front = self.tree_ref.arena.step(x, Dir::Right);
        Some(self.tree_ref.arena.node_ref(x, Node::value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C, Ix> DoubleEndedIterator for Iter<'_, T, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back?;
        self.remaining -= 1;
        self.back = self.tree_ref.arena.step(x, Dir::Left);
        Some(self.tree_ref.arena.node_ref(x, Node::value))
    }
}

impl<T, C, Ix> ExactSizeIterator for Iter<'_, T, C, Ix> where Ix: IndexType {}

impl<T, C, Ix> FusedIterator for Iter<'_, T, C, Ix> where Ix: IndexType {}

impl<T, C, Ix: Copy> Clone for Iter<'_, T, C, Ix> {
    fn clone(&self) -> Self {
        Iter {
            tree_ref: self.tree_ref,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T, C, Ix> fmt::Debug for Iter<'_, T, C, Ix>
where
    T: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the elements between two positions of an `RbTree`.
pub struct Range<'a, T, C, Ix> {
    /// Reference to the tree
    tree_ref: &'a RbTree<T, C, Ix>,
    /// Next node to yield
    front: Option<NodeIndex<Ix>>,
    /// First node not to yield
    last: Option<NodeIndex<Ix>>,
}

impl<'a, T, C, Ix> Range<'a, T, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(
        tree_ref: &'a RbTree<T, C, Ix>,
        first: Position<Ix>,
        last: Position<Ix>,
    ) -> Self {
        Range {
            tree_ref,
            front: first.node.filter(|&x| tree_ref.arena.contains(x)),
            last: last.node,
        }
    }
}

impl<'a, T, C, Ix> Iterator for Range<'a, T, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.front.filter(|&x| Some(x) != self.last)?;
        self.front = self.tree_ref.arena.step(x, Dir::Right);
        Some(self.tree_ref.arena.node_ref(x, Node::value))
    }
}

impl<T, C, Ix> FusedIterator for Range<'_, T, C, Ix> where Ix: IndexType {}

/// An owning iterator over the elements of an `RbTree`, in ascending order.
pub struct IntoIter<T, C, Ix> {
    /// The consumed tree
    tree: RbTree<T, C, Ix>,
    /// Next node from the front
    front: Option<NodeIndex<Ix>>,
    /// Next node from the back
    back: Option<NodeIndex<Ix>>,
    /// Elements not yet yielded from either end
    remaining: usize,
}

impl<T, C, Ix> IntoIter<T, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: RbTree<T, C, Ix>) -> Self {
        IntoIter {
            front: tree.advance(None, Dir::Right),
            back: tree.advance(None, Dir::Left),
            remaining: tree.len(),
            tree,
        }
    }
}

impl<T, C, Ix> Iterator for IntoIter<T, C, Ix>
where
    Ix: IndexType,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front?;
        self.remaining -= 1;
        // links stay intact once a value is taken out
        self.front = self.tree.arena.step(x, Dir::Right);
        Some(self.tree.arena.node_mut(x, Node::take_value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C, Ix> DoubleEndedIterator for IntoIter<T, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back?;
        self.remaining -= 1;
        self.back = self.tree.arena.step(x, Dir::Left);
        Some(self.tree.arena.node_mut(x, Node::take_value))
    }
}

impl<T, C, Ix> ExactSizeIterator for IntoIter<T, C, Ix> where Ix: IndexType {}

impl<T, C, Ix> FusedIterator for IntoIter<T, C, Ix> where Ix: IndexType {}
