use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::node::Dir;
use crate::tree::RbTree;

/// A detached reference to an element of an [`RbTree`], or to the end of it.
///
/// Positions are plain indices: they do not borrow the tree, so they can be kept
/// across insertions and handed back to [`RbTree::erase`]. A position stays valid
/// until its element is erased or the tree is cleared. Using a stale position is
/// memory safe but may resolve to the end or to an unrelated element.
///
/// Two positions are equal when they name the same node, or when both are the end.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position<Ix = DefaultIx> {
    /// Current node, `None` for the end sentinel
    pub(crate) node: Option<NodeIndex<Ix>>,
}

impl<Ix> Position<Ix>
where
    Ix: IndexType,
{
    /// The end position, shared by every tree.
    #[inline]
    #[must_use]
    pub fn end() -> Self {
        Position { node: None }
    }

    /// Whether this is the end position.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    #[inline]
    pub(crate) fn at(node: NodeIndex<Ix>) -> Self {
        Position { node: Some(node) }
    }
}

impl<Ix> From<Option<NodeIndex<Ix>>> for Position<Ix> {
    #[inline]
    fn from(node: Option<NodeIndex<Ix>>) -> Self {
        Position { node }
    }
}

impl<Ix: fmt::Debug> fmt::Debug for Position<Ix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "Position({node:?})"),
            None => f.write_str("Position(end)"),
        }
    }
}

/// A bidirectional cursor over an [`RbTree`].
///
/// The cursor rests either on an element or on the sentinel that sits both before
/// the first and after the last element. Moving forward from the sentinel reaches
/// the smallest element, moving backward from it reaches the largest one.
///
/// # Example
/// ```rust
/// use rb_ordered_tree::RbTree;
///
/// let tree: RbTree<_> = [2, 1, 3].into_iter().collect();
/// let mut cursor = tree.cursor_front();
/// assert_eq!(cursor.get(), Some(&1));
/// cursor.move_prev();
/// assert!(cursor.is_end());
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&3));
/// ```
pub struct Cursor<'a, T, C, Ix> {
    /// The tree walked by the cursor
    tree: &'a RbTree<T, C, Ix>,
    /// Current node, `None` for the sentinel
    current: Option<NodeIndex<Ix>>,
}

impl<'a, T, C, Ix> Cursor<'a, T, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: &'a RbTree<T, C, Ix>, current: Option<NodeIndex<Ix>>) -> Self {
        Cursor { tree, current }
    }

    /// The element under the cursor, `None` on the sentinel.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.tree.get(self.position())
    }

    /// Detach the cursor from the tree.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Position<Ix> {
        Position::from(self.current)
    }

    /// Whether the cursor rests on the sentinel.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Move to the in-order successor.
    #[inline]
    pub fn move_next(&mut self) {
        self.current = self.tree.advance(self.current, Dir::Right);
    }

    /// Move to the in-order predecessor.
    #[inline]
    pub fn move_prev(&mut self) {
        self.current = self.tree.advance(self.current, Dir::Left);
    }

    /// The element after the cursor without moving it.
    #[inline]
    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        let next = self.tree.advance(self.current, Dir::Right);
        self.tree.get(Position::from(next))
    }

    /// The element before the cursor without moving it.
    #[inline]
    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        let prev = self.tree.advance(self.current, Dir::Left);
        self.tree.get(Position::from(prev))
    }
}

impl<T, C, Ix: Copy> Clone for Cursor<'_, T, C, Ix> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C, Ix: Copy> Copy for Cursor<'_, T, C, Ix> {}

/// Cursors are equal when they walk the same tree and rest on the same node.
impl<T, C, Ix: PartialEq> PartialEq for Cursor<'_, T, C, Ix> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<T, C, Ix: Eq> Eq for Cursor<'_, T, C, Ix> {}

impl<T, C, Ix: Hash> Hash for Cursor<'_, T, C, Ix> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.current.hash(state);
    }
}

impl<T, C, Ix> fmt::Debug for Cursor<'_, T, C, Ix>
where
    T: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}
