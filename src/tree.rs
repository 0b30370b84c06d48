use std::cmp::Ordering;
use std::fmt;
use std::mem;

use log::{debug, trace, warn};

use crate::arena::NodeArena;
use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, Position};
use crate::error::InsertError;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Iter, Range};
use crate::node::{Color, Dir, Node};

/// An ordered set of values kept in a red-black tree.
///
/// Elements are arranged by the comparator `C` and stored at most once per
/// equivalence class. Nodes live in a [`NodeArena`] addressed with `Ix` indices; only
/// child links own nodes, parent links are plain indices used to walk upwards.
pub struct RbTree<T, C = Natural, Ix = DefaultIx> {
    /// Node storage
    pub(crate) arena: NodeArena<T, Ix>,
    /// Root of the tree
    pub(crate) root: Option<NodeIndex<Ix>>,
    /// Number of elements in the tree
    pub(crate) len: usize,
    /// Ordering of the elements
    pub(crate) comparator: C,
}

impl<T> RbTree<T>
where
    T: Ord,
{
    /// Create an empty `RbTree` ordered by `T: Ord`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new `RbTree` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new_in(Natural, NodeArena::with_capacity(capacity))
    }
}

impl<T, C> RbTree<T, C>
where
    C: Compare<T>,
{
    /// Create an empty `RbTree` ordered by `comparator`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// assert!(tree.insert("one").1);
    /// assert!(!tree.insert("two").1);
    /// assert!(tree.insert("three").1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::new_in(comparator, NodeArena::new())
    }
}

impl<T, C, Ix> RbTree<T, C, Ix>
where
    C: Compare<T>,
    Ix: IndexType,
{
    /// Create an empty `RbTree` from a comparator and a node arena.
    ///
    /// The arena decides where nodes are stored and how many of them fit.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::{Natural, NodeArena, RbTree};
    ///
    /// let mut tree = RbTree::new_in(Natural, NodeArena::<i32, u8>::with_capacity(16));
    /// for i in 0..255 {
    ///     tree.insert(i);
    /// }
    /// assert!(tree.try_insert(255).is_err());
    /// assert_eq!(tree.len(), 255);
    /// ```
    #[inline]
    #[must_use]
    pub fn new_in(comparator: C, arena: NodeArena<T, Ix>) -> Self {
        RbTree {
            arena,
            root: None,
            len: 0,
            comparator,
        }
    }

    /// Insert a value into the tree.
    ///
    /// Returns the position of the value and whether it was inserted. When an
    /// equivalent element is already present, the tree keeps it, `value` is dropped
    /// and the position of the existing element is returned.
    ///
    /// # Panics
    ///
    /// This method panics when no node can be allocated, see [`RbTree::try_insert`].
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let (pos, inserted) = tree.insert(3);
    /// assert!(inserted);
    /// assert_eq!(tree.get(pos), Some(&3));
    /// let (again, inserted) = tree.insert(3);
    /// assert!(!inserted);
    /// assert_eq!(again, pos);
    /// ```
    #[inline]
    pub fn insert(&mut self, value: T) -> (Position<Ix>, bool) {
        self.insert_with_hint(Position::end(), value)
    }

    /// Insert a value, starting the search at `hint`.
    ///
    /// The hint is used when `value` belongs to the subtree below it, otherwise the
    /// search starts over from the root. The result is the same as [`RbTree::insert`].
    ///
    /// # Panics
    ///
    /// This method panics when no node can be allocated, see [`RbTree::try_insert`].
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let (mut hint, _) = tree.insert(0);
    /// for i in 1..100 {
    ///     hint = tree.insert_with_hint(hint, i).0;
    /// }
    /// assert_eq!(tree.len(), 100);
    /// assert!(tree.iter().copied().eq(0..100));
    /// ```
    #[inline]
    pub fn insert_with_hint(&mut self, hint: Position<Ix>, value: T) -> (Position<Ix>, bool) {
        match self.try_insert_with_hint(hint, value) {
            Ok(res) => res,
            Err(err) => panic!("{err}"),
        }
    }

    /// Insert a value, reporting allocation failures instead of panicking.
    ///
    /// On failure the tree is left untouched and the value is returned inside the error.
    #[inline]
    pub fn try_insert(&mut self, value: T) -> Result<(Position<Ix>, bool), InsertError<T>> {
        self.try_insert_with_hint(Position::end(), value)
    }

    /// Fallible version of [`RbTree::insert_with_hint`].
    pub fn try_insert_with_hint(
        &mut self,
        hint: Position<Ix>,
        value: T,
    ) -> Result<(Position<Ix>, bool), InsertError<T>> {
        let start = self.hint_start(hint, &value);
        let link = match self.find_place(&value, start) {
            None => None,
            Some(place) => match self.compare_with(&value, place) {
                Ordering::Less => Some((place, Dir::Left)),
                Ordering::Greater => Some((place, Dir::Right)),
                Ordering::Equal => return Ok((Position::at(place), false)),
            },
        };

        let node = self
            .arena
            .allocate(value, link.map(|(parent, _)| parent))
            .map_err(|(error, value)| {
                warn!("failed to allocate a node: {error}");
                InsertError { error, value }
            })?;
        match link {
            Some((parent, dir)) => self.arena.node_mut(parent, Node::set_child(dir, Some(node))),
            None => self.root = Some(node),
        }
        self.len += 1;
        self.insert_fixup(node);

        Ok((Position::at(node), true))
    }

    /// Find the element equivalent to `value`, or the end position.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = [5, 3, 8].into_iter().collect();
    /// assert_eq!(tree.get(tree.find(&3)), Some(&3));
    /// assert!(tree.find(&4).is_end());
    /// ```
    #[inline]
    #[must_use]
    pub fn find(&self, value: &T) -> Position<Ix> {
        match self.find_place(value, self.root) {
            Some(x) if self.compare_with(value, x) == Ordering::Equal => Position::at(x),
            _ => Position::end(),
        }
    }

    /// Return `true` if an element equivalent to `value` is stored.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        !self.find(value).is_end()
    }

    /// Number of stored elements equivalent to `value`, either 0 or 1.
    #[inline]
    #[must_use]
    pub fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }

    /// Position of the first element that does not sort before `value`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.get(tree.lower_bound(&20)), Some(&20));
    /// assert_eq!(tree.get(tree.lower_bound(&21)), Some(&30));
    /// assert_eq!(tree.get(tree.lower_bound(&5)), Some(&10));
    /// assert!(tree.lower_bound(&31).is_end());
    /// ```
    #[must_use]
    pub fn lower_bound(&self, value: &T) -> Position<Ix> {
        let Some(x) = self.find_place(value, self.root) else {
            return Position::end();
        };
        // the descent stops next to the insertion point, which may be on either side
        if self.compare_with(value, x) == Ordering::Greater {
            Position::from(self.arena.step(x, Dir::Right))
        } else {
            Position::at(x)
        }
    }

    /// Position of the first element that sorts after `value`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    /// assert_eq!(tree.get(tree.upper_bound(&20)), Some(&30));
    /// assert_eq!(tree.get(tree.upper_bound(&15)), Some(&20));
    /// assert!(tree.upper_bound(&30).is_end());
    /// ```
    #[must_use]
    pub fn upper_bound(&self, value: &T) -> Position<Ix> {
        let pos = self.lower_bound(value);
        match self.get(pos) {
            Some(found) if self.comparator.equivalent(found, value) => self.next(pos),
            _ => pos,
        }
    }

    /// The pair `(lower_bound(value), upper_bound(value))`.
    ///
    /// The range between the two positions holds the element equivalent to `value`, if any.
    #[inline]
    #[must_use]
    pub fn equal_range(&self, value: &T) -> (Position<Ix>, Position<Ix>) {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Remove the element equivalent to `value` and return it.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree: RbTree<_> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(tree.remove(&2), Some(2));
    /// assert_eq!(tree.remove(&2), None);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[inline]
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let pos = self.find(value);
        self.erase(pos)
    }

    /// Remove the element at `pos` and return it.
    ///
    /// Erasing the end position is a no-op returning `None`. Positions of all other
    /// elements stay valid.
    ///
    /// Debug builds check the whole tree after every removal, so a removal costs O(N)
    /// there instead of O(logN).
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree: RbTree<_> = [5, 3, 8].into_iter().collect();
    /// let eight = tree.find(&8);
    /// assert_eq!(tree.erase(tree.find(&5)), Some(5));
    /// assert_eq!(tree.get(eight), Some(&8));
    /// assert_eq!(tree.erase(tree.end()), None);
    /// ```
    pub fn erase(&mut self, pos: Position<Ix>) -> Option<T> {
        let node = pos.node.filter(|&x| self.arena.contains(x))?;
        Some(self.erase_node(node))
    }

    /// Remove every element from `first` up to, but excluding, `last`.
    ///
    /// Returns the number of removed elements. In debug builds the tree is checked after
    /// each removal, which makes erasing a large range quadratic.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let mut tree: RbTree<_> = (0..10).collect();
    /// let removed = tree.erase_range(tree.find(&2), tree.find(&7));
    /// assert_eq!(removed, 5);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![0, 1, 7, 8, 9]);
    /// ```
    pub fn erase_range(&mut self, first: Position<Ix>, last: Position<Ix>) -> usize {
        let mut removed = 0;
        let mut cur = first;
        while cur != last {
            let Some(node) = cur.node.filter(|&x| self.arena.contains(x)) else {
                break;
            };
            cur = self.next(cur);
            let _ignore = self.erase_node(node);
            removed += 1;
        }
        debug!("erased {removed} elements, {} left", self.len);
        removed
    }

    /// Remove and return the smallest element.
    #[inline]
    pub fn pop_first(&mut self) -> Option<T> {
        self.erase(self.begin())
    }

    /// Remove and return the largest element.
    #[inline]
    pub fn pop_last(&mut self) -> Option<T> {
        self.erase(self.prev(self.end()))
    }
}

impl<T, C, Ix> RbTree<T, C, Ix>
where
    Ix: IndexType,
{
    /// Return the number of elements in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The comparator ordering this tree.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Position of the smallest element, or the end position for an empty tree.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Position<Ix> {
        Position::from(self.advance(None, Dir::Right))
    }

    /// The end position, one past the largest element.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Position<Ix> {
        Position::end()
    }

    /// Position after `pos` in ascending order.
    ///
    /// Stepping forward from the end position wraps around to the smallest element.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = [1, 2].into_iter().collect();
    /// let first = tree.begin();
    /// let second = tree.next(first);
    /// assert_eq!(tree.get(second), Some(&2));
    /// assert_eq!(tree.next(second), tree.end());
    /// assert_eq!(tree.next(tree.end()), first);
    /// ```
    #[inline]
    #[must_use]
    pub fn next(&self, pos: Position<Ix>) -> Position<Ix> {
        Position::from(self.advance(pos.node, Dir::Right))
    }

    /// Position before `pos` in ascending order.
    ///
    /// Stepping backward from the end position lands on the largest element, stepping
    /// backward from the smallest one lands on the end position.
    #[inline]
    #[must_use]
    pub fn prev(&self, pos: Position<Ix>) -> Position<Ix> {
        Position::from(self.advance(pos.node, Dir::Left))
    }

    /// The element at `pos`, `None` for the end position.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: Position<Ix>) -> Option<&T> {
        pos.node.and_then(|x| self.arena.value(x))
    }

    /// The smallest element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(self.begin())
    }

    /// The largest element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.get(self.prev(self.end()))
    }

    /// A cursor at `pos`.
    #[inline]
    #[must_use]
    pub fn cursor(&self, pos: Position<Ix>) -> Cursor<'_, T, C, Ix> {
        Cursor::new(self, pos.node)
    }

    /// A cursor at the smallest element.
    #[inline]
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, T, C, Ix> {
        self.cursor(self.begin())
    }

    /// A cursor at the largest element.
    #[inline]
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, T, C, Ix> {
        self.cursor(self.prev(self.end()))
    }

    /// Get an iterator over the elements of the tree, in ascending order.
    ///
    /// The iterator is double-ended, `iter().rev()` walks in descending order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, C, Ix> {
        Iter::new(self)
    }

    /// Iterate over the elements from `first` up to, but excluding, `last`.
    ///
    /// If `last` does not follow `first`, the iteration runs to the end of the tree.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = (1..=9).collect();
    /// let between: Vec<_> = tree.range(tree.lower_bound(&3), tree.upper_bound(&6)).collect();
    /// assert_eq!(between, vec![&3, &4, &5, &6]);
    /// ```
    #[inline]
    #[must_use]
    pub fn range(&self, first: Position<Ix>, last: Position<Ix>) -> Range<'_, T, C, Ix> {
        Range::new(self, first, last)
    }

    /// Remove all elements from the tree.
    #[inline]
    pub fn clear(&mut self) {
        debug!("clearing {} elements", self.len);
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Exchange the contents of two trees, comparators included.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T, C, Ix> RbTree<T, C, Ix>
where
    C: Compare<T>,
    Ix: IndexType,
{
    /// Compare a value with the value stored in node `x`.
    fn compare_with(&self, value: &T, x: NodeIndex<Ix>) -> Ordering {
        self.arena
            .node_ref(x, |xn| self.comparator.compare(value, xn.value()))
    }

    /// Descend from `start` towards `value`.
    ///
    /// Stops at the node equivalent to `value`, or at the node that would become the
    /// parent of `value`.
    fn find_place(&self, value: &T, start: Option<NodeIndex<Ix>>) -> Option<NodeIndex<Ix>> {
        let mut x = start?;
        loop {
            let dir = match self.compare_with(value, x) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => return Some(x),
            };
            match self.arena.node_ref(x, |xn| xn.child(dir)) {
                Some(child) => x = child,
                None => return Some(x),
            }
        }
    }

    /// Where an insertion guided by `hint` starts descending.
    fn hint_start(&self, hint: Position<Ix>, value: &T) -> Option<NodeIndex<Ix>> {
        let Some(hint) = hint.node.filter(|&x| self.arena.contains(x)) else {
            return self.root;
        };
        let (lower, upper) = self.subtree_bounds(hint);
        let after_lower = lower.map_or(Ordering::Greater, |l| self.compare_with(value, l));
        let before_upper = upper.map_or(Ordering::Less, |u| self.compare_with(value, u));
        match (after_lower, before_upper) {
            (Ordering::Greater, Ordering::Less) => Some(hint),
            (Ordering::Equal, _) => lower,
            (_, Ordering::Equal) => upper,
            _ => self.root,
        }
    }

    /// Nearest ancestors bounding the subtree of `x` from below and from above.
    fn subtree_bounds(&self, x: NodeIndex<Ix>) -> (Option<NodeIndex<Ix>>, Option<NodeIndex<Ix>>) {
        let (mut lower, mut upper) = (None, None);
        let mut cur = x;
        while let Some(parent) = self.arena.node_ref(cur, Node::parent) {
            match self.arena.dir(cur) {
                Some(Dir::Right) if lower.is_none() => lower = Some(parent),
                Some(Dir::Left) if upper.is_none() => upper = Some(parent),
                _ => {}
            }
            if lower.is_some() && upper.is_some() {
                break;
            }
            cur = parent;
        }
        (lower, upper)
    }

    /// Rotate `x` above its parent, keeping the root index in sync.
    fn rotate_up(&mut self, x: NodeIndex<Ix>) {
        self.arena.get_on_surface(x);
        if self.arena.node_ref(x, Node::parent).is_none() {
            self.root = Some(x);
        }
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut x: NodeIndex<Ix>) {
        loop {
            let Some(parent) = self.arena.node_ref(x, Node::parent) else {
                self.arena.node_mut(x, Node::set_color(Color::Black));
                return;
            };
            if self.arena.node_ref(parent, Node::is_black) {
                return;
            }
            let Some(grand_parent) = self.arena.node_ref(parent, Node::parent) else {
                self.arena.node_mut(parent, Node::set_color(Color::Black));
                return;
            };
            let uncle = self.arena.uncle(x);
            if let Some(uncle) = uncle.filter(|&u| self.arena.is_red(Some(u))) {
                trace!("insert fixup: recolor below {grand_parent:?}");
                self.arena.node_mut(parent, Node::set_color(Color::Black));
                self.arena.node_mut(uncle, Node::set_color(Color::Black));
                self.arena.node_mut(grand_parent, Node::set_color(Color::Red));
                x = grand_parent;
                continue;
            }

            let mut top = parent;
            if !self.arena.is_outer_grandchild(x) {
                trace!("insert fixup: double rotation at {grand_parent:?}");
                self.rotate_up(x);
                top = x;
            } else {
                trace!("insert fixup: single rotation at {grand_parent:?}");
            }
            self.rotate_up(top);
            self.arena.node_mut(top, Node::set_color(Color::Black));
            let children = self.arena.node_ref(top, |tn| tn.children);
            for child in children.into_iter().flatten() {
                self.arena.node_mut(child, Node::set_color(Color::Red));
            }
            return;
        }
    }

    /// Unlink and free a live node.
    fn erase_node(&mut self, node: NodeIndex<Ix>) -> T {
        if let [Some(left), Some(_)] = self.arena.node_ref(node, |n| n.children) {
            let pred = self.arena.extreme(left, Dir::Right);
            self.splice_predecessor(node, pred);
        }

        let child = self.arena.only_child(node);
        if child.is_none() && self.arena.node_ref(node, Node::is_black) {
            self.remove_fixup(node);
        }

        let parent = self.arena.node_ref(node, Node::parent);
        let dir = self.arena.dir(node);
        if let Some(child) = child {
            let color = self.arena.node_ref(node, Node::color);
            self.arena.node_mut(child, Node::set_parent(parent));
            self.arena.node_mut(child, Node::set_color(color));
        }
        match (parent, dir) {
            (Some(parent), Some(dir)) => self.arena.node_mut(parent, Node::set_child(dir, child)),
            _ => self.root = child,
        }

        let value = self.arena.deallocate(node);
        self.len -= 1;
        #[cfg(debug_assertions)]
        self.assert_consistent();
        value
    }

    /// Exchange the tree positions of `node` and its in-order predecessor `pred`.
    ///
    /// Values stay in their nodes. Afterwards `node` sits where `pred` was, with at
    /// most a left child, and `pred` carries the links and color of `node`.
    fn splice_predecessor(&mut self, node: NodeIndex<Ix>, pred: NodeIndex<Ix>) {
        let (pred_parent, pred_left, pred_color) =
            self.arena.node_ref(pred, |pn| (pn.parent, pn.left(), pn.color));

        self.arena.steal_links(pred, node);
        if self.root == Some(node) {
            self.root = Some(pred);
        }
        if pred_parent != Some(node) {
            // the predecessor was the rightmost node below the left child
            self.arena.node_mut(node, Node::set_parent(pred_parent));
            if let Some(pred_parent) = pred_parent {
                self.arena
                    .node_mut(pred_parent, Node::set_child(Dir::Right, Some(node)));
            }
        }
        self.arena.node_mut(node, |n| {
            n.children = [pred_left, None];
            n.color = pred_color;
        });
        if let Some(pred_left) = pred_left {
            self.arena.node_mut(pred_left, Node::set_parent(Some(node)));
        }
    }

    /// Restore red-black tree properties before a black leaf `x` is unlinked.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while let Some(parent) = self.arena.node_ref(x, Node::parent) {
            let dir = self.arena.slot_in(parent, x);
            let Some(sibling) = self.arena.node_ref(parent, |pn| pn.child(!dir)) else {
                panic!("black-height violated: black node {x:?} has no sibling");
            };

            if self.arena.node_ref(sibling, Node::is_red) {
                trace!("remove fixup: red sibling {sibling:?}");
                self.rotate_up(sibling);
                self.arena.node_mut(sibling, Node::set_color(Color::Black));
                self.arena.node_mut(parent, Node::set_color(Color::Red));
                continue;
            }

            if self.arena.all_children_black(sibling) {
                trace!("remove fixup: recolor sibling {sibling:?}");
                self.arena.node_mut(sibling, Node::set_color(Color::Red));
                if self.arena.node_ref(parent, Node::is_red) {
                    self.arena.node_mut(parent, Node::set_color(Color::Black));
                    return;
                }
                x = parent;
                continue;
            }

            let mut sibling = sibling;
            let near = self.arena.node_ref(sibling, |sn| sn.child(dir));
            if let Some(near) = near.filter(|&n| self.arena.is_red(Some(n))) {
                trace!("remove fixup: rotate near nephew {near:?}");
                self.rotate_up(near);
                sibling = near;
            }
            trace!("remove fixup: rotate sibling {sibling:?}");
            let far = self.arena.node_ref(sibling, |sn| sn.child(!dir));
            let parent_color = self.arena.node_ref(parent, Node::color);
            self.rotate_up(sibling);
            self.arena.node_mut(sibling, Node::set_color(parent_color));
            self.arena.node_mut(parent, Node::set_color(Color::Black));
            if let Some(far) = far {
                self.arena.node_mut(far, Node::set_color(Color::Black));
            }
            return;
        }
    }
}

impl<T, C, Ix> RbTree<T, C, Ix>
where
    Ix: IndexType,
{
    /// In-order neighbour of a possibly absent node.
    ///
    /// From the end sentinel a step to the right reaches the minimum and a step to the
    /// left reaches the maximum. Stale nodes lead to the sentinel.
    pub(crate) fn advance(&self, node: Option<NodeIndex<Ix>>, dir: Dir) -> Option<NodeIndex<Ix>> {
        match node {
            Some(x) if self.arena.contains(x) => self.arena.step(x, dir),
            Some(_) => None,
            None => self.root.map(|root| self.arena.extreme(root, !dir)),
        }
    }

    /// Mirror the node graph into `arena`, node for node.
    fn mirror_into(&self, arena: &mut NodeArena<T, Ix>) -> Option<NodeIndex<Ix>>
    where
        T: Clone,
    {
        let mut mirrored_root = None;
        let mut pending = vec![(self.root?, None)];
        while let Some((src, link)) = pending.pop() {
            let (value, color, children) = self
                .arena
                .node_ref(src, |sn| (sn.value().clone(), sn.color, sn.children));
            let dst = match arena.allocate(value, link.map(|(parent, _)| parent)) {
                Ok(dst) => dst,
                Err((err, _)) => panic!("{err}"),
            };
            arena.node_mut(dst, Node::set_color(color));
            match link {
                Some((parent, dir)) => arena.node_mut(parent, Node::set_child(dir, Some(dst))),
                None => mirrored_root = Some(dst),
            }
            for (dir, child) in [(Dir::Right, children[1]), (Dir::Left, children[0])] {
                if let Some(child) = child {
                    pending.push((child, Some((dst, dir))));
                }
            }
        }
        mirrored_root
    }
}

impl<T, C, Ix> Default for RbTree<T, C, Ix>
where
    C: Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        RbTree {
            arena: NodeArena::new(),
            root: None,
            len: 0,
            comparator: C::default(),
        }
    }
}

/// Cloning copies the exact shape and colors of the tree.
impl<T, C, Ix> Clone for RbTree<T, C, Ix>
where
    T: Clone,
    C: Clone,
    Ix: IndexType,
{
    fn clone(&self) -> Self {
        let mut arena = NodeArena::with_capacity(self.len);
        let root = self.mirror_into(&mut arena);
        RbTree {
            arena,
            root,
            len: self.len,
            comparator: self.comparator.clone(),
        }
    }

    /// Reuses the node storage of `self`.
    fn clone_from(&mut self, source: &Self) {
        self.arena.clear();
        self.root = source.mirror_into(&mut self.arena);
        self.len = source.len;
        self.comparator.clone_from(&source.comparator);
    }
}

impl<T, C, Ix> fmt::Debug for RbTree<T, C, Ix>
where
    T: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, Ix> PartialEq for RbTree<T, C, Ix>
where
    T: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, C, Ix> Eq for RbTree<T, C, Ix>
where
    T: Eq,
    Ix: IndexType,
{
}

impl<T, C, Ix> FromIterator<T> for RbTree<T, C, Ix>
where
    C: Compare<T> + Default,
    Ix: IndexType,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<T, C, Ix> Extend<T> for RbTree<T, C, Ix>
where
    C: Compare<T>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ignore = self.insert(value);
        }
    }
}

impl<'a, T, C, Ix> Extend<&'a T> for RbTree<T, C, Ix>
where
    T: Copy + 'a,
    C: Compare<T>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, C, Ix> IntoIterator for &'a RbTree<T, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, Ix> IntoIterator for RbTree<T, C, Ix>
where
    Ix: IndexType,
{
    type Item = T;
    type IntoIter = IntoIter<T, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
