use std::ops::Not;

use crate::arena::NodeArena;
use crate::index::{IndexType, NodeIndex};

/// Node of the red-black tree
#[derive(Debug)]
pub struct Node<T, Ix> {
    /// Left and right children, indexed by [`Dir`]
    pub children: [Option<NodeIndex<Ix>>; 2],
    /// Parent, `None` for the root
    pub parent: Option<NodeIndex<Ix>>,
    /// Color of the node
    pub color: Color,
    /// Value of the node, `None` once the slot is vacant
    pub value: Option<T>,
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}

/// Child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    #[inline]
    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

// Convenient getter/setter methods
impl<T, Ix> Node<T, Ix>
where
    Ix: IndexType,
{
    /// New nodes start red and detached from any children.
    pub fn new(value: T, parent: Option<NodeIndex<Ix>>) -> Self {
        Node {
            children: [None, None],
            parent,
            color: Color::Red,
            value: Some(value),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn is_vacant(&self) -> bool {
        self.value.is_none()
    }

    pub fn child(&self, dir: Dir) -> Option<NodeIndex<Ix>> {
        self.children[dir as usize]
    }

    pub fn left(&self) -> Option<NodeIndex<Ix>> {
        self.child(Dir::Left)
    }

    pub fn right(&self) -> Option<NodeIndex<Ix>> {
        self.child(Dir::Right)
    }

    pub fn parent(&self) -> Option<NodeIndex<Ix>> {
        self.parent
    }

    pub fn value(&self) -> &T {
        self.value.as_ref().unwrap()
    }

    pub fn take_value(&mut self) -> T {
        self.value.take().unwrap()
    }

    /// Reset links and color of a slot whose value has been taken.
    pub fn vacate(&mut self) {
        self.children = [None, None];
        self.parent = None;
        self.color = Color::Black;
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<T, Ix>) {
        move |node: &mut Node<T, Ix>| {
            node.color = color;
        }
    }

    pub fn set_child(dir: Dir, child: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<T, Ix>) {
        move |node: &mut Node<T, Ix>| {
            node.children[dir as usize] = child;
        }
    }

    pub fn set_parent(parent: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<T, Ix>) {
        move |node: &mut Node<T, Ix>| {
            node.parent = parent;
        }
    }
}

// Structural queries and mutations around a single node.
//
// None of these look at the root or the length of a tree: the tree is the one
// that keeps its root index in sync after a rotation reaches the top.
impl<T, Ix> NodeArena<T, Ix>
where
    Ix: IndexType,
{
    /// Slot of `child` inside `parent`.
    pub(crate) fn slot_in(&self, parent: NodeIndex<Ix>, child: NodeIndex<Ix>) -> Dir {
        if self.node_ref(parent, Node::left) == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Which child slot `x` occupies in its parent, `None` for the root.
    pub(crate) fn dir(&self, x: NodeIndex<Ix>) -> Option<Dir> {
        let parent = self.node_ref(x, Node::parent)?;
        Some(self.slot_in(parent, x))
    }

    /// The other child of the parent of `x`.
    ///
    /// # Panics
    ///
    /// Panics when `x` is the root.
    pub(crate) fn sibling(&self, x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        let Some(parent) = self.node_ref(x, Node::parent) else {
            panic!("node doesn't have a parent and has no siblings");
        };
        let dir = self.slot_in(parent, x);
        self.node_ref(parent, |p| p.child(!dir))
    }

    /// Sibling of the parent, `None` without a grandparent.
    pub(crate) fn uncle(&self, x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        let parent = self.node_ref(x, Node::parent)?;
        self.node_ref(parent, Node::parent)?;
        self.sibling(parent)
    }

    /// Whether `x` and its parent hang in the same direction.
    ///
    /// # Panics
    ///
    /// Panics when `x` has no grandparent.
    pub(crate) fn is_outer_grandchild(&self, x: NodeIndex<Ix>) -> bool {
        let parent = self.node_ref(x, Node::parent);
        let has_grand_parent = parent.is_some_and(|p| self.node_ref(p, Node::parent).is_some());
        assert!(has_grand_parent, "node has no ancestors");
        self.dir(x) == parent.and_then(|p| self.dir(p))
    }

    /// Rotate `x` into the position of its parent.
    ///
    /// The parent becomes the child of `x` on the opposite side and adopts the inner
    /// subtree of `x`. The grandparent slot, if any, is redirected to `x`.
    ///
    /// # Panics
    ///
    /// Panics when `x` is the root.
    pub(crate) fn get_on_surface(&mut self, x: NodeIndex<Ix>) {
        let Some(parent) = self.node_ref(x, Node::parent) else {
            panic!("node has no parent");
        };
        let dir = self.slot_in(parent, x);
        let grand_parent = self.node_ref(parent, Node::parent);
        let parent_dir = self.dir(parent);
        let inner = self.node_ref(x, |xn| xn.child(!dir));

        self.node_mut(parent, Node::set_child(dir, inner));
        if let Some(inner) = inner {
            self.node_mut(inner, Node::set_parent(Some(parent)));
        }
        self.node_mut(x, Node::set_child(!dir, Some(parent)));
        self.node_mut(parent, Node::set_parent(Some(x)));
        self.node_mut(x, Node::set_parent(grand_parent));
        if let (Some(grand_parent), Some(parent_dir)) = (grand_parent, parent_dir) {
            self.node_mut(grand_parent, Node::set_child(parent_dir, Some(x)));
        }
    }

    /// Put `this` in the tree position of `other`.
    ///
    /// `this` takes the parent, children and color of `other`; the children and the
    /// parent slot of `other` are pointed at `this`. When `this` was a direct child of
    /// `other`, `other` fills the slot `this` vacated. The links of `other` itself are
    /// left for the caller to rewrite.
    pub(crate) fn steal_links(&mut self, this: NodeIndex<Ix>, other: NodeIndex<Ix>) {
        let (parent, mut children, color) =
            self.node_ref(other, |on| (on.parent, on.children, on.color));
        let other_dir = self.dir(other);
        for slot in &mut children {
            if *slot == Some(this) {
                *slot = Some(other);
            }
        }
        self.node_mut(this, |tn| {
            tn.parent = parent;
            tn.children = children;
            tn.color = color;
        });
        for child in children.into_iter().flatten() {
            self.node_mut(child, Node::set_parent(Some(this)));
        }
        if let (Some(parent), Some(dir)) = (parent, other_dir) {
            self.node_mut(parent, Node::set_child(dir, Some(this)));
        }
    }

    /// The only child of `x`, for nodes known to have at most one.
    pub(crate) fn only_child(&self, x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        self.node_ref(x, |xn| xn.left().or(xn.right()))
    }

    /// Absent children count as black.
    pub(crate) fn all_children_black(&self, x: NodeIndex<Ix>) -> bool {
        self.node_ref(x, |xn| !self.is_red(xn.left()) && !self.is_red(xn.right()))
    }

    /// Color test on a link, absent nodes are black.
    pub(crate) fn is_red(&self, x: Option<NodeIndex<Ix>>) -> bool {
        x.is_some_and(|x| self.node_ref(x, Node::is_red))
    }

    /// Last node reached by following `dir` links from `x`.
    pub(crate) fn extreme(&self, mut x: NodeIndex<Ix>, dir: Dir) -> NodeIndex<Ix> {
        while let Some(next) = self.node_ref(x, |xn| xn.child(dir)) {
            x = next;
        }
        x
    }

    /// In-order neighbour of `x`: the successor for `Dir::Right`, the predecessor for `Dir::Left`.
    pub(crate) fn step(&self, x: NodeIndex<Ix>, dir: Dir) -> Option<NodeIndex<Ix>> {
        if let Some(child) = self.node_ref(x, |xn| xn.child(dir)) {
            return Some(self.extreme(child, !dir));
        }
        let mut x = x;
        while self.dir(x) == Some(dir) {
            x = self.node_ref(x, Node::parent)?;
        }
        self.node_ref(x, Node::parent)
    }
}
