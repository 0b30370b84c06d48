use crate::error::AllocError;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::node::Node;

/// Node storage of a [`RbTree`](crate::RbTree).
///
/// The arena is the allocator of the tree: every node lives in a slot of one vector
/// and is addressed by a [`NodeIndex`]. Freed slots are kept on a vacant list and
/// handed out again by the next allocation, so a node never moves while it is alive.
///
/// An arena is handed to [`RbTree::new_in`](crate::RbTree::new_in) together with a
/// comparator; the index width `Ix` bounds how many nodes it can hold.
#[derive(Debug)]
pub struct NodeArena<T, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<T, Ix>>,
    /// Slots released by `deallocate`
    pub(crate) vacant: Vec<NodeIndex<Ix>>,
}

impl<T, Ix> NodeArena<T, Ix>
where
    Ix: IndexType,
{
    /// Creates an empty arena.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` nodes.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Number of nodes the arena can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.vacant.len()
    }

    /// Allocate a red node holding `value`.
    ///
    /// On failure the value is handed back untouched and no slot is consumed.
    pub(crate) fn allocate(
        &mut self,
        value: T,
        parent: Option<NodeIndex<Ix>>,
    ) -> Result<NodeIndex<Ix>, (AllocError, T)> {
        if let Some(idx) = self.vacant.pop() {
            self.nodes[idx.index()] = Node::new(value, parent);
            return Ok(idx);
        }
        let next = self.nodes.len();
        if next >= NodeIndex::<Ix>::limit() {
            return Err((AllocError::CapacityExhausted { limit: next }, value));
        }
        if let Err(err) = self.nodes.try_reserve(1) {
            return Err((err.into(), value));
        }
        self.nodes.push(Node::new(value, parent));
        Ok(NodeIndex::new(next))
    }

    /// Release a node and return its value. The caller must have unlinked it.
    pub(crate) fn deallocate(&mut self, idx: NodeIndex<Ix>) -> T {
        let node = &mut self.nodes[idx.index()];
        let value = node.take_value();
        node.vacate();
        self.vacant.push(idx);
        value
    }

    /// Drop every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
    }

    /// Check whether `idx` addresses a live node.
    pub(crate) fn contains(&self, idx: NodeIndex<Ix>) -> bool {
        self.nodes
            .get(idx.index())
            .is_some_and(|node| !node.is_vacant())
    }

    /// Value of a node, `None` for vacant or out of range slots.
    pub(crate) fn value(&self, idx: NodeIndex<Ix>) -> Option<&T> {
        self.nodes.get(idx.index()).and_then(|node| node.value.as_ref())
    }
}

impl<T, Ix> Default for NodeArena<T, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// Convenient methods for reference or mutate a node
impl<'a, T, Ix> NodeArena<T, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }
}
