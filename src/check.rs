use crate::compare::Compare;
use crate::error::InvariantViolation;
use crate::index::{IndexType, NodeIndex};
use crate::node::{Dir, Node};
use crate::tree::RbTree;

impl<T, C, Ix> RbTree<T, C, Ix>
where
    C: Compare<T>,
    Ix: IndexType,
{
    /// Check every red-black and linkage invariant of the tree.
    ///
    /// The root is black, no red node has a red child, every path from the root to a
    /// null link crosses the same number of black nodes, every child points back at
    /// its parent, the in-order sequence is strictly increasing under the comparator
    /// and the stored length matches the reachable nodes.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered_tree::RbTree;
    ///
    /// let tree: RbTree<_> = (0..1000).rev().collect();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return self.check_length(0);
        };
        if self.arena.node_ref(root, Node::is_red) {
            return Err(InvariantViolation::RedRoot);
        }
        if self.arena.node_ref(root, Node::parent).is_some() {
            return Err(InvariantViolation::ParentLink { node: root.index() });
        }

        // black-height of the leftmost path is the reference
        let mut expected = 0;
        let mut x = Some(root);
        while let Some(n) = x {
            expected += usize::from(self.arena.node_ref(n, Node::is_black));
            x = self.arena.node_ref(n, Node::left);
        }

        let mut reachable = 0;
        let mut pending: Vec<(NodeIndex<Ix>, usize)> = vec![(root, 0)];
        while let Some((x, above)) = pending.pop() {
            reachable += 1;
            let (is_red, children) = self.arena.node_ref(x, |xn| (xn.is_red(), xn.children));
            let black = above + usize::from(!is_red);
            for child in children {
                let Some(child) = child else {
                    if black != expected {
                        return Err(InvariantViolation::BlackHeight {
                            expected,
                            found: black,
                        });
                    }
                    continue;
                };
                if self.arena.node_ref(child, Node::parent) != Some(x) {
                    return Err(InvariantViolation::ParentLink {
                        node: child.index(),
                    });
                }
                if is_red && self.arena.node_ref(child, Node::is_red) {
                    return Err(InvariantViolation::RedChildOfRed {
                        node: child.index(),
                    });
                }
                pending.push((child, black));
            }
        }
        self.check_length(reachable)?;
        self.check_order(root)
    }

    fn check_length(&self, reachable: usize) -> Result<(), InvariantViolation> {
        for found in [reachable, self.arena.live()] {
            if found != self.len {
                return Err(InvariantViolation::Length {
                    expected: self.len,
                    found,
                });
            }
        }
        Ok(())
    }

    fn check_order(&self, root: NodeIndex<Ix>) -> Result<(), InvariantViolation> {
        let mut prev = self.arena.extreme(root, Dir::Left);
        while let Some(next) = self.arena.step(prev, Dir::Right) {
            let ordered = self.arena.node_ref(prev, |pn| {
                self.arena
                    .node_ref(next, |nn| self.comparator.less(pn.value(), nn.value()))
            });
            if !ordered {
                return Err(InvariantViolation::Order { node: next.index() });
            }
            prev = next;
        }
        Ok(())
    }

    /// Panic on a corrupted tree, used after every removal in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn assert_consistent(&self) {
        if let Err(violation) = self.validate() {
            log::error!("red-black tree corrupted: {violation}");
            panic!("red-black tree corrupted: {violation}");
        }
    }
}
