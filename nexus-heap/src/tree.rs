//! Linked complete binary tree with O(1) growth and shrinkage at its end.
//!
//! Nodes live in a slab and link to each other by [`Locator`]. The tree only
//! ever changes shape at its breadth-first end: [`add_last`] appends the node
//! after the current last one, [`remove_last`] detaches the last one. Both are
//! O(1) thanks to the frontier, a deque of every node that still has room for
//! a child, kept in breadth-first order.
//!
//! ```text
//!            a              frontier: [c, d, e]
//!          /   \                       ^     ^
//!         b     c          next parent ┘     └ last node
//!        / \
//!       d   e
//! ```
//!
//! [`add_last`]: CompleteTree::add_last
//! [`remove_last`]: CompleteTree::remove_last

use std::collections::VecDeque;

use slab::Slab;
use tracing::trace;

use crate::{HeapError, Locator};

/// Receives the new position of every element the tree moves between nodes.
///
/// [`CompleteTree::swap_elements`] and [`CompleteTree::replace_element`] call
/// [`relocate`](Relocate::relocate) once per element that lands on a new node.
/// Element types that mirror their own position (such as heap entries) update
/// it here, which keeps "element knows its node" and "node holds its element"
/// in sync.
///
/// Any `FnMut(&T, Locator)` closure is a `Relocate<T>`.
pub trait Relocate<T> {
    /// `element` now lives at `locator`.
    fn relocate(&mut self, element: &T, locator: Locator);
}

impl<T, F> Relocate<T> for F
where
    F: FnMut(&T, Locator),
{
    #[inline]
    fn relocate(&mut self, element: &T, locator: Locator) {
        self(element, locator)
    }
}

#[derive(Debug)]
struct Node<T> {
    parent: Locator,
    left: Locator,
    right: Locator,
    element: T,
}

/// A complete binary tree: every level full except possibly the last, which
/// fills left to right.
///
/// # Example
///
/// ```
/// use nexus_heap::CompleteTree;
///
/// let mut tree: CompleteTree<char> = CompleteTree::new();
/// let a = tree.add_last('a');
/// let b = tree.add_last('b');
/// let c = tree.add_last('c');
///
/// assert_eq!(tree.left(a), Some(b));
/// assert_eq!(tree.right(a), Some(c));
/// assert_eq!(tree.last(), Some(c));
///
/// assert_eq!(tree.remove_last(), Ok('c'));
/// assert_eq!(tree.last(), Some(b));
/// assert!(!tree.has_right(a));
/// ```
#[derive(Debug)]
pub struct CompleteTree<T> {
    nodes: Slab<Node<T>>,
    root: Locator,
    /// Nodes with fewer than two children, breadth-first. Front is the
    /// parent of the next `add_last`, back is the last node.
    frontier: VecDeque<Locator>,
}

impl<T> Default for CompleteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompleteTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: Locator::NONE,
            frontier: VecDeque::new(),
        }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: Locator::NONE,
            // Roughly half the nodes sit on the frontier at any time.
            frontier: VecDeque::with_capacity(capacity / 2 + 1),
        }
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Returns the root, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<Locator> {
        self.root.get()
    }

    /// Returns the last node in breadth-first order, or `None` if empty.
    #[inline]
    pub fn last(&self) -> Option<Locator> {
        self.frontier.back().copied()
    }

    /// Returns `true` if `loc` is the root.
    #[inline]
    pub fn is_root(&self, loc: Locator) -> bool {
        loc == self.root
    }

    /// Returns the parent of `loc`, or `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn parent(&self, loc: Locator) -> Option<Locator> {
        self.node(loc).parent.get()
    }

    /// Returns the left child of `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn left(&self, loc: Locator) -> Option<Locator> {
        self.node(loc).left.get()
    }

    /// Returns the right child of `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn right(&self, loc: Locator) -> Option<Locator> {
        self.node(loc).right.get()
    }

    /// Returns `true` if `loc` has a left child.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn has_left(&self, loc: Locator) -> bool {
        self.node(loc).left.is_some()
    }

    /// Returns `true` if `loc` has a right child.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn has_right(&self, loc: Locator) -> bool {
        self.node(loc).right.is_some()
    }

    /// Returns the element stored at `loc`, or `None` if `loc` is vacant.
    #[inline]
    pub fn get(&self, loc: Locator) -> Option<&T> {
        self.nodes.get(loc.slot()).map(|node| &node.element)
    }

    /// Returns the element stored at `loc` mutably, or `None` if vacant.
    #[inline]
    pub fn get_mut(&mut self, loc: Locator) -> Option<&mut T> {
        self.nodes.get_mut(loc.slot()).map(|node| &mut node.element)
    }

    /// Returns the element stored at `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    #[inline]
    pub fn element(&self, loc: Locator) -> &T {
        &self.node(loc).element
    }

    #[inline]
    fn node(&self, loc: Locator) -> &Node<T> {
        self.nodes.get(loc.slot()).expect("invalid locator")
    }

    #[inline]
    fn node_mut(&mut self, loc: Locator) -> &mut Node<T> {
        self.nodes.get_mut(loc.slot()).expect("invalid locator")
    }

    // ========================================================================
    // Structural mutation
    // ========================================================================

    /// Appends `element` as the new last node and returns its locator.
    ///
    /// The node becomes the root of an empty tree, otherwise a child of the
    /// first node on the frontier: the left child if that slot is free, else
    /// the right child, which fills the parent and drops it from the frontier.
    pub fn add_last(&mut self, element: T) -> Locator {
        let parent = self.frontier.front().copied().unwrap_or(Locator::NONE);

        let loc = Locator::from_slot(self.nodes.insert(Node {
            parent,
            left: Locator::NONE,
            right: Locator::NONE,
            element,
        }));

        if parent.is_none() {
            debug_assert!(self.root.is_none(), "frontier empty on non-empty tree");
            self.root = loc;
        } else {
            let p = self.node_mut(parent);
            if p.left.is_none() {
                p.left = loc;
            } else {
                debug_assert!(p.right.is_none(), "full node on frontier");
                p.right = loc;
                self.frontier.pop_front();
            }
        }

        self.frontier.push_back(loc);
        trace!(slot = loc.slot(), len = self.len(), "attached last node");
        loc
    }

    /// Detaches the last node and returns its element.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::EmptyStructure`] if the tree has no nodes.
    pub fn remove_last(&mut self) -> Result<T, HeapError> {
        let loc = self.frontier.pop_back().ok_or(HeapError::EmptyStructure)?;
        let node = self.nodes.remove(loc.slot());

        if node.parent.is_none() {
            debug_assert!(self.is_empty(), "detached root with nodes remaining");
            self.root = Locator::NONE;
        } else {
            let parent = node.parent;
            let p = self.node_mut(parent);
            if p.right == loc {
                // The parent was full and off the frontier. It takes the next
                // child again, ahead of everything currently queued.
                p.right = Locator::NONE;
                self.frontier.push_front(parent);
            } else {
                // A left child is only last while its parent is the frontier
                // front, so the parent is already in place.
                debug_assert!(p.left == loc && p.right.is_none());
                p.left = Locator::NONE;
                debug_assert_eq!(self.frontier.front(), Some(&parent));
            }
        }

        trace!(slot = loc.slot(), len = self.len(), "detached last node");
        Ok(node.element)
    }

    /// Swaps the elements stored at `a` and `b`, leaving the nodes in place.
    ///
    /// `relocator` is told about both moved elements. Swapping a node with
    /// itself is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if either locator is not in the tree.
    pub fn swap_elements<R>(&mut self, a: Locator, b: Locator, relocator: &mut R)
    where
        R: Relocate<T>,
    {
        if a == b {
            return;
        }

        let (node_a, node_b) = self
            .nodes
            .get2_mut(a.slot(), b.slot())
            .expect("invalid locator");
        core::mem::swap(&mut node_a.element, &mut node_b.element);
        relocator.relocate(&node_a.element, a);
        relocator.relocate(&node_b.element, b);
    }

    /// Stores `element` at `loc` and returns the element it displaces.
    ///
    /// `relocator` is told about the incoming element.
    ///
    /// # Panics
    ///
    /// Panics if `loc` is not in the tree.
    pub fn replace_element<R>(&mut self, loc: Locator, element: T, relocator: &mut R) -> T
    where
        R: Relocate<T>,
    {
        let node = self.node_mut(loc);
        let old = core::mem::replace(&mut node.element, element);
        relocator.relocate(&node.element, loc);
        old
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.frontier.clear();
        self.root = Locator::NONE;
    }

    /// Walks the tree and panics on any broken structural invariant:
    /// link symmetry, completeness, and frontier contents/order.
    #[cfg(test)]
    pub(crate) fn assert_complete(&self) {
        if self.root.is_none() {
            assert!(self.nodes.is_empty(), "rootless tree has nodes");
            assert!(self.frontier.is_empty(), "rootless tree has frontier");
            return;
        }

        assert!(self.node(self.root).parent.is_none(), "root has a parent");

        let mut queue = VecDeque::from([self.root]);
        let mut open = Vec::new();
        let mut seen = 0usize;
        let mut gap = false;

        while let Some(loc) = queue.pop_front() {
            seen += 1;
            let node = self.node(loc);

            for child in [node.left, node.right] {
                if child.is_none() {
                    gap = true;
                    continue;
                }
                assert!(!gap, "child after a gap in breadth-first order");
                assert_eq!(self.node(child).parent, loc, "child/parent mismatch");
                queue.push_back(child);
            }

            if node.right.is_none() {
                open.push(loc);
            }
        }

        assert_eq!(seen, self.nodes.len(), "unreachable nodes in slab");
        assert!(
            self.frontier.iter().copied().eq(open.iter().copied()),
            "frontier {:?} does not match open nodes {:?}",
            self.frontier,
            open
        );
    }
}
