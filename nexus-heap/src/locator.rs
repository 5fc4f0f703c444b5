//! Sentinel-based node locator.
//!
//! Tree links use a reserved sentinel value (`usize::MAX`) instead of
//! `Option<Locator>` so that a node's three links stay word-sized.

/// Opaque position of a node inside a [`CompleteTree`](crate::CompleteTree).
///
/// A locator is valid only while its node remains in the tree. Once the node
/// is removed the slot may be recycled by a later insertion, so holding on to
/// a locator past removal is a logic error.
///
/// # Example
///
/// ```
/// use nexus_heap::CompleteTree;
///
/// let mut tree: CompleteTree<u32> = CompleteTree::new();
/// let root = tree.add_last(7);
///
/// assert_eq!(tree.root(), Some(root));
/// assert_eq!(tree.get(root), Some(&7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator(usize);

impl Locator {
    /// Sentinel used for absent links.
    pub(crate) const NONE: Self = Locator(usize::MAX);

    #[inline]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        debug_assert!(slot != usize::MAX, "slot collides with sentinel");
        Locator(slot)
    }

    /// Returns the arena slot backing this locator.
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) const fn is_none(self) -> bool {
        self.0 == usize::MAX
    }

    #[inline]
    pub(crate) const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Lifts the sentinel into an `Option`.
    #[inline]
    pub(crate) const fn get(self) -> Option<Locator> {
        if self.is_none() { None } else { Some(self) }
    }
}
