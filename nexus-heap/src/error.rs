//! Error types for tree and heap operations.

use thiserror::Error;

/// Failure modes of [`CompleteTree`](crate::CompleteTree) and
/// [`AdaptableHeap`](crate::AdaptableHeap) operations.
///
/// Every failing operation returns before touching the structure, so the
/// tree shape, heap order and all outstanding handles are exactly as they
/// were before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `min`, `remove_min` or `remove_last` on an empty structure.
    #[error("structure is empty")]
    EmptyStructure,

    /// The handle does not refer to an entry currently stored in this heap.
    ///
    /// Returned for handles from another heap, for entries that were already
    /// removed, and for handles outliving a `clear`.
    #[error("entry is not resident in this heap")]
    InvalidLocator,

    /// The key was rejected by the heap's [`KeyPolicy`](crate::KeyPolicy).
    #[error("key rejected by the heap's key policy")]
    InvalidKey,

    /// The comparator can only be replaced while the heap is empty.
    #[error("comparator can only be replaced on an empty heap")]
    NotEmpty,

    /// No comparator was supplied.
    #[error("comparator must be provided")]
    InvalidArgument,
}
