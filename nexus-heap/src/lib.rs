//! Adaptable priority queue over a linked complete binary tree.
//!
//! A plain binary heap can only hand out its minimum. Schedulers, timer
//! wheels and graph searches also need to cancel an arbitrary entry or
//! change its priority in place. This crate provides that: every insertion
//! returns a [`Handle`], and the handle addresses the entry for as long as it
//! stays in the heap, no matter how often it moves.
//!
//! # Design
//!
//! Two layers, each usable on its own:
//!
//! ```text
//! AdaptableHeap  - records (key, value, locator), heap order, handles
//!     │
//!     └── CompleteTree - node links, shape, frontier; knows nothing of keys
//! ```
//!
//! - [`CompleteTree`] keeps its nodes in a slab and links them by
//!   [`Locator`]. It grows and shrinks only at its breadth-first end, both in
//!   O(1), and reports every element it moves through [`Relocate`].
//! - [`AdaptableHeap`] stores each entry's slot in a tree node and keeps the
//!   node's locator in the entry's record. Any entry can be reached from its
//!   handle in O(1) and sifted from where it sits in O(log n).
//!
//! # Quick Start
//!
//! ```
//! use nexus_heap::{AdaptableHeap, HeapError};
//!
//! let mut heap: AdaptableHeap<u32, &str> = AdaptableHeap::new();
//!
//! let a = heap.insert(11, "A").unwrap();
//! heap.insert(13, "B").unwrap();
//! heap.insert(64, "C").unwrap();
//!
//! // Cancel by handle.
//! assert_eq!(heap.remove(a).unwrap().into_key(), 11);
//! assert_eq!(heap.remove(a), Err(HeapError::InvalidLocator));
//!
//! assert_eq!(*heap.min().unwrap().key(), 13);
//! ```
//!
//! # Handles
//!
//! A [`Handle`] carries the id of the heap that issued it and a stamp unique
//! to the insertion. Using a handle after its entry was removed, after
//! [`clear`](AdaptableHeap::clear), or on a different heap yields
//! [`HeapError::InvalidLocator`] and leaves the heap untouched. A recycled
//! storage slot never makes an old handle valid again.
//!
//! # Operations
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `min` | O(1) | |
//! | `insert` | O(log n) | returns a [`Handle`] |
//! | `remove_min` | O(log n) | |
//! | `remove` | O(log n) | any entry, by handle |
//! | `replace_key` | O(log n) | moves up or down |
//! | `replace_value` | O(1) | no reordering |
//! | `set_comparator` | O(1) | empty heap only |
//!
//! # Ordering and Admission
//!
//! Keys are ordered by a [`Comparator`] ([`NaturalOrder`] by default,
//! [`ReverseOrder`] for a max-heap, or any `Fn(&K, &K) -> Ordering`) and
//! admitted by a [`KeyPolicy`] ([`AnyKey`] by default, a range, or any
//! `Fn(&K) -> bool`). Both are picked through [`HeapBuilder`].

#![warn(missing_docs)]

pub mod compare;
pub mod entry;
pub mod error;
pub mod heap;
pub mod locator;
pub mod tree;

#[cfg(test)]
mod proptests;

pub use compare::{AnyKey, Comparator, KeyPolicy, NaturalOrder, ReverseOrder};
pub use entry::{Entry, EntryRef, Handle};
pub use error::HeapError;
pub use heap::{AdaptableHeap, DrainWhile, HeapBuilder, Iter};
pub use locator::Locator;
pub use tree::{CompleteTree, Relocate};
