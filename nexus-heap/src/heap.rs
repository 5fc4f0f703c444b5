//! Adaptable min-heap over a [`CompleteTree`].
//!
//! Entries live in a slab of records owned by the heap. The tree stores each
//! record's slot as its element and every record remembers the [`Locator`] of
//! the node holding it. That back-reference is what makes arbitrary removal
//! and re-keying O(log n): a [`Handle`] leads to the record, the record leads
//! to its node, and reordering starts right there.
//!
//! ```text
//!   Handle ──► records[slot] ──locator──► tree node ──element──► slot
//!                    ▲                                            │
//!                    └────────────────────────────────────────────┘
//! ```
//!
//! Every mutation first changes the tree shape at its end (`add_last` or
//! `remove_last`, both O(1)) and then walks up or down at most the tree height
//! to restore heap order. Each swap during that walk moves two slots between
//! nodes and rewrites both records' locators.

use core::mem;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use slab::Slab;
use tracing::{debug, trace};

use crate::{
    AnyKey, Comparator, CompleteTree, Entry, EntryRef, Handle, HeapError, KeyPolicy, Locator,
    NaturalOrder,
};

/// Source of per-heap ids embedded in handles.
static NEXT_HEAP_ID: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
struct Record<K, V> {
    key: K,
    value: V,
    /// Node currently holding this record's slot.
    locator: Locator,
    stamp: u64,
}

/// A min-heap whose entries can be located, re-keyed and removed by handle.
///
/// Ordering comes from the comparator `C` (default [`NaturalOrder`]), key
/// admission from the policy `P` (default [`AnyKey`]).
///
/// # Example
///
/// ```
/// use nexus_heap::AdaptableHeap;
///
/// let mut heap: AdaptableHeap<u32, &str> = AdaptableHeap::new();
///
/// let low = heap.insert(10, "low").unwrap();
/// let high = heap.insert(1, "high").unwrap();
/// let mid = heap.insert(5, "medium").unwrap();
///
/// assert_eq!(*heap.min().unwrap().value(), "high");
///
/// // Re-prioritise an arbitrary entry.
/// heap.replace_key(low, 0).unwrap();
/// assert_eq!(heap.min().unwrap().handle(), low);
///
/// // Remove from the middle.
/// let removed = heap.remove(mid).unwrap();
/// assert_eq!(removed.into_parts(), (5, "medium"));
///
/// assert_eq!(heap.remove_min().unwrap().into_value(), "low");
/// assert_eq!(heap.remove_min().unwrap().into_value(), "high");
/// assert!(heap.is_empty());
/// # let _ = high;
/// ```
pub struct AdaptableHeap<K, V, C = NaturalOrder, P = AnyKey> {
    tree: CompleteTree<usize>,
    records: Slab<Record<K, V>>,
    comparator: C,
    policy: P,
    id: u32,
    next_stamp: u64,
}

impl<K: Ord, V> AdaptableHeap<K, V> {
    /// Creates an empty heap ordered by `K`'s [`Ord`].
    pub fn new() -> Self {
        HeapBuilder::new().build()
    }

    /// Creates an empty heap ordered by `K`'s [`Ord`] with room for
    /// `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        HeapBuilder::new().capacity(capacity).build()
    }
}

impl<K: Ord, V> Default for AdaptableHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparator<K>> AdaptableHeap<K, V, C> {
    /// Creates an empty heap ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        HeapBuilder::new().comparator(comparator).build()
    }
}

impl<K, V, C, P> AdaptableHeap<K, V, C, P>
where
    C: Comparator<K>,
    P: KeyPolicy<K>,
{
    fn from_parts(capacity: usize, comparator: C, policy: P) -> Self {
        Self {
            tree: CompleteTree::with_capacity(capacity),
            records: Slab::with_capacity(capacity),
            comparator,
            policy,
            id: NEXT_HEAP_ID.fetch_add(1, AtomicOrdering::Relaxed),
            next_stamp: 0,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the heap holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of entries the heap can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Returns the comparator ordering this heap.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the key admission policy.
    #[inline]
    pub fn key_policy(&self) -> &P {
        &self.policy
    }

    // ========================================================================
    // Queue operations
    // ========================================================================

    /// Returns the entry with the minimum key without removing it.
    ///
    /// # Errors
    ///
    /// [`HeapError::EmptyStructure`] if the heap is empty.
    pub fn min(&self) -> Result<EntryRef<'_, K, V>, HeapError> {
        let root = self.tree.root().ok_or(HeapError::EmptyStructure)?;
        Ok(self.entry_ref(*self.tree.element(root)))
    }

    /// Inserts a key/value pair and returns a handle to the new entry.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidKey`] if the key policy rejects `key`. The heap is
    /// left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, HeapError> {
        if !self.policy.accepts(&key) {
            debug!(heap = self.id, "insert rejected by key policy");
            return Err(HeapError::InvalidKey);
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let slot = self.records.insert(Record {
            key,
            value,
            locator: Locator::NONE,
            stamp,
        });
        let loc = self.tree.add_last(slot);
        self.records[slot].locator = loc;
        self.up_heap(loc);

        Ok(Handle {
            heap: self.id,
            slot,
            stamp,
        })
    }

    /// Removes and returns the entry with the minimum key.
    ///
    /// # Errors
    ///
    /// [`HeapError::EmptyStructure`] if the heap is empty.
    pub fn remove_min(&mut self) -> Result<Entry<K, V>, HeapError> {
        let handle = self.min()?.handle();
        self.remove(handle)
    }

    /// Removes and returns the entry addressed by `handle`, wherever it sits.
    ///
    /// The structurally last entry takes over the removed entry's node and is
    /// sifted into place from there.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidLocator`] if `handle` is not resident in this heap.
    pub fn remove(&mut self, handle: Handle) -> Result<Entry<K, V>, HeapError> {
        let slot = self.resolve(handle)?;
        let target = self.records[slot].locator;

        let last = self.tree.remove_last()?;
        if last != slot {
            let records = &mut self.records;
            let displaced = self.tree.replace_element(target, last, &mut |s: &usize, loc: Locator| {
                records[*s].locator = loc;
            });
            debug_assert_eq!(displaced, slot);

            let loc = self.down_heap(target);
            self.up_heap(loc);
        }

        let record = self.records.remove(slot);
        trace!(heap = self.id, slot, len = self.len(), "removed entry");
        Ok(Entry::new(record.key, record.value))
    }

    /// Replaces the key of the entry addressed by `handle` and returns the
    /// old key. The entry moves up or down to its new place.
    ///
    /// # Errors
    ///
    /// - [`HeapError::InvalidLocator`] if `handle` is not resident in this heap.
    /// - [`HeapError::InvalidKey`] if the key policy rejects `key`; the entry
    ///   keeps its old key and position.
    pub fn replace_key(&mut self, handle: Handle, key: K) -> Result<K, HeapError> {
        let slot = self.resolve(handle)?;
        if !self.policy.accepts(&key) {
            debug!(heap = self.id, slot, "replace_key rejected by key policy");
            return Err(HeapError::InvalidKey);
        }

        let record = &mut self.records[slot];
        let old = mem::replace(&mut record.key, key);
        let loc = record.locator;

        let loc = self.down_heap(loc);
        self.up_heap(loc);
        trace!(heap = self.id, slot, "replaced key");
        Ok(old)
    }

    /// Replaces the value of the entry addressed by `handle` and returns the
    /// old value. Values carry no order, so nothing moves.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidLocator`] if `handle` is not resident in this heap.
    pub fn replace_value(&mut self, handle: Handle, value: V) -> Result<V, HeapError> {
        let slot = self.resolve(handle)?;
        Ok(mem::replace(&mut self.records[slot].value, value))
    }

    /// Replaces the comparator. Only allowed while the heap is empty, since
    /// a new order would silently break the heap property of stored entries.
    ///
    /// Passing `None` stands for an absent comparator.
    ///
    /// # Errors
    ///
    /// - [`HeapError::NotEmpty`] if the heap holds entries.
    /// - [`HeapError::InvalidArgument`] if `comparator` is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_heap::{AdaptableHeap, HeapError};
    /// use std::cmp::Ordering;
    ///
    /// type Cmp = fn(&i32, &i32) -> Ordering;
    /// let ascending: Cmp = |a, b| a.cmp(b);
    /// let descending: Cmp = |a, b| b.cmp(a);
    ///
    /// let mut heap: AdaptableHeap<i32, (), Cmp> = AdaptableHeap::with_comparator(ascending);
    /// heap.set_comparator(descending).unwrap();
    ///
    /// heap.insert(1, ()).unwrap();
    /// heap.insert(2, ()).unwrap();
    /// assert_eq!(*heap.min().unwrap().key(), 2);
    ///
    /// assert_eq!(heap.set_comparator(ascending), Err(HeapError::NotEmpty));
    /// ```
    pub fn set_comparator(&mut self, comparator: impl Into<Option<C>>) -> Result<(), HeapError> {
        if !self.is_empty() {
            debug!(heap = self.id, len = self.len(), "comparator change refused");
            return Err(HeapError::NotEmpty);
        }
        self.comparator = comparator.into().ok_or(HeapError::InvalidArgument)?;
        debug!(heap = self.id, "comparator replaced");
        Ok(())
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns `true` if `handle` addresses an entry stored in this heap.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.lookup(handle).is_some()
    }

    /// Returns a view of the entry addressed by `handle`, or `None` if the
    /// handle is not resident in this heap.
    pub fn get(&self, handle: Handle) -> Option<EntryRef<'_, K, V>> {
        self.lookup(handle)
            .map(|record| EntryRef::new(handle, &record.key, &record.value))
    }

    /// Returns the value of the entry addressed by `handle` mutably.
    ///
    /// Keys are deliberately not exposed this way; use
    /// [`replace_key`](Self::replace_key) so the entry moves with its key.
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        self.lookup(handle)?;
        Some(&mut self.records[handle.slot].value)
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.records.iter(),
            heap: self.id,
        }
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Removes every entry. Outstanding handles stop resolving.
    pub fn clear(&mut self) {
        debug!(heap = self.id, len = self.len(), "clearing heap");
        self.tree.clear();
        self.records.clear();
    }

    /// Removes entries in key order while `pred` returns `true` for the
    /// current minimum.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_heap::AdaptableHeap;
    ///
    /// let mut timers: AdaptableHeap<u64, &str> = AdaptableHeap::new();
    /// timers.insert(100, "a").unwrap();
    /// timers.insert(50, "b").unwrap();
    /// timers.insert(150, "c").unwrap();
    ///
    /// // Fire everything due by t = 120.
    /// let fired: Vec<_> = timers
    ///     .drain_while(|deadline, _| *deadline <= 120)
    ///     .map(|e| e.into_value())
    ///     .collect();
    /// assert_eq!(fired, vec!["b", "a"]);
    /// assert_eq!(timers.len(), 1);
    /// ```
    pub fn drain_while<F>(&mut self, pred: F) -> DrainWhile<'_, K, V, C, P, F>
    where
        F: FnMut(&K, &V) -> bool,
    {
        DrainWhile { heap: self, pred }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[inline]
    fn lookup(&self, handle: Handle) -> Option<&Record<K, V>> {
        if handle.heap != self.id {
            return None;
        }
        self.records
            .get(handle.slot)
            .filter(|record| record.stamp == handle.stamp)
    }

    fn resolve(&self, handle: Handle) -> Result<usize, HeapError> {
        match self.lookup(handle) {
            Some(_) => Ok(handle.slot),
            None => {
                debug!(heap = self.id, ?handle, "handle not resident");
                Err(HeapError::InvalidLocator)
            }
        }
    }

    #[inline]
    fn entry_ref(&self, slot: usize) -> EntryRef<'_, K, V> {
        let record = &self.records[slot];
        let handle = Handle {
            heap: self.id,
            slot,
            stamp: record.stamp,
        };
        EntryRef::new(handle, &record.key, &record.value)
    }

    #[inline]
    fn key_at(&self, loc: Locator) -> &K {
        &self.records[*self.tree.element(loc)].key
    }

    #[inline]
    fn less(&self, a: Locator, b: Locator) -> bool {
        self.comparator
            .compare(self.key_at(a), self.key_at(b))
            .is_lt()
    }

    /// Swaps the entries at two nodes and points both records at their new node.
    #[inline]
    fn swap(&mut self, a: Locator, b: Locator) {
        let records = &mut self.records;
        self.tree.swap_elements(a, b, &mut |slot: &usize, loc: Locator| {
            records[*slot].locator = loc;
        });
    }

    /// Moves the entry at `loc` towards the root while it is strictly less
    /// than its parent. Returns the node it settles at.
    fn up_heap(&mut self, mut loc: Locator) -> Locator {
        while let Some(parent) = self.tree.parent(loc) {
            if !self.less(loc, parent) {
                break;
            }
            self.swap(loc, parent);
            loc = parent;
        }
        loc
    }

    /// Moves the entry at `loc` towards the leaves while it is strictly
    /// greater than its smaller child (left wins ties). Returns the node it
    /// settles at.
    fn down_heap(&mut self, mut loc: Locator) -> Locator {
        while let Some(left) = self.tree.left(loc) {
            let smaller = match self.tree.right(loc) {
                Some(right) if self.less(right, left) => right,
                _ => left,
            };
            if !self.less(smaller, loc) {
                break;
            }
            self.swap(loc, smaller);
            loc = smaller;
        }
        loc
    }

    /// Panics unless tree shape, heap order and record/node links all hold.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.tree.assert_complete();
        assert_eq!(self.tree.len(), self.records.len(), "tree/record count");

        for (slot, record) in self.records.iter() {
            assert_eq!(
                *self.tree.element(record.locator),
                slot,
                "record locator points at another entry"
            );
            if let Some(parent) = self.tree.parent(record.locator) {
                assert!(
                    !self.less(record.locator, parent),
                    "heap order violated below the root"
                );
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, P> fmt::Debug for AdaptableHeap<K, V, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.records.iter().map(|(_, r)| (&r.key, &r.value)))
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`AdaptableHeap`].
///
/// # Example
///
/// ```
/// use nexus_heap::{HeapBuilder, ReverseOrder};
///
/// // Bounded max-heap of priorities 0..=9 with room for 64 entries.
/// let mut heap = HeapBuilder::new()
///     .capacity(64)
///     .comparator(ReverseOrder)
///     .key_policy(0..=9u8)
///     .build::<u8, String>();
///
/// heap.insert(3, "three".into()).unwrap();
/// heap.insert(7, "seven".into()).unwrap();
/// assert_eq!(*heap.min().unwrap().key(), 7);
/// assert!(heap.capacity() >= 64);
/// ```
#[derive(Debug, Clone)]
pub struct HeapBuilder<C = NaturalOrder, P = AnyKey> {
    capacity: usize,
    comparator: C,
    policy: P,
}

impl Default for HeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapBuilder {
    /// Natural order, every key accepted, no pre-allocation.
    pub fn new() -> Self {
        Self {
            capacity: 0,
            comparator: NaturalOrder,
            policy: AnyKey,
        }
    }
}

impl<C, P> HeapBuilder<C, P> {
    /// Pre-allocate room for this many entries. The heap still grows past it.
    pub fn capacity(mut self, entries: usize) -> Self {
        self.capacity = entries;
        self
    }

    /// Order keys with `comparator`.
    pub fn comparator<C2>(self, comparator: C2) -> HeapBuilder<C2, P> {
        HeapBuilder {
            capacity: self.capacity,
            comparator,
            policy: self.policy,
        }
    }

    /// Admit keys with `policy`.
    pub fn key_policy<P2>(self, policy: P2) -> HeapBuilder<C, P2> {
        HeapBuilder {
            capacity: self.capacity,
            comparator: self.comparator,
            policy,
        }
    }

    /// Builds an empty heap.
    pub fn build<K, V>(self) -> AdaptableHeap<K, V, C, P>
    where
        C: Comparator<K>,
        P: KeyPolicy<K>,
    {
        AdaptableHeap::from_parts(self.capacity, self.comparator, self.policy)
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Iterator over heap entries in unspecified order.
///
/// Created by [`AdaptableHeap::iter`].
pub struct Iter<'a, K, V> {
    inner: slab::Iter<'a, Record<K, V>>,
    heap: u32,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = EntryRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (slot, record) = self.inner.next()?;
        let handle = Handle {
            heap: self.heap,
            slot,
            stamp: record.stamp,
        };
        Some(EntryRef::new(handle, &record.key, &record.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator that removes entries in key order while a predicate holds.
///
/// Created by [`AdaptableHeap::drain_while`].
pub struct DrainWhile<'a, K, V, C, P, F>
where
    F: FnMut(&K, &V) -> bool,
{
    heap: &'a mut AdaptableHeap<K, V, C, P>,
    pred: F,
}

impl<K, V, C, P, F> Iterator for DrainWhile<'_, K, V, C, P, F>
where
    C: Comparator<K>,
    P: KeyPolicy<K>,
    F: FnMut(&K, &V) -> bool,
{
    type Item = Entry<K, V>;

    fn next(&mut self) -> Option<Entry<K, V>> {
        let handle = {
            let min = self.heap.min().ok()?;
            if !(self.pred)(min.key(), min.value()) {
                return None;
            }
            min.handle()
        };
        self.heap.remove(handle).ok()
    }
}
