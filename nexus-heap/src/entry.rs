//! Caller-facing views of heap entries.

/// Capability to address one entry of one [`AdaptableHeap`](crate::AdaptableHeap).
///
/// Returned by `insert` and accepted by `remove`, `replace_key`,
/// `replace_value` and the accessors. A handle is cheap to copy and never
/// borrows the heap; the heap checks it on every use and answers
/// [`HeapError::InvalidLocator`](crate::HeapError::InvalidLocator) once the
/// entry is gone or if the handle came from a different heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    /// Id of the heap that issued the handle.
    pub(crate) heap: u32,
    /// Record slot inside that heap.
    pub(crate) slot: usize,
    /// Insertion stamp; distinguishes reuses of the same slot.
    pub(crate) stamp: u64,
}

/// An entry that has been taken out of the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key the entry had when it was removed.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value the entry had when it was removed.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the entry into its key and value.
    #[inline]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Consumes the entry, returning its key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Consumes the entry, returning its value.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Borrowed view of an entry that is still inside the heap.
#[derive(Debug)]
pub struct EntryRef<'a, K, V> {
    handle: Handle,
    key: &'a K,
    value: &'a V,
}

impl<K, V> Clone for EntryRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<'a, K, V> EntryRef<'a, K, V> {
    #[inline]
    pub(crate) fn new(handle: Handle, key: &'a K, value: &'a V) -> Self {
        Self { handle, key, value }
    }

    /// Returns the handle addressing this entry.
    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Returns the entry's current key.
    #[inline]
    pub fn key(&self) -> &'a K {
        self.key
    }

    /// Returns the entry's current value.
    #[inline]
    pub fn value(&self) -> &'a V {
        self.value
    }
}
