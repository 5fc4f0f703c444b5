//! Key ordering and key admission.
//!
//! The heap never looks inside keys. It asks a [`Comparator`] for their
//! relative order and a [`KeyPolicy`] whether a key may enter the heap at all.

use core::cmp::Ordering;
use core::ops::{Range, RangeInclusive};

/// Total order over heap keys.
///
/// Implemented for [`NaturalOrder`], [`ReverseOrder`] and any closure or
/// function with the signature `Fn(&K, &K) -> Ordering`. A boxed
/// `Box<dyn Fn(&K, &K) -> Ordering>` works too, which is the way to swap
/// between different orderings on the same heap type.
///
/// # Example
///
/// ```
/// use nexus_heap::{AdaptableHeap, Comparator};
/// use std::cmp::Ordering;
///
/// // Order strings by length only.
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);
///
/// let mut heap = AdaptableHeap::with_comparator(by_len);
/// heap.insert("three", 3).unwrap();
/// heap.insert("one", 1).unwrap();
/// assert_eq!(*heap.min().unwrap().key(), "one");
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys. `Less` means `a` is closer to the root than `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation (a min-heap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses the [`Ord`] implementation of the key (a max-heap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Admission check applied to keys on `insert` and `replace_key`.
///
/// A rejected key makes the operation fail with
/// [`HeapError::InvalidKey`](crate::HeapError::InvalidKey) before anything
/// is modified.
///
/// Implemented for [`AnyKey`], for `Range<K>` / `RangeInclusive<K>` and for
/// any `Fn(&K) -> bool`.
///
/// # Example
///
/// ```
/// use nexus_heap::{HeapBuilder, HeapError};
///
/// let mut heap = HeapBuilder::new().key_policy(0..=100).build::<i32, &str>();
///
/// assert!(heap.insert(42, "ok").is_ok());
/// assert_eq!(heap.insert(101, "too big"), Err(HeapError::InvalidKey));
/// ```
pub trait KeyPolicy<K: ?Sized> {
    /// Returns `true` if `key` may be stored in the heap.
    fn accepts(&self, key: &K) -> bool;
}

/// Accepts every key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyKey;

impl<K: ?Sized> KeyPolicy<K> for AnyKey {
    #[inline]
    fn accepts(&self, _key: &K) -> bool {
        true
    }
}

impl<K: PartialOrd> KeyPolicy<K> for Range<K> {
    #[inline]
    fn accepts(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K: PartialOrd> KeyPolicy<K> for RangeInclusive<K> {
    #[inline]
    fn accepts(&self, key: &K) -> bool {
        self.contains(key)
    }
}

impl<K: ?Sized, F> KeyPolicy<K> for F
where
    F: Fn(&K) -> bool,
{
    #[inline]
    fn accepts(&self, key: &K) -> bool {
        self(key)
    }
}
