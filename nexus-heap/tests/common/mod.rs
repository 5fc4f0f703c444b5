#![allow(dead_code)]

use nexus_heap::{AdaptableHeap, Comparator, KeyPolicy};
use tracing_subscriber::EnvFilter;

/// Routes heap trace/debug events to the test output. Filter with `RUST_LOG`,
/// e.g. `RUST_LOG=nexus_heap=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Empties the heap through `remove_min` and returns the keys in the order
/// they came out.
pub fn drain_keys<K, V, C, P>(heap: &mut AdaptableHeap<K, V, C, P>) -> Vec<K>
where
    C: Comparator<K>,
    P: KeyPolicy<K>,
{
    let mut keys = Vec::with_capacity(heap.len());
    while let Ok(entry) = heap.remove_min() {
        keys.push(entry.into_key());
    }
    keys
}
