use super::*;

use proptest::prelude::*;

#[derive(Clone, Debug)]
enum HeapOp {
    Insert(u16),
    RemoveMin,
    Remove(usize),
    ReplaceKey(usize, u16),
    RemoveStale(usize),
}

fn heap_ops() -> impl Strategy<Value = Vec<HeapOp>> {
    // Narrow key range so duplicates are common.
    let key = 0u16..64;
    let op = prop_oneof![
        40 => key.clone().prop_map(HeapOp::Insert),
        20 => Just(HeapOp::RemoveMin),
        15 => any::<usize>().prop_map(HeapOp::Remove),
        20 => (any::<usize>(), key).prop_map(|(i, k)| HeapOp::ReplaceKey(i, k)),
        5 => any::<usize>().prop_map(HeapOp::RemoveStale),
    ];
    prop::collection::vec(op, 0..=500)
}

#[derive(Clone, Debug)]
enum TreeOp {
    Add(u32),
    RemoveLast,
}

fn tree_ops() -> impl Strategy<Value = Vec<TreeOp>> {
    let op = prop_oneof![
        3 => any::<u32>().prop_map(TreeOp::Add),
        2 => Just(TreeOp::RemoveLast),
    ];
    prop::collection::vec(op, 0..=400)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_heap_matches_model(ops in heap_ops()) {
        let mut heap: AdaptableHeap<u16, u32> = AdaptableHeap::new();
        // (handle, key, value) of every live entry
        let mut live: Vec<(Handle, u16, u32)> = Vec::new();
        let mut dead: Vec<Handle> = Vec::new();
        let mut next_value = 0u32;

        for op in ops {
            match op {
                HeapOp::Insert(key) => {
                    let handle = heap.insert(key, next_value).unwrap();
                    live.push((handle, key, next_value));
                    next_value += 1;
                }
                HeapOp::RemoveMin => {
                    let model_min = live.iter().map(|(_, k, _)| *k).min();
                    match heap.remove_min() {
                        Ok(entry) => {
                            prop_assert_eq!(Some(*entry.key()), model_min);
                            let pos = live
                                .iter()
                                .position(|(_, _, v)| v == entry.value())
                                .unwrap();
                            let (handle, key, _) = live.swap_remove(pos);
                            prop_assert_eq!(key, *entry.key());
                            dead.push(handle);
                        }
                        Err(e) => {
                            prop_assert_eq!(e, HeapError::EmptyStructure);
                            prop_assert!(live.is_empty());
                        }
                    }
                }
                HeapOp::Remove(i) => {
                    if live.is_empty() {
                        continue;
                    }
                    let (handle, key, value) = live.swap_remove(i % live.len());
                    let entry = heap.remove(handle).unwrap();
                    prop_assert_eq!(entry.into_parts(), (key, value));
                    dead.push(handle);
                }
                HeapOp::ReplaceKey(i, key) => {
                    if live.is_empty() {
                        continue;
                    }
                    let idx = i % live.len();
                    let old = heap.replace_key(live[idx].0, key).unwrap();
                    prop_assert_eq!(old, live[idx].1);
                    live[idx].1 = key;
                }
                HeapOp::RemoveStale(i) => {
                    if dead.is_empty() {
                        continue;
                    }
                    let handle = dead[i % dead.len()];
                    let before = heap.len();
                    prop_assert_eq!(heap.remove(handle).unwrap_err(), HeapError::InvalidLocator);
                    prop_assert!(!heap.contains(handle));
                    prop_assert_eq!(heap.len(), before);
                }
            }

            heap.assert_invariants();
            prop_assert_eq!(heap.len(), live.len());
            let model_min = live.iter().map(|(_, k, _)| *k).min();
            prop_assert_eq!(heap.min().ok().map(|e| *e.key()), model_min);
        }

        for (handle, key, value) in &live {
            let entry = heap.get(*handle).unwrap();
            prop_assert_eq!((*entry.key(), *entry.value()), (*key, *value));
        }

        let mut drained = Vec::new();
        while let Ok(entry) = heap.remove_min() {
            drained.push(entry.into_key());
        }
        let mut expected: Vec<u16> = live.iter().map(|(_, k, _)| *k).collect();
        expected.sort_unstable();
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn prop_tree_is_always_complete(ops in tree_ops()) {
        let mut tree: CompleteTree<u32> = CompleteTree::new();
        // elements in breadth-first order
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                TreeOp::Add(e) => {
                    let loc = tree.add_last(e);
                    prop_assert_eq!(tree.last(), Some(loc));
                    model.push(e);
                }
                TreeOp::RemoveLast => {
                    match model.pop() {
                        Some(e) => prop_assert_eq!(tree.remove_last(), Ok(e)),
                        None => prop_assert_eq!(tree.remove_last(), Err(HeapError::EmptyStructure)),
                    }
                }
            }

            tree.assert_complete();
            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(tree.root().map(|r| *tree.element(r)), model.first().copied());
            prop_assert_eq!(tree.last().map(|l| *tree.element(l)), model.last().copied());
        }
    }
}
