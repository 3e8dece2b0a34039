#![cfg(test)]

// Property tests for PrimitiveKeyedMap and EntryCursor kept inside the crate
// so they can check table internals (`sizing`) alongside the public surface.

use crate::error::IterError;
use crate::primitive_map::{ByteMap, CharMap};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

const DEFAULT: i32 = -1;

#[derive(Clone, Debug)]
enum Op {
    Put(u8, i32),
    Get(u8),
    Remove(u8),
    Keys,
    Iterate,
}

fn arb_op() -> impl Strategy<Value = Op> {
    // Values include DEFAULT so a null key reset to the default is covered.
    let value = prop_oneof![Just(DEFAULT), -3i32..100];
    prop_oneof![
        4 => (any::<u8>(), value).prop_map(|(k, v)| Op::Put(k, v)),
        2 => any::<u8>().prop_map(Op::Get),
        2 => any::<u8>().prop_map(Op::Remove),
        1 => Just(Op::Keys),
        1 => Just(Op::Iterate),
    ]
}

/// Model: non-null keys in a HashMap, the null key beside it.
#[derive(Default)]
struct Model {
    table: HashMap<u8, i32>,
    null: Option<i32>,
}

impl Model {
    fn put(&mut self, k: u8, v: i32) {
        if k == 0 {
            self.null = Some(v);
        } else {
            self.table.insert(k, v);
        }
    }

    fn get(&self, k: u8) -> i32 {
        let v = if k == 0 { self.null } else { self.table.get(&k).copied() };
        v.unwrap_or(DEFAULT)
    }

    fn null_present(&self) -> bool {
        self.null.is_some_and(|v| v != DEFAULT)
    }

    fn keys(&self) -> Vec<u8> {
        let mut keys: Vec<u8> = self.table.keys().copied().collect();
        keys.sort_unstable();
        if self.null_present() {
            keys.push(0);
        }
        keys
    }
}

// Property: state-machine equivalence against a HashMap model.
// Invariants exercised across random operation sequences:
// - `get` returns the latest put value, or the default when absent.
// - `len` counts non-null keys only; `keys()` is strictly ascending with the
//   null key appended iff it holds a non-default value.
// - Removal through a cursor keeps every other key reachable (backward
//   shift), for both loose and densely packed tables.
// - `len <= expand_at` between operations.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(
        dense in any::<bool>(),
        ops in proptest::collection::vec(arb_op(), 1..200),
    ) {
        let mut sut: ByteMap<i32> = if dense {
            ByteMap::with_capacity(1, 0.95, DEFAULT).unwrap()
        } else {
            ByteMap::new(DEFAULT)
        };
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let prev = sut.put(k, v);
                    let expected_prev = if k == 0 { model.null } else { model.table.get(&k).copied() };
                    prop_assert_eq!(prev, expected_prev);
                    model.put(k, v);
                }
                Op::Get(k) => {
                    prop_assert_eq!(*sut.get(k), model.get(k));
                    prop_assert_eq!(sut.contains_key(k), if k == 0 { model.null_present() } else { model.table.contains_key(&k) });
                }
                Op::Remove(k) => {
                    let mut cursor = sut.entries();
                    let mut removed = None;
                    while let Ok((key, _)) = cursor.next(&sut) {
                        if key == k {
                            removed = Some(cursor.remove(&mut sut).unwrap());
                            break;
                        }
                    }
                    let expected = if k == 0 {
                        if model.null_present() { model.null.take() } else { None }
                    } else {
                        model.table.remove(&k)
                    };
                    prop_assert_eq!(removed, expected);
                }
                Op::Keys => {
                    let keys = sut.keys();
                    prop_assert!(keys.iter().filter(|&&k| k != 0).collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1]));
                    prop_assert_eq!(keys, model.keys());
                }
                Op::Iterate => {
                    let seen: Vec<(u8, i32)> = sut.iter().map(|(k, v)| (k, *v)).collect();
                    let set: BTreeSet<u8> = seen.iter().map(|&(k, _)| k).collect();
                    prop_assert_eq!(set.len(), seen.len(), "iteration produced a key twice");
                    prop_assert_eq!(set.len(), model.keys().len());
                    if model.null_present() {
                        prop_assert_eq!(seen.last().map(|&(k, _)| k), Some(0));
                    }
                    for (k, v) in seen {
                        prop_assert_eq!(v, model.get(k));
                    }
                }
            }

            prop_assert_eq!(sut.len(), model.table.len());
            prop_assert_eq!(sut.is_empty(), model.table.is_empty());
            prop_assert!(sut.len() <= sut.expand_threshold());
        }

        for k in 0..=u8::MAX {
            prop_assert_eq!(*sut.get(k), model.get(k));
        }
    }
}

// Property: every pair put before the table grows is unchanged after it,
// for code-unit keys spread over the whole 16-bit range.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_expansion_preserves_pairs(
        keys in proptest::collection::btree_set(1u16..=u16::MAX, 1..400),
        lf in prop_oneof![Just(0.25f32), Just(0.5), Just(0.75), Just(0.95)],
    ) {
        let mut sut: CharMap<u32> = CharMap::with_capacity(1, lf, 0).unwrap();
        let mut grown = 0;
        for (i, &k) in keys.iter().enumerate() {
            let before = sut.capacity();
            sut.put(k, i as u32 + 1);
            if sut.capacity() != before {
                grown += 1;
                for (j, &earlier) in keys.iter().take(i + 1).enumerate() {
                    prop_assert_eq!(*sut.get(earlier), j as u32 + 1);
                }
            }
        }
        prop_assert!(keys.len() < 2 || grown > 0);
        prop_assert_eq!(sut.len(), keys.len());
    }
}

// Property: a cursor that outlives a put of a fresh key refuses to continue.
proptest! {
    #[test]
    fn prop_put_during_iteration_fails_fast(
        keys in proptest::collection::btree_set(1u8..=u8::MAX, 1..100),
        fresh in 1u8..=u8::MAX,
    ) {
        prop_assume!(!keys.contains(&fresh));
        let mut sut: ByteMap<u8> = ByteMap::new(0);
        for &k in &keys {
            sut.put(k, k);
        }
        let mut cursor = sut.entries();
        prop_assert!(cursor.next(&sut).is_ok());
        sut.put(fresh, fresh);
        prop_assert_eq!(
            cursor.next(&sut),
            Err(IterError::ConcurrentModification { expected: keys.len(), found: keys.len() + 1 })
        );
    }
}
