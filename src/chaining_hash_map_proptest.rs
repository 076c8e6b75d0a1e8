#![cfg(test)]

// Property tests for ChainingHashMap kept inside the crate so they can see
// bucket layout and capacity without widening the public API.

use crate::chaining_hash_map::ChainingHashMap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    Remove(u16),
    Get(u16),
    Keys,
}

fn arb_ops() -> impl Strategy<Value = (usize, Vec<Op>)> {
    // A small key space forces updates and removals of live keys.
    let key = 0u16..48;
    let op = prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Get),
        1 => Just(Op::Keys),
    ];
    (0usize..40, proptest::collection::vec(op, 1..200))
}

fn check_structure<S>(sut: &ChainingHashMap<u16, i32, S>, model: &HashMap<u16, i32>) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    prop_assert!(sut.capacity() >= 1);
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.bucket_lens().iter().sum::<usize>(), sut.len());
    prop_assert!(sut.entries_are_placed(), "entry outside its hashed bucket");
    // Every resize leaves the table strictly below the growth threshold.
    prop_assert!(sut.len() * 4 < sut.capacity() * 3);
    Ok(())
}

fn run_ops<S>(mut sut: ChainingHashMap<u16, i32, S>, ops: Vec<Op>) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<u16, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let cap_before = sut.capacity();
                let prev = sut.insert(k, v);
                let model_prev = model.insert(k, v);
                prop_assert_eq!(prev, model_prev);
                if prev.is_some() {
                    prop_assert_eq!(sut.capacity(), cap_before, "updates never resize");
                }
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert_eq!(sut.get(&k), None);
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::Keys => {
                let s_keys: BTreeSet<u16> = sut.keys().copied().collect();
                let m_keys: BTreeSet<u16> = model.keys().copied().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.keys().len(), model.len());
            }
        }
        check_structure(&sut, &model)?;
    }
    // Values survive however many resizes happened along the way.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove return the same previous values as the model.
// - `len` equals the sum of bucket lengths and the model's length.
// - every entry sits in bucket `hash % capacity` after any resize.
// - the load factor stays below 0.75 after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, ops) in arb_ops()) {
        run_ops(ChainingHashMap::with_capacity(cap), ops)?;
    }
}

// Collision variant: a hasher with only four distinct outputs, two of which
// have the sign bit set, stresses chaining and the index mapping.
#[derive(Clone, Default)]
struct CoarseBuildHasher;
#[derive(Default)]
struct CoarseHasher(u64);
impl BuildHasher for CoarseBuildHasher {
    type Hasher = CoarseHasher;
    fn build_hasher(&self) -> Self::Hasher {
        CoarseHasher::default()
    }
}
impl Hasher for CoarseHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_add(u64::from(b));
        }
    }
    fn finish(&self) -> u64 {
        match self.0 % 4 {
            0 => 0,
            1 => i64::MIN as u64,
            2 => u64::MAX,
            _ => 7,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((cap, ops) in arb_ops()) {
        run_ops(ChainingHashMap::with_capacity_and_hasher(cap, CoarseBuildHasher), ops)?;
    }
}
