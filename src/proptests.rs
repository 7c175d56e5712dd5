use std::collections::BTreeMap;
use std::hash::BuildHasher;

use proptest::prelude::*;

use crate::alloc::{default_allocator, TrackingAllocator};
use crate::collections::{HashMap, Vector};
use crate::util::hash::IdentityHasherBuilder;
use crate::variant::{make_optional, Optional};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug)]
enum VectorOp {
    Push(u32),
    Pop,
    Insert(usize, u32),
    Remove(usize),
    Truncate(usize),
    Clear,
}

fn vector_ops_strategy() -> impl Strategy<Value = Vec<VectorOp>> {
    let op = prop_oneof![
        50 => any::<u32>().prop_map(VectorOp::Push),
        20 => Just(VectorOp::Pop),
        10 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| VectorOp::Insert(i, v)),
        10 => any::<usize>().prop_map(VectorOp::Remove),
        5 => (0_usize..64).prop_map(VectorOp::Truncate),
        1 => Just(VectorOp::Clear),
    ];
    prop::collection::vec(op, 0..=500)
}

#[derive(Clone, Debug)]
enum MapOp {
    Set(u64, u64),
    Remove(u64),
    Get(u64),
    Reserve(usize),
}

fn map_ops_strategy() -> impl Strategy<Value = Vec<MapOp>> {
    // A narrow key range makes overwrites, removals of present keys and long probe chains common.
    let key = 0_u64..256;
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| MapOp::Set(k, v)),
        25 => key.clone().prop_map(MapOp::Remove),
        24 => key.clone().prop_map(MapOp::Get),
        1 => (0_usize..128).prop_map(MapOp::Reserve),
    ];
    prop::collection::vec(op, 0..=1000)
}

fn run_map_ops<B: BuildHasher>(
    map: &mut HashMap<'_, u64, u64, B>,
    ops: Vec<MapOp>,
) -> Result<(), TestCaseError> {
    let mut model = BTreeMap::new();

    for op in ops {
        match op {
            MapOp::Set(key, value) => {
                prop_assert_eq!(map.set(key, value), model.insert(key, value));
            },
            MapOp::Remove(key) => {
                prop_assert_eq!(map.remove(&key), model.remove(&key));
            },
            MapOp::Get(key) => {
                prop_assert_eq!(map.get(&key), model.get(&key));
            },
            MapOp::Reserve(count) => {
                map.reserve(count);
                prop_assert!(map.cap() * 3 >= count * 4);
            },
        }

        prop_assert_eq!(map.count(), model.len());
        prop_assert!(map.count() * 4 <= map.cap() * 3, "load factor exceeded");
    }

    for (key, value) in model.iter() {
        prop_assert_eq!(map.get(key), Some(value), "key {} unreachable", key);
    }
    let mut entries: Vec<(u64, u64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    let expected: Vec<(u64, u64)> = model.into_iter().collect();
    prop_assert_eq!(entries, expected);

    Ok(())
}

proptest! {
    #[test]
    fn prop_vector_matches_model(ops in vector_ops_strategy()) {
        init_logger();
        let tracker = TrackingAllocator::new(default_allocator());

        {
            let mut vec = Vector::new_in(&tracker);
            let mut model = Vec::new();

            for op in ops {
                match op {
                    VectorOp::Push(value) => {
                        vec.push(value);
                        model.push(value);
                    },
                    VectorOp::Pop => {
                        prop_assert_eq!(vec.try_pop(), model.pop());
                    },
                    VectorOp::Insert(index, value) => {
                        let index = index % (model.len() + 1);
                        vec.insert(index, value);
                        model.insert(index, value);
                    },
                    VectorOp::Remove(index) if !model.is_empty() => {
                        let index = index % model.len();
                        prop_assert_eq!(vec.remove(index), model.remove(index));
                    },
                    VectorOp::Remove(_) => {},
                    VectorOp::Truncate(len) => {
                        vec.truncate(len);
                        model.truncate(len);
                    },
                    VectorOp::Clear => {
                        vec.clear();
                        model.clear();
                    },
                }

                prop_assert_eq!(vec.as_slice(), model.as_slice());
                prop_assert!(vec.len() <= vec.cap());
            }
        }

        prop_assert_eq!(tracker.live_allocations(), 0, "the buffer should be freed on drop");
    }

    #[test]
    fn prop_vector_count_is_pushes_minus_pops(ops in prop::collection::vec(any::<Option<u8>>(), 0..500)) {
        let mut vec = Vector::new();
        let mut pushes = 0_usize;
        let mut pops = 0_usize;

        for op in ops {
            match op {
                Some(value) => {
                    vec.push(value);
                    pushes += 1;
                },
                None => {
                    if vec.try_pop().is_some() {
                        pops += 1;
                    }
                },
            }
        }

        prop_assert_eq!(vec.count(), pushes - pops);
    }

    #[test]
    fn prop_vector_push_pop_restores(
        initial in prop::collection::vec(any::<u16>(), 0..100),
        value in any::<u16>(),
    ) {
        let mut vec: Vector<u16> = initial.iter().copied().collect();
        let count = vec.count();

        vec.push(value);
        prop_assert_eq!(vec.pop(), value);
        prop_assert_eq!(vec.count(), count);
        prop_assert_eq!(vec.as_slice(), initial.as_slice());
    }

    #[test]
    fn prop_map_matches_model(ops in map_ops_strategy()) {
        init_logger();
        let mut map = HashMap::new();
        run_map_ops(&mut map, ops)?;
    }

    #[test]
    fn prop_map_matches_model_with_collisions(ops in map_ops_strategy()) {
        init_logger();
        // Hashing keys to themselves packs runs of neighbouring keys into neighbouring slots.
        let mut map = HashMap::with_hasher_in(IdentityHasherBuilder, default_allocator());
        run_map_ops(&mut map, ops)?;
    }

    #[test]
    fn prop_map_round_trip(entries in prop::collection::btree_map(any::<u64>(), any::<u32>(), 0..500)) {
        let map: HashMap<u64, u32> = entries.iter().map(|(k, v)| (*k, *v)).collect();

        prop_assert_eq!(map.count(), entries.len());
        for (key, value) in entries.iter() {
            prop_assert_eq!(map.get(key), Some(value));
        }

        let mut keys: Vec<u64> = map.into_keys().collect();
        keys.sort_unstable();
        let expected: Vec<u64> = entries.into_keys().collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_optional_matches_option(initial in any::<Option<u32>>(), replacement in any::<u32>()) {
        let mut optional: Optional<u32> = initial.into();
        let mut model = initial;

        prop_assert_eq!(optional.has_value(), model.is_some());
        prop_assert_eq!(optional.as_ref(), model.as_ref());

        let taken = optional.take();
        prop_assert_eq!(taken.into_option(), model.take());
        prop_assert!(!optional.has_value());

        prop_assert_eq!(optional.replace(replacement), Optional::none());
        prop_assert_eq!(optional, make_optional(replacement));
    }
}
