#![cfg(test)]

use std::cell::Cell;

use super::*;
use crate::alloc::{default_allocator, TrackingAllocator};
use crate::collections::Vector;
use crate::util::hash::{IdentityHasherBuilder, ManualHash};
use crate::util::lifecycle::LiveCounter;
use crate::util::panic::assert_panics;

#[test]
fn test_set_and_get() {
    let mut map = HashMap::new();
    map.set("a", 1);
    map.set("b", 2);
    map.set("a", 3);

    assert_eq!(map.count(), 2, "Overwriting a key shouldn't change the count.");
    assert_eq!(map.get("a"), Some(&3));
    assert_eq!(map.get("b"), Some(&2));
    assert_eq!(map.get("c"), None);
}

#[test]
fn test_empty_map_misses() {
    let mut map = HashMap::<u32, u32>::new();

    assert_eq!(map.cap(), 0, "Nothing should be allocated up front.");
    assert_eq!(map.get(&1), None);
    assert!(!map.contains(&1));
    assert_eq!(map.remove(&1), None);
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn test_overwrite_drops_old_value() {
    let live = LiveCounter::tracker();
    let mut map = HashMap::new();

    assert!(map.set(1, LiveCounter::new(&live, 0)).is_none());
    let old = map.set(1, LiveCounter::new(&live, 1));
    assert_eq!(old.map(|c| c.id), Some(0), "The previous value should be handed back.");

    assert_eq!(live.get(), 1, "The previous value should have been dropped.");
    assert_eq!(map.count(), 1);
    assert_eq!(map.get(&1).map(|c| c.id), Some(1));
}

#[test]
fn test_growth() {
    let mut map = HashMap::new();

    map.set(0, ());
    assert_eq!(map.cap(), 8, "The first insertion should allocate the minimum capacity.");

    for i in 1..6 {
        map.set(i, ());
    }
    assert_eq!(map.cap(), 8, "Six entries should fit in eight slots.");

    map.set(6, ());
    assert_eq!(map.cap(), 16, "The seventh entry should exceed the load factor.");
}

#[test]
fn test_rehash_round_trip() {
    let mut map = HashMap::new();

    for i in 0..1000_u64 {
        map.set(i, i * i);
        assert!(
            map.count() * 4 <= map.cap() * 3,
            "The load factor should never exceed 3/4."
        );
    }

    assert_eq!(map.count(), 1000);
    assert!(
        (0..1000_u64).all(|i| map.get(&i) == Some(&(i * i))),
        "Every entry should survive rehashing."
    );
    assert_eq!(map.get(&1000), None);
}

#[test]
fn test_reserve() {
    let mut map = HashMap::new();
    map.reserve(12);
    assert_eq!(map.cap(), 16);

    for i in 0..12 {
        map.set(i, i);
    }
    assert_eq!(map.cap(), 16, "Reserved entries shouldn't trigger growth.");

    map.reserve(4);
    assert_eq!(map.cap(), 16, "Reserving less than the capacity should do nothing.");
}

#[test]
fn test_get_or_construct() {
    let constructed = Cell::new(0);
    let mut map = HashMap::new();

    let construct = || {
        constructed.set(constructed.get() + 1);
        Vector::new()
    };

    map.get_or_construct("evens", construct).push(0);
    map.get_or_construct("evens", construct).push(2);
    map.get_or_construct("odds", construct).push(1);

    assert_eq!(constructed.get(), 2, "Values should only be constructed on a miss.");
    assert_eq!(map.get("evens").map(|v| &**v), Some(&[0, 2][..]));
    assert_eq!(map.get("odds").map(|v| &**v), Some(&[1][..]));
    assert_eq!(map.count(), 2);
}

#[test]
fn test_get_or_default() {
    let mut counts = HashMap::new();
    for word in "the cat and the hat and the bat".split(' ') {
        *counts.get_or_default(word) += 1;
    }

    assert_eq!(counts.get("the"), Some(&3));
    assert_eq!(counts.get("and"), Some(&2));
    assert_eq!(counts.get("cat"), Some(&1));
    assert_eq!(counts.count(), 5);
}

#[test]
fn test_borrowed_lookup() {
    let mut map = HashMap::new();
    map.set("key".to_string(), 1);

    assert_eq!(map.get("key"), Some(&1), "String keys should be found by &str.");
    assert!(map.contains("key"));
    assert_eq!(map.get_entry("key"), Some((&"key".to_string(), &1)));

    *map.get_mut("key").unwrap() += 1;
    assert_eq!(map.remove("key"), Some(2));
    assert!(map.is_empty());
}

#[test]
fn test_hash_collisions() {
    let mut map = HashMap::with_hasher_in(IdentityHasherBuilder, default_allocator());
    map.set(ManualHash::new(0, "zero"), 0);
    map.set(ManualHash::new(0, "one"), 1);
    map.set(ManualHash::new(2, "two"), 2);
    map.set(ManualHash::new(0, "three"), 3);
    map.set(ManualHash::new(2, "four"), 4);
    map.set(ManualHash::new(1, "five"), 5);
    assert_eq!(map.cap(), 8);

    assert_eq!(map.remove(&ManualHash::new(0, "zero")), Some(0));
    assert_eq!(map.remove(&ManualHash::new(2, "two")), Some(2));

    assert_eq!(
        *map.keys().map(|k| *k.value()).collect::<Vector<_>>(),
        ["one", "three", "four", "five"],
        "HashMap should handle hash collisions so that no entries are lost during removal."
    );
    assert!(
        [(0, "one", 1), (0, "three", 3), (2, "four", 4), (1, "five", 5)]
            .iter()
            .all(|(h, k, v)| map.get(&ManualHash::new(*h, *k)) == Some(v)),
        "Shifted entries should still be reachable from their ideal slot."
    );
}

#[test]
fn test_removal_wraps() {
    let mut map = HashMap::with_hasher_in(IdentityHasherBuilder, default_allocator());
    map.reserve(4);
    assert_eq!(map.cap(), 6);

    map.set(ManualHash::new(5, "zero"), ());
    map.set(ManualHash::new(5, "one"), ());
    map.set(ManualHash::new(1, "two"), ());
    map.set(ManualHash::new(5, "three"), ());

    map.remove(&ManualHash::new(5, "zero"));

    assert_eq!(
        *map.into_keys().map(|k| *k.value()).collect::<Vector<_>>(),
        ["three", "two", "one"],
        "Hash collisions should be handled in a wrapping manner."
    );
}

#[test]
fn test_removal_keeps_entries_in_place() {
    let mut map = HashMap::with_hasher_in(IdentityHasherBuilder, default_allocator());
    map.set(ManualHash::new(1, "a"), ());
    map.set(ManualHash::new(1, "b"), ());
    map.set(ManualHash::new(2, "c"), ());
    map.set(ManualHash::new(3, "d"), ());

    // b, c and d each sit one slot past their ideal slot, so all three shift back.
    map.remove(&ManualHash::new(1, "a"));

    assert_eq!(
        *map.keys().map(|k| *k.value()).collect::<Vector<_>>(),
        ["b", "c", "d"]
    );
    assert!(map.contains(&ManualHash::new(2, "c")));
    assert!(map.contains(&ManualHash::new(3, "d")));
}

#[test]
fn test_remove_everything() {
    let mut map: HashMap<_, _> = (0..100).map(|i| (i, i.to_string())).collect();

    for i in (0..100).step_by(2) {
        assert_eq!(map.remove(&i), Some(i.to_string()));
    }
    assert_eq!(map.count(), 50);
    assert!((1..100).step_by(2).all(|i| map.contains(&i)));
    assert!((0..100).step_by(2).all(|i| !map.contains(&i)));

    for i in (1..100).step_by(2) {
        assert_eq!(map.remove(&i), Some(i.to_string()));
    }
    assert!(map.is_empty());
    assert!(map.status.iter().all(|s| s.is_free()), "Removal shouldn't leave anything behind.");
}

#[test]
fn test_drop() {
    let live = LiveCounter::tracker();
    let tracker = TrackingAllocator::new(default_allocator());

    {
        let mut map = HashMap::new_in(&tracker);
        for i in 0..20 {
            map.set(i, LiveCounter::new(&live, i));
        }
        map.remove(&3);
        assert_eq!(live.get(), 19);
    }

    assert_eq!(live.get(), 0, "Every value should have been dropped exactly once.");
    assert_eq!(tracker.live_bytes(), 0, "Every slot array should have been freed.");
}

#[test]
fn test_into_iter() {
    let live = LiveCounter::tracker();
    let tracker = TrackingAllocator::new(default_allocator());
    let mut map = HashMap::new_in(&tracker);
    for i in 0..10 {
        map.set(i, LiveCounter::new(&live, i));
    }

    let mut iter = map.into_iter();
    assert_eq!(iter.len(), 10);
    let (key, value) = iter.next().unwrap();
    assert_eq!(key, value.id);
    drop(value);
    assert_eq!(iter.len(), 9);

    drop(iter);
    assert_eq!(live.get(), 0, "Dropping an owned iterator should drop all remaining entries.");
    assert_eq!(tracker.live_bytes(), 0);
}

#[test]
fn test_iterators() {
    let mut map: HashMap<_, _> = (1..=4).map(|i| (i, i * 10)).collect();

    assert_eq!(map.keys().sum::<i32>(), 10);
    assert_eq!(map.values().sum::<i32>(), 100);
    assert_eq!(map.iter().len(), 4);

    for value in map.values_mut() {
        *value += 1;
    }
    assert!(map.iter().all(|(k, v)| *v == k * 10 + 1));

    let mut values = map.into_values().collect::<Vector<_>>();
    values.sort();
    assert_eq!(*values, [11, 21, 31, 41]);
}

#[test]
fn test_clear() {
    let mut map: HashMap<_, _> = (0..10).map(|i| (i, i)).collect();
    let cap = map.cap();

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.cap(), cap, "Clearing should keep the capacity.");
    assert_eq!(map.get(&0), None);

    map.set(0, 1);
    assert_eq!(map.get(&0), Some(&1));
}

#[test]
fn test_clone() {
    let tracker = TrackingAllocator::new(default_allocator());
    let mut map = HashMap::new_in(&tracker);
    map.set("a".to_string(), Vector::from_iter([1, 2]));
    map.set("b".to_string(), Vector::from_iter([3]));

    let mut copy = map.clone();
    assert_eq!(copy, map);
    assert_eq!(copy.cap(), map.cap());

    copy.get_mut("a").unwrap().push(4);
    copy.remove("b");
    assert_eq!(map.get("a").map(|v| v.len()), Some(2), "A clone should be independent.");
    assert!(map.contains("b"));
    assert_ne!(copy, map);

    copy.clone_from(&map);
    assert_eq!(copy, map);

    let other = TrackingAllocator::new(default_allocator());
    let mut foreign = HashMap::new_in(&other);
    assert_panics!(
        { foreign.clone_from(&map); },
        "Copy-assigning across allocators should be fatal."
    );
}

#[test]
fn test_swap_with() {
    // Declared first so that it outlives the maps swapped with it.
    let other = TrackingAllocator::new(default_allocator());
    let tracker = TrackingAllocator::new(default_allocator());
    let mut a = HashMap::new_in(&tracker);
    let mut b = HashMap::new_in(&tracker);
    a.set(1, 1);
    b.set(2, 2);

    a.swap_with(&mut b);
    assert_eq!(a.get(&2), Some(&2));
    assert_eq!(b.get(&1), Some(&1));

    let mut c = HashMap::new_in(&other);
    assert_panics!({ a.swap_with(&mut c); }, "Swapping across allocators should be fatal.");
}

#[test]
fn test_display() {
    let mut map = HashMap::new();
    map.set(1, 2);
    assert_eq!(format!("{map}"), "#{1: 2}");
    assert_eq!(format!("{}", HashMap::<u8, u8>::new()), "#{}");
}
