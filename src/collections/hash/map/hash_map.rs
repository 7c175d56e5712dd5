use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash};
use std::mem;
use std::ptr;

use derive_more::IsVariant;

use super::{IntoKeys, IntoValues, Iter, Keys, Values, ValuesMut};
use crate::alloc::{default_allocator, Allocator};
use crate::collections::contiguous::{check_same_allocator, RawArray, Vector};
use crate::error::CapacityOverflow;
use crate::hashing::WyHashBuilder;
use crate::util::option::OptionExtension;
use crate::util::result::ResultExtension;

const MIN_ALLOCATED_CAP: usize = 8;

const GROWTH_FACTOR: usize = 2;

const LOAD_FACTOR_NUMERATOR: usize = 3;
const LOAD_FACTOR_DENOMINATOR: usize = 4;

/// Whether a slot of a [`HashMap`] holds an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub(crate) enum SlotStatus {
    Free,
    Used,
}

/// A map of keys to values which relies on the keys implementing [`Hash`], allocated from a
/// borrowed [`Allocator`].
///
/// Entries are stored with open addressing: a status array and two parallel arrays of keys and
/// values, all indexed by slot. Collisions are resolved by linear probing, so the slot of a key
/// is always reachable from its ideal slot, `hash(key) % cap`, without crossing a free slot. The
/// map grows (doubling, with a minimum of 8 slots) before an insertion that would take it past
/// a load factor of 3/4, which keeps at least one slot free and every probe finite.
///
/// Removal uses backward-shift deletion rather than tombstones: the entries following the
/// removed one are shifted back into the hole until the probe chain is whole again.
///
/// The default hasher is [`WyHashBuilder`]. It is a logic error for keys in a HashMap to be
/// manipulated in a way that changes their hash. Because of this, HashMap's API prevents mutable
/// access to its keys.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the HashMap.
///
/// | Method | Complexity |
/// |-|-|
/// | `count` | `O(1)` |
/// | `set` | `O(1)`**, `O(n)` |
/// | `get` | `O(1)`* |
/// | `get_or_construct` | `O(1)`**, `O(n)` |
/// | `remove` | `O(1)`* |
/// | `contains` | `O(1)`* |
/// | `reserve` | `O(n)`***, `O(1)` |
///
/// \* In the event of a hash collision, these functions will take additional time, while the
/// probe walks to the correct slot. Keeping the load factor under 3/4 keeps these walks short.
///
/// \** If the HashMap has to grow for the new entry, it rehashes every entry in `O(n)`. \*
/// applies as well.
///
/// \*** If the HashMap has enough capacity for the additional items already, `reserve` is `O(1)`.
pub struct HashMap<'a, K: Hash + Eq, V, B: BuildHasher = WyHashBuilder> {
    pub(crate) status: Vector<'a, SlotStatus>,
    pub(crate) keys: RawArray<'a, K>,
    pub(crate) values: RawArray<'a, V>,
    pub(crate) count: usize,
    pub(crate) hasher: B,
}

impl<K: Hash + Eq, V> HashMap<'static, K, V> {
    /// Creates a new HashMap with capacity 0, using the [`default_allocator`] and the default
    /// [`WyHashBuilder`]. Memory will be allocated on the first insertion.
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::HashMap;
    /// let mut map = HashMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// map.set("a", 3);
    /// assert_eq!(map.count(), 2);
    /// assert_eq!(map.get("a"), Some(&3));
    /// assert_eq!(map.get("c"), None);
    /// ```
    pub fn new() -> HashMap<'static, K, V> {
        HashMap::new_in(default_allocator())
    }
}

impl<'a, K: Hash + Eq, V> HashMap<'a, K, V> {
    /// Creates a new HashMap with capacity 0 that will allocate from `alloc`.
    pub fn new_in(alloc: &'a dyn Allocator) -> HashMap<'a, K, V> {
        HashMap::with_hasher_in(WyHashBuilder::default(), alloc)
    }

    /// Creates a new HashMap with exactly `cap` slots, allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if the memory layout of any of the slot arrays would exceed [`isize::MAX`].
    pub fn with_cap_in(cap: usize, alloc: &'a dyn Allocator) -> HashMap<'a, K, V> {
        let mut map = HashMap::new_in(alloc);
        map.rehash(cap);
        map
    }
}

impl<'a, K: Hash + Eq, V, B: BuildHasher> HashMap<'a, K, V, B> {
    /// Creates a new HashMap with capacity 0 that will hash keys with `hasher` and allocate from
    /// `alloc`.
    pub fn with_hasher_in(hasher: B, alloc: &'a dyn Allocator) -> HashMap<'a, K, V, B> {
        HashMap {
            status: Vector::new_in(alloc),
            keys: RawArray::new_in(alloc),
            values: RawArray::new_in(alloc),
            count: 0,
            hasher,
        }
    }

    /// Returns the number of entries in the HashMap.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of entries in the HashMap. This is the same as
    /// [`count`](HashMap::count).
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the HashMap contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots in the HashMap.
    pub const fn capacity(&self) -> usize {
        self.status.len()
    }

    /// Returns the number of slots in the HashMap. This is the same as
    /// [`capacity`](HashMap::capacity).
    pub const fn cap(&self) -> usize {
        self.status.len()
    }

    /// Returns the allocator backing this HashMap.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.keys.allocator()
    }

    pub const fn hasher(&self) -> &B {
        &self.hasher
    }

    /// Associates `value` with `key`, growing first if the new entry would exceed the load
    /// factor. If the key was already present, its value is replaced and the previous value is
    /// returned (and dropped, if unused), leaving the count unchanged.
    ///
    /// As with the standard library, the key isn't changed if it already exists.
    ///
    /// # Panics
    /// Panics if growing would need a capacity whose memory layout exceeds [`isize::MAX`].
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.find_slot(&key)
            && self.status[index].is_used()
        {
            // SAFETY: The slot is used, so its value is initialized.
            return Some(mem::replace(unsafe { self.values.get_mut(index) }, value));
        }

        self.insert_new(key, value);
        None
    }

    /// Returns a reference to the value associated with the provided `key` or None if the map
    /// contains no values for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_used_slot(key)?;
        // SAFETY: The slot is used, so its value is initialized.
        Some(unsafe { self.values.get(index) })
    }

    /// Returns a mutable reference to the value associated with the provided `key` or None if the
    /// map contains no values for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_used_slot(key)?;
        // SAFETY: The slot is used, so its value is initialized.
        Some(unsafe { self.values.get_mut(index) })
    }

    /// Returns the stored key and its value for the provided `key`, or None if there is no entry.
    pub fn get_entry<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_used_slot(key)?;
        // SAFETY: The slot is used, so both its key and value are initialized.
        Some(unsafe { (self.keys.get(index), self.values.get(index)) })
    }

    /// Returns a mutable reference to the value for `key`, first inserting the value returned by
    /// `construct` if the key isn't present. `construct` is only invoked on a miss.
    ///
    /// # Panics
    /// Panics if growing would need a capacity whose memory layout exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::HashMap;
    /// let mut map = HashMap::new();
    /// *map.get_or_construct("hits", || 0) += 1;
    /// *map.get_or_construct("hits", || unreachable!()) += 1;
    /// assert_eq!(map.get("hits"), Some(&2));
    /// ```
    pub fn get_or_construct<F: FnOnce() -> V>(&mut self, key: K, construct: F) -> &mut V {
        let index = match self.find_slot(&key) {
            Some(index) if self.status[index].is_used() => index,
            _ => self.insert_new(key, construct()),
        };

        // SAFETY: The slot is used, either found or just written.
        unsafe { self.values.get_mut(index) }
    }

    /// Returns a mutable reference to the value for `key`, first inserting [`V::default`] if the
    /// key isn't present.
    ///
    /// [`V::default`]: Default::default
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_construct(key, V::default)
    }

    /// Returns true if there is a value associated with the provided `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_used_slot(key).is_some()
    }

    /// Removes the entry associated with `key`, returning it if it exists.
    ///
    /// The following entries of the probe chain are shifted back into the emptied slot where
    /// that keeps them reachable, so no tombstones are left behind.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut hole = self.find_used_slot(key)?;

        // SAFETY: The slot is used, so both arrays are initialized there. It is marked free
        // immediately after being read.
        let removed = unsafe { (self.keys.read(hole), self.values.read(hole)) };
        self.status[hole] = SlotStatus::Free;
        self.count -= 1;

        let cap = self.cap();
        let mut next = (hole + 1) % cap;

        // The chain ends at the first free slot. An entry may fill the hole unless its ideal
        // slot lies cyclically in (hole, next], in which case moving it would put it before its
        // ideal slot.
        while self.status[next].is_used() {
            // SAFETY: The slot is used and the capacity is not 0.
            let ideal = unsafe { self.ideal_slot(self.keys.get(next)).unreachable() };

            if !cyclic_range_contains(hole, next, ideal) {
                // SAFETY: next is used and hole is free. The entry is moved bitwise and next is
                // marked free straight after.
                unsafe {
                    ptr::copy_nonoverlapping(self.keys.slot(next), self.keys.slot(hole), 1);
                    ptr::copy_nonoverlapping(self.values.slot(next), self.values.slot(hole), 1);
                }
                self.status[hole] = SlotStatus::Used;
                self.status[next] = SlotStatus::Free;
                hole = next;
            }

            next = (next + 1) % cap;
        }

        Some(removed)
    }

    /// Removes the entry associated with `key`, returning the value if it exists.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Increases the capacity of the HashMap to ensure that `count` entries fit without
    /// exceeding the load factor. Unlike [`Vector::reserve`], this considers the number of
    /// entries rather than slots.
    ///
    /// # Panics
    /// Panics if the memory layout of the slot arrays would exceed [`isize::MAX`].
    pub fn reserve(&mut self, count: usize) {
        let new_cap = count.checked_mul(LOAD_FACTOR_DENOMINATOR)
            .map(|n| n.div_ceil(LOAD_FACTOR_NUMERATOR))
            .ok_or(CapacityOverflow)
            .throw();

        if new_cap > self.cap() {
            self.rehash(new_cap);
        }
    }

    /// Drops every entry, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        for index in 0..self.cap() {
            if self.status[index].is_used() {
                // Mark the slot free first, so that a panicking drop can't cause a double drop.
                self.status[index] = SlotStatus::Free;
                self.count -= 1;
                // SAFETY: The slot was used, so both arrays are initialized there.
                unsafe {
                    ptr::drop_in_place(self.keys.slot(index));
                    ptr::drop_in_place(self.values.slot(index));
                }
            }
        }
    }

    /// Swaps the contents of two HashMaps that share an allocator.
    ///
    /// # Panics
    /// Panics if the HashMaps use different allocators.
    #[track_caller]
    pub fn swap_with(&mut self, other: &mut HashMap<'a, K, V, B>) {
        check_same_allocator(self.allocator(), other.allocator());
        mem::swap(self, other);
    }

    /// Returns an iterator over all key-value pairs in the HashMap, as references.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }

    /// Returns an iterator over all keys in the HashMap, as references.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Returns an iterator over all values in the HashMap, as references.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Returns an iterator over all values in the HashMap, as mutable references.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self)
    }

    /// Consumes self and returns an iterator over all contained keys.
    pub fn into_keys(self) -> IntoKeys<'a, K, V> {
        IntoKeys(self.into_iter())
    }

    /// Consumes self and returns an iterator over all contained values.
    pub fn into_values(self) -> IntoValues<'a, K, V> {
        IntoValues(self.into_iter())
    }
}

impl<'a, K: Hash + Eq, V, B: BuildHasher> HashMap<'a, K, V, B> {
    /// Returns the entry in the slot at `index`, or None if it is free.
    pub(crate) fn slot(&self, index: usize) -> Option<(&K, &V)> {
        if self.status[index].is_used() {
            // SAFETY: The slot is used, so both arrays are initialized there.
            Some(unsafe { (self.keys.get(index), self.values.get(index)) })
        } else {
            None
        }
    }

    /// Determines whether inserting another entry would exceed the load factor.
    pub(crate) const fn should_grow(&self) -> bool {
        (self.count + 1) * LOAD_FACTOR_DENOMINATOR > self.cap() * LOAD_FACTOR_NUMERATOR
    }

    /// Grows the HashMap by the growth factor, or to the minimum capacity if nothing is
    /// allocated yet.
    ///
    /// # Panics
    /// Panics if the new capacity overflows.
    pub(crate) fn grow(&mut self) {
        let new_cap = match self.cap() {
            0 => MIN_ALLOCATED_CAP,
            cap => cap.checked_mul(GROWTH_FACTOR).ok_or(CapacityOverflow).throw(),
        };

        self.rehash(new_cap);
    }

    /// Replaces the slot arrays with free ones of `new_cap` slots, then moves every entry into
    /// the slot it probes to in the new arrays. `new_cap` must leave room for every entry.
    pub(crate) fn rehash(&mut self, new_cap: usize) {
        debug_assert!(self.count == 0 || new_cap > self.count);
        log::trace!(
            "HashMap rehashing {} entries from {} to {} slots",
            self.count,
            self.cap(),
            new_cap,
        );

        let alloc = self.allocator();
        let old_status = mem::replace(&mut self.status, free_slots(new_cap, alloc));
        let old_keys = mem::replace(&mut self.keys, RawArray::with_cap_in(new_cap, alloc));
        let old_values = mem::replace(&mut self.values, RawArray::with_cap_in(new_cap, alloc));

        for (old_index, status) in old_status.iter().enumerate() {
            if status.is_used() {
                // SAFETY: The old slot is used. The old arrays are only freed after this loop and
                // never drop their contents, so every entry is moved exactly once.
                let (key, value) = unsafe { (old_keys.read(old_index), old_values.read(old_index)) };
                let index = self.free_slot_for(&key);

                // SAFETY: index is a free slot in bounds of the new arrays.
                unsafe { self.write_slot(index, key, value); }
            }
        }
    }

    /// Inserts an entry for a key known to be absent, growing first if required, and returns its
    /// slot.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> usize {
        if self.should_grow() {
            self.grow();
        }

        let index = self.free_slot_for(&key);
        // SAFETY: index is a free slot in bounds.
        unsafe { self.write_slot(index, key, value); }
        self.count += 1;
        index
    }

    /// Writes an entry into a free slot and marks it used. The count isn't changed.
    ///
    /// # Safety
    /// `index` must be in bounds and the slot must be free.
    pub(crate) unsafe fn write_slot(&mut self, index: usize, key: K, value: V) {
        // SAFETY: The caller ensures that the slot is in bounds and free.
        unsafe {
            self.keys.write(index, key);
            self.values.write(index, value);
        }
        self.status[index] = SlotStatus::Used;
    }

    /// Calculates the ideal slot for the provided `hashable` (or None if the HashMap has 0
    /// capacity). This method doesn't consider hash collisions, see [`HashMap::find_slot`] for
    /// that functionality.
    pub(crate) fn ideal_slot<H: Hash + ?Sized>(&self, hashable: &H) -> Option<usize> {
        let key_hash = self.hasher.hash_one(hashable);
        key_hash.checked_rem(self.cap() as u64).map(|i| i as usize)
    }

    /// Finds the slot for the provided `key` (or None if the HashMap has 0 capacity). This is
    /// done by starting at the ideal slot and walking forward, wrapping at the capacity, until a
    /// slot is found that is free or holds an equal key. A free slot is where the key would be
    /// inserted.
    pub(crate) fn find_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut index = self.ideal_slot(key)?;

        // The load factor keeps a slot free, so this always terminates.
        // SAFETY: The status says used, so the key is initialized.
        while self.status[index].is_used() && unsafe { self.keys.get(index) }.borrow() != key {
            index = (index + 1) % self.cap();
        }

        Some(index)
    }

    /// As [`find_slot`](HashMap::find_slot), but only returns a hit.
    pub(crate) fn find_used_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_slot(key).filter(|index| self.status[*index].is_used())
    }

    /// Finds the first free slot on the probe chain of `key`, without comparing keys. The
    /// capacity must not be 0.
    pub(crate) fn free_slot_for(&self, key: &K) -> usize {
        // SAFETY: Callers have either just grown or are filling freshly allocated arrays with a
        // non-zero capacity.
        let mut index = unsafe { self.ideal_slot(key).unreachable() };

        while self.status[index].is_used() {
            index = (index + 1) % self.cap();
        }

        index
    }
}

/// Whether `index` lies in the cyclic range `(start, end]`.
const fn cyclic_range_contains(start: usize, end: usize, index: usize) -> bool {
    if start <= end {
        start < index && index <= end
    } else {
        start < index || index <= end
    }
}

/// Creates a status array of `cap` free slots.
fn free_slots(cap: usize, alloc: &dyn Allocator) -> Vector<'_, SlotStatus> {
    let mut status = Vector::with_cap_in(cap, alloc);
    status.extend((0..cap).map(|_| SlotStatus::Free));
    status
}

impl<K: Hash + Eq, V, B: BuildHasher> Drop for HashMap<'_, K, V, B> {
    fn drop(&mut self) {
        // Drop the entries, then let the arrays free their memory.
        self.clear();
    }
}

impl<'a, K: Hash + Eq + Clone, V: Clone, B: BuildHasher + Clone> Clone for HashMap<'a, K, V, B> {
    /// Copies every entry into the same slot of new arrays from the same allocator.
    fn clone(&self) -> Self {
        let alloc = self.allocator();
        let mut map = HashMap::with_hasher_in(self.hasher.clone(), alloc);
        map.status = free_slots(self.cap(), alloc);
        map.keys = RawArray::with_cap_in(self.cap(), alloc);
        map.values = RawArray::with_cap_in(self.cap(), alloc);

        for index in 0..self.cap() {
            if let Some((key, value)) = self.slot(index) {
                // SAFETY: The slot is free in the new map, which has the same capacity.
                unsafe { map.write_slot(index, key.clone(), value.clone()); }
                map.count += 1;
            }
        }

        map
    }

    /// # Panics
    /// Panics if `source` uses a different allocator.
    fn clone_from(&mut self, source: &Self) {
        check_same_allocator(self.allocator(), source.allocator());
        *self = source.clone();
    }
}

impl<K: Hash + Eq, V: PartialEq, B: BuildHasher> PartialEq for HashMap<'_, K, V, B> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
            && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq, B: BuildHasher> Eq for HashMap<'_, K, V, B> {}

impl<K: Hash + Eq, V> Default for HashMap<'static, K, V> {
    fn default() -> Self {
        HashMap::new()
    }
}

impl<K: Hash + Eq, V, B: BuildHasher> Extend<(K, V)> for HashMap<'_, K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for HashMap<'static, K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

/// Lists every slot of a HashMap, with free slots shown as `-`.
struct Slots<'m, 'a, K: Hash + Eq, V, B: BuildHasher>(&'m HashMap<'a, K, V, B>);

impl<K: Hash + Eq + Debug, V: Debug, B: BuildHasher> Debug for Slots<'_, '_, K, V, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for index in 0..self.0.cap() {
            match self.0.slot(index) {
                Some((k, v)) => list.entry(&format_args!("({k:?}: {v:?})")),
                None => list.entry(&format_args!("-")),
            };
        }
        list.finish()
    }
}

impl<K: Hash + Eq + Debug, V: Debug, B: BuildHasher + Debug> Debug for HashMap<'_, K, V, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashMap")
            .field("slots", &Slots(self))
            .field("count", &self.count)
            .field("cap", &self.cap())
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl<K: Hash + Eq + Debug, V: Debug, B: BuildHasher> Display for HashMap<'_, K, V, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        f.debug_map().entries(self.iter()).finish()
    }
}
