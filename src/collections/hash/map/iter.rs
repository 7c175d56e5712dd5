use std::hash::{BuildHasher, Hash};
use std::iter::{Enumerate, FusedIterator};
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use std::slice::Iter as SlotIter;

use super::hash_map::{HashMap, SlotStatus};
use crate::collections::contiguous::{RawArray, Vector};

impl<'a, K: Hash + Eq, V, B: BuildHasher> IntoIterator for HashMap<'a, K, V, B> {
    type Item = (K, V);

    type IntoIter = IntoIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut map = ManuallyDrop::new(self);
        // SAFETY: map is never dropped, so each field is read exactly once. Ownership of the
        // arrays moves to the iterator and the hasher is dropped here.
        unsafe {
            ptr::drop_in_place(&mut map.hasher);
            IntoIter {
                status: ptr::read(&map.status),
                keys: ptr::read(&map.keys),
                values: ptr::read(&map.values),
                index: 0,
                remaining: map.count,
            }
        }
    }
}

/// A type for owned iteration over a [`HashMap`]'s entries. Entries are yielded in slot order.
/// The slot arrays are returned to their allocator when the iterator is dropped, along with any
/// entries that weren't consumed.
pub struct IntoIter<'a, K, V> {
    pub(crate) status: Vector<'a, SlotStatus>,
    pub(crate) keys: RawArray<'a, K>,
    pub(crate) values: RawArray<'a, V>,
    /// The first slot that hasn't been visited.
    pub(crate) index: usize,
    pub(crate) remaining: usize,
}

impl<K, V> Iterator for IntoIter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.status.len() {
            let index = self.index;
            self.index += 1;

            if self.status[index].is_used() {
                self.remaining -= 1;
                // SAFETY: The slot is used, and is forgotten by moving index past it.
                return Some(unsafe { (self.keys.read(index), self.values.read(index)) });
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<'_, K, V> {}

impl<K, V> FusedIterator for IntoIter<'_, K, V> {}

impl<K, V> Drop for IntoIter<'_, K, V> {
    fn drop(&mut self) {
        for index in self.index..self.status.len() {
            if self.status[index].is_used() {
                // SAFETY: The slot is used and hasn't been yielded.
                unsafe {
                    ptr::drop_in_place(self.keys.slot(index));
                    ptr::drop_in_place(self.values.slot(index));
                }
            }
        }
    }
}

impl<'m, K: Hash + Eq, V, B: BuildHasher> IntoIterator for &'m HashMap<'_, K, V, B> {
    type Item = (&'m K, &'m V);

    type IntoIter = Iter<'m, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            status: self.status.iter().enumerate(),
            keys: self.keys.ptr,
            values: self.values.ptr,
            remaining: self.count(),
            _phantom: PhantomData,
        }
    }
}

/// Borrowed iteration over a [`HashMap`]'s entries, in slot order.
pub struct Iter<'m, K, V> {
    pub(crate) status: Enumerate<SlotIter<'m, SlotStatus>>,
    pub(crate) keys: NonNull<K>,
    pub(crate) values: NonNull<V>,
    pub(crate) remaining: usize,
    pub(crate) _phantom: PhantomData<(&'m K, &'m V)>,
}

impl<'m, K, V> Iterator for Iter<'m, K, V> {
    type Item = (&'m K, &'m V);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, _) = self.status.find(|(_, status)| status.is_used())?;
        self.remaining -= 1;
        // SAFETY: The slot is used, and the map is borrowed for 'm.
        Some(unsafe { (self.keys.add(index).as_ref(), self.values.add(index).as_ref()) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            status: self.status.clone(),
            keys: self.keys,
            values: self.values,
            remaining: self.remaining,
            _phantom: PhantomData,
        }
    }
}

/// Iteration over a [`HashMap`]'s values, as mutable references. There is no mutable iteration
/// over keys, because changing a key in place could change its hash.
pub struct ValuesMut<'m, K, V> {
    pub(crate) status: Enumerate<SlotIter<'m, SlotStatus>>,
    pub(crate) values: NonNull<V>,
    pub(crate) remaining: usize,
    pub(crate) _phantom: PhantomData<(&'m K, &'m mut V)>,
}

impl<'m, K, V> ValuesMut<'m, K, V> {
    pub(crate) fn new<B: BuildHasher>(map: &'m mut HashMap<'_, K, V, B>) -> ValuesMut<'m, K, V>
    where
        K: Hash + Eq,
    {
        ValuesMut {
            remaining: map.count(),
            values: map.values.ptr,
            status: map.status.iter().enumerate(),
            _phantom: PhantomData,
        }
    }
}

impl<'m, K, V> Iterator for ValuesMut<'m, K, V> {
    type Item = &'m mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, _) = self.status.find(|(_, status)| status.is_used())?;
        self.remaining -= 1;
        // SAFETY: The slot is used, the map is uniquely borrowed for 'm and each slot is yielded
        // at most once.
        Some(unsafe { self.values.add(index).as_mut() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

pub struct Keys<'m, K, V>(
    pub(crate) Iter<'m, K, V>
);

impl<'m, K, V> Iterator for Keys<'m, K, V> {
    type Item = &'m K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

pub struct Values<'m, K, V>(
    pub(crate) Iter<'m, K, V>
);

impl<'m, K, V> Iterator for Values<'m, K, V> {
    type Item = &'m V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

pub struct IntoKeys<'a, K, V>(
    pub(crate) IntoIter<'a, K, V>
);

impl<K, V> Iterator for IntoKeys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

pub struct IntoValues<'a, K, V>(
    pub(crate) IntoIter<'a, K, V>
);

impl<K, V> Iterator for IntoValues<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
