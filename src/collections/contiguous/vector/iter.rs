use std::iter::FusedIterator;
use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use super::Vector;
use crate::collections::contiguous::RawArray;

impl<'a, T> IntoIterator for Vector<'a, T> {
    type Item = T;

    type IntoIter = IntoIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        let vec = ManuallyDrop::new(self);
        IntoIter {
            // SAFETY: vec is never dropped, so ownership of the buffer moves to the iterator.
            buf: unsafe { ptr::read(&vec.buf) },
            start: 0,
            end: vec.len,
        }
    }
}

impl<'v, T> IntoIterator for &'v Vector<'_, T> {
    type Item = &'v T;

    type IntoIter = slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, T> IntoIterator for &'v mut Vector<'_, T> {
    type Item = &'v mut T;

    type IntoIter = slice::IterMut<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for owned iteration over a [`Vector`]. See [`Vector::into_iter`]. The buffer is returned
/// to its allocator when the iterator is dropped, along with any values that weren't consumed.
pub struct IntoIter<'a, T> {
    pub(crate) buf: RawArray<'a, T>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl<T> IntoIter<'_, T> {
    /// Returns the values which haven't been yielded yet.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The slots in [start, end) are initialized and owned by the iterator.
        unsafe { slice::from_raw_parts(self.buf.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start < end, so the slot is initialized. Incrementing start forgets it.
            let value = unsafe { self.buf.read(self.start) };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: The slot at the newly decremented end is initialized and is forgotten by
            // the decrement.
            Some(unsafe { self.buf.read(self.end) })
        } else {
            None
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<'_, T> {}

impl<T> FusedIterator for IntoIter<'_, T> {}

impl<T> Drop for IntoIter<'_, T> {
    fn drop(&mut self) {
        let remaining = ptr::slice_from_raw_parts_mut(
            // SAFETY: start <= end <= cap.
            unsafe { self.buf.slot(self.start) },
            self.end - self.start,
        );
        // SAFETY: The remaining values are initialized and owned by the iterator. The buffer
        // itself is freed when buf is dropped.
        unsafe { ptr::drop_in_place(remaining); }
    }
}
