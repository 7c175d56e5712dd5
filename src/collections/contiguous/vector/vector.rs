use std::borrow::{Borrow, BorrowMut};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use crate::alloc::{default_allocator, Allocator};
use crate::collections::contiguous::{check_same_allocator, RawArray};
use crate::error::{EmptyCollection, IndexOutOfBounds, ReserveError};
use crate::util::result::ResultExtension;

const GROWTH_FACTOR: usize = 2;

/// A variable size contiguous collection, allocated from a borrowed [`Allocator`].
///
/// The Vector doesn't own its allocator, it borrows it for `'a`. Vectors created without one use
/// [`default_allocator`] and have the type `Vector<'static, T>`.
///
/// # Growth
/// When full, the capacity grows to the larger of double the current capacity and the capacity
/// that was asked for. Memory is allocated lazily, on the first growth. Elements are relocated by
/// resizing the allocation, which moves them bitwise: there is no per-element move or drop.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items in the second Vector.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `remove` | `O(n-i)` |
/// | `swap_remove` | `O(1)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `clear` | `O(n)` |
/// | `append` | `O(m)`*** |
///
/// \* If the Vector doesn't have enough capacity for the new element, `push` will take `O(n)`.
///
/// \** If the Vector has enough capacity already, `reserve` is `O(1)`.
///
/// \*** Plus `O(n)` if the Vector has to grow.
pub struct Vector<'a, T> {
    pub(crate) buf: RawArray<'a, T>,
    pub(crate) len: usize,
}

impl<T> Vector<'static, T> {
    /// Creates a new Vector with length and capacity 0, using the [`default_allocator`]. Memory
    /// will be allocated when the capacity changes.
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub fn new() -> Vector<'static, T> {
        Vector::new_in(default_allocator())
    }

    /// Creates a new Vector with capacity exactly equal to the provided value, using the
    /// [`default_allocator`].
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn with_cap(cap: usize) -> Vector<'static, T> {
        Vector::with_cap_in(cap, default_allocator())
    }
}

impl<'a, T> Vector<'a, T> {
    /// Creates a new Vector with length and capacity 0 that will allocate from `alloc`.
    pub const fn new_in(alloc: &'a dyn Allocator) -> Vector<'a, T> {
        Vector {
            buf: RawArray::new_in(alloc),
            len: 0,
        }
    }

    /// Creates a new Vector with capacity exactly equal to `cap`, allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use stowage::alloc::default_allocator;
    /// # use stowage::collections::Vector;
    /// let mut vec = Vector::with_cap_in(5, default_allocator());
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap_in(cap: usize, alloc: &'a dyn Allocator) -> Vector<'a, T> {
        Vector {
            buf: RawArray::with_cap_in(cap, alloc),
            len: 0,
        }
    }

    /// Returns the length of the Vector.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of elements in the Vector. This is the same as [`len`](Vector::len).
    pub const fn count(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector.
    pub const fn cap(&self) -> usize {
        self.buf.cap()
    }

    /// An alias for [`cap`](Vector::cap).
    pub const fn capacity(&self) -> usize {
        self.cap()
    }

    /// Returns the allocator backing this Vector.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.buf.allocator()
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 0..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) {
        if self.len == self.cap() {
            self.grow(self.cap() + 1);
        }
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// A version of [`push`](Vector::push) that reports allocation failure instead of aborting.
    /// On error the value is dropped and the Vector is unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), ReserveError> {
        if self.len == self.cap() {
            self.try_grow(self.cap() + 1)?;
        }
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
        Ok(())
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or
    /// [`with_cap_in`](Vector::with_cap_in) to do so. Using this method on a Vector without
    /// enough capacity is undefined behavior.
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the slot at len is within capacity.
        unsafe { self.buf.write(self.len, value); }
        self.len += 1;
    }

    /// Pops the last value off the end of the Vector.
    ///
    /// # Panics
    /// Panics if the Vector is empty. Use [`try_pop`](Vector::try_pop) when that is expected.
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let mut vec: Vector<_> = (0..3).collect();
    /// assert_eq!(vec.pop(), 2);
    /// assert_eq!(vec.len(), 2);
    /// ```
    #[track_caller]
    pub fn pop(&mut self) -> T {
        self.try_pop().ok_or(EmptyCollection).throw()
    }

    /// Pops the last value off the end of the Vector, returning None if the Vector is empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before reading.
            self.len -= 1;

            // SAFETY: len has just been decremented, so the slot is in bounds and initialized. The
            // slot is treated as uninitialized from here on, so the value is moved out.
            Some(unsafe { self.buf.read(self.len) })
        }
    }

    /// Inserts the provided value at the given index, shifting all following values right.
    /// Inserting at `len` is the same as pushing.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let mut vec: Vector<_> = (0..3).collect();
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(5, 300);
    /// assert_eq!(&*vec, &[0, 200, 100, 1, 2, 300]);
    /// ```
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        if index > self.len {
            Err::<(), _>(IndexOutOfBounds { index, len: self.len }).throw()
        }

        if self.len == self.cap() {
            self.grow(self.cap() + 1);
        }

        // SAFETY: index <= len < cap, so both ranges are within the allocation. The values in
        // [index, len) are initialized and are moved one to the right, then the hole is filled.
        unsafe {
            let hole = self.buf.slot(index);
            ptr::copy(hole, hole.add(1), self.len - index);
            hole.write(value);
        }
        self.len += 1;
    }

    /// Removes the element at the provided index, shifting all following values left.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.remove(1), 'e');
    /// assert_eq!(vec.remove(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect());
    /// ```
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        self.check_index(index);

        // SAFETY: index < len, so the slot is initialized. After reading it, the tail is moved left
        // over the hole, leaving the last slot as a duplicate that is forgotten by decrementing len.
        unsafe {
            let hole = self.buf.slot(index);
            let value = hole.read();
            ptr::copy(hole.add(1), hole, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Removes the element at the provided index, replacing it with the last element.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.check_index(index);
        self.len -= 1;

        // SAFETY: Both index and the old last slot are initialized. If they are the same slot the
        // copy is skipped.
        unsafe {
            let value = self.buf.read(index);
            if index != self.len {
                ptr::copy_nonoverlapping(self.buf.slot(self.len), self.buf.slot(index), 1);
            }
            value
        }
    }

    /// Drops every element past `len`, keeping the capacity. Does nothing if `len` is not less
    /// than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let tail = ptr::slice_from_raw_parts_mut(
            // SAFETY: len < self.len <= cap.
            unsafe { self.buf.slot(len) },
            self.len - len,
        );
        // Update len first, so that a panicking drop can't cause a double drop.
        self.len = len;
        // SAFETY: The tail slots were initialized and are no longer considered part of the Vector.
        unsafe { ptr::drop_in_place(tail); }
    }

    /// Drops all elements, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensures that the Vector has a capacity of at least `cap`, without changing the length.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use stowage::collections::Vector;
    /// let mut vec = Vector::<u32>::new();
    /// vec.reserve(10);
    /// assert_eq!(vec.cap(), 10);
    /// vec.reserve(11);
    /// assert_eq!(vec.cap(), 20);
    /// ```
    pub fn reserve(&mut self, cap: usize) {
        if cap > self.cap() {
            self.grow(cap);
        }
    }

    /// A version of [`reserve`](Vector::reserve) that returns an error instead of panicking or
    /// aborting. On error, the Vector is unchanged.
    pub fn try_reserve(&mut self, cap: usize) -> Result<(), ReserveError> {
        if cap > self.cap() {
            self.try_grow(cap)?;
        }
        Ok(())
    }

    /// Shrinks the Vector so that its capacity is equal to its length.
    pub fn shrink_to_fit(&mut self) {
        self.buf.realloc(self.len);
    }

    /// Moves all elements from `other` onto the end of self, leaving `other` empty. `other` keeps
    /// its capacity.
    pub fn append(&mut self, other: &mut Vector<'_, T>) {
        self.reserve(self.len + other.len);

        // SAFETY: self has room for other.len more values and the two buffers can't overlap. The
        // values are moved bitwise, then forgotten by other.
        unsafe {
            ptr::copy_nonoverlapping(other.buf.as_ptr(), self.buf.slot(self.len), other.len);
        }
        self.len += other.len;
        other.len = 0;
    }

    /// Sets the length of the Vector without touching its elements.
    ///
    /// # Safety
    /// `len` must be less than or equal to the capacity, and all values below `len` must be
    /// initialized.
    pub unsafe fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Returns a non-owning view over the elements of the Vector.
    pub fn to_span(&self) -> &[T] {
        self
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Swaps the contents of two Vectors that share an allocator.
    ///
    /// # Panics
    /// Panics if the Vectors use different allocators.
    #[track_caller]
    pub fn swap_with(&mut self, other: &mut Vector<'a, T>) {
        check_same_allocator(self.allocator(), other.allocator());
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Takes the contents of self, leaving an empty Vector with the same allocator behind.
    pub fn take(&mut self) -> Vector<'a, T> {
        let alloc = self.allocator();
        mem::replace(self, Vector::new_in(alloc))
    }

    /// Grows the Vector so that it can hold at least `need` elements. The new capacity is the
    /// larger of `need` and double the current capacity.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub(crate) fn grow(&mut self, need: usize) {
        let new_cap = self.next_cap(need);
        log::trace!("Vector growing from {} to {} elements", self.cap(), new_cap);
        self.buf.realloc(new_cap);
    }

    pub(crate) fn try_grow(&mut self, need: usize) -> Result<(), ReserveError> {
        let new_cap = self.next_cap(need);
        self.buf.try_realloc(new_cap)
    }

    const fn next_cap(&self, need: usize) -> usize {
        // Saturating, any capacity this large will fail to produce a layout.
        let doubled = self.cap().saturating_mul(GROWTH_FACTOR);
        if doubled < need { need } else { doubled }
    }

    /// Checks that the provided index is within the bounds of self.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    #[track_caller]
    pub(crate) fn check_index(&self, index: usize) {
        if index >= self.len {
            Err::<(), _>(IndexOutOfBounds {
                index,
                len: self.len
            }).throw()
        }
    }
}

impl<T> Extend<T> for Vector<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0));

        for item in iter {
            self.push(item);
        }
    }
}

impl<'b, T: Copy + 'b> Extend<&'b T> for Vector<'_, T> {
    fn extend<I: IntoIterator<Item = &'b T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<'static, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Vector::new();
        vec.extend(iter);
        vec
    }
}

impl<T> Default for Vector<'static, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Vector<'_, T> {
    fn drop(&mut self) {
        // Drop all initialized values in place, then let buf free the memory.
        self.clear();
    }
}

impl<T> Deref for Vector<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The Vector is valid as a slice for len values, which are all initialized. The
        // pointer is nonnull and properly aligned, even for an empty Vector.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for Vector<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As with deref, with the unique borrow of self preventing aliasing.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }
}

impl<T> AsRef<[T]> for Vector<'_, T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for Vector<'_, T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for Vector<'_, T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for Vector<'_, T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<'a, T: Clone> Clone for Vector<'a, T> {
    /// Clones every element into a new buffer from the same allocator.
    fn clone(&self) -> Self {
        let mut vec = Vector::with_cap_in(self.len, self.allocator());
        for value in self.iter() {
            // SAFETY: vec was created with room for every element of self.
            unsafe { vec.push_unchecked(value.clone()); }
        }
        vec
    }

    /// # Panics
    /// Panics if `source` uses a different allocator.
    fn clone_from(&mut self, source: &Self) {
        check_same_allocator(self.allocator(), source.allocator());
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T: PartialEq> PartialEq for Vector<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for Vector<'_, T> {}

impl<T: Hash> Hash for Vector<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug> Debug for Vector<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug> Display for Vector<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "!")?;
        f.debug_list().entries(self.iter()).finish()
    }
}
