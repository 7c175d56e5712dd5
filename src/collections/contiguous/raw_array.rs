use std::alloc::Layout;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::alloc::{fatal_alloc, same_allocator, Allocator};
use crate::error::{AllocatorMismatch, CapacityOverflow, ReserveError};
use crate::util::result::ResultExtension;

/// Uninitialized storage for `cap` values of `T`, allocated from a borrowed [`Allocator`].
///
/// A RawArray only manages memory: it never reads, writes or drops the values it holds. Its owner
/// decides which slots are initialized and is responsible for dropping them before the RawArray
/// is dropped or reallocated to a smaller capacity.
///
/// Zero-sized allocations (a capacity of 0, or a zero-sized `T`) never reach the allocator and use
/// a dangling pointer instead.
pub struct RawArray<'a, T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) alloc: &'a dyn Allocator,
    pub(crate) _phantom: PhantomData<T>,
}

impl<'a, T> RawArray<'a, T> {
    /// Creates a RawArray with capacity 0. Nothing is allocated.
    pub const fn new_in(alloc: &'a dyn Allocator) -> RawArray<'a, T> {
        RawArray {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a RawArray with room for exactly `cap` values.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`]. Allocation failures abort through
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error).
    pub fn with_cap_in(cap: usize, alloc: &'a dyn Allocator) -> RawArray<'a, T> {
        let mut arr = RawArray::new_in(alloc);
        arr.realloc(cap);
        arr
    }

    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the allocator that owns this RawArray's memory.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.alloc
    }

    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be less than or equal to the capacity. (Equal produces a one-past-the-end
    /// pointer that can't be dereferenced.)
    pub unsafe fn slot(&self, index: usize) -> *mut T {
        // SAFETY: The caller ensures that index is in bounds of the allocation.
        unsafe { self.ptr.add(index).as_ptr() }
    }

    /// Moves the value out of the slot at `index`, leaving the slot logically uninitialized.
    ///
    /// # Safety
    /// `index` must be in bounds and the slot must be initialized.
    pub unsafe fn read(&self, index: usize) -> T {
        // SAFETY: The caller ensures that the slot is in bounds and initialized.
        unsafe { self.slot(index).read() }
    }

    /// Writes `value` into the slot at `index` without dropping its previous contents.
    ///
    /// # Safety
    /// `index` must be in bounds.
    pub unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: The caller ensures that the slot is in bounds.
        unsafe { self.slot(index).write(value) }
    }

    /// # Safety
    /// `index` must be in bounds and the slot must be initialized.
    pub unsafe fn get(&self, index: usize) -> &T {
        // SAFETY: The caller ensures that the slot is in bounds and initialized, and the borrow of
        // self prevents mutation for the lifetime of the reference.
        unsafe { &*self.slot(index) }
    }

    /// # Safety
    /// `index` must be in bounds and the slot must be initialized.
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: As with get, with the unique borrow of self preventing aliasing.
        unsafe { &mut *self.slot(index) }
    }

    /// Changes the capacity to `new_cap`, preserving the bytes of the first `min(cap, new_cap)`
    /// slots. Values are relocated with a bitwise copy when the allocator moves the block.
    ///
    /// Shrinking doesn't drop anything: the caller must have already dropped (or moved out) every
    /// initialized value at or past `new_cap`.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`]. Allocation failures abort through
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error).
    pub fn realloc(&mut self, new_cap: usize) {
        match self.try_realloc(new_cap) {
            Ok(()) => (),
            Err(ReserveError::AllocError(error)) => fatal_alloc(error),
            Err(overflow) => Err::<(), _>(overflow).throw(),
        }
    }

    /// A version of [`realloc`](RawArray::realloc) that returns an error instead of panicking or
    /// aborting. On error, the RawArray is unchanged.
    pub fn try_realloc(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        let old = Self::make_layout(self.cap)?;
        let new = Self::make_layout(new_cap)?;

        let ptr = match (old.size(), new.size()) {
            (0, 0) => NonNull::dangling(),
            (0, _) => self.alloc.allocate(new)?.cast(),
            (_, 0) => {
                // SAFETY: The block is live and was allocated with the old layout.
                unsafe { self.alloc.free(self.ptr.cast(), old); }
                NonNull::dangling()
            },
            // SAFETY: The block is live and was allocated with the old layout by self.alloc. The
            // new size is non-zero and was checked against isize::MAX by make_layout.
            _ => unsafe { self.alloc.resize(self.ptr.cast(), old, new.size())? }.cast(),
        };

        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Exchanges the memory of two RawArrays.
    ///
    /// # Panics
    /// Panics if `self` and `other` are backed by different allocators.
    pub fn swap(&mut self, other: &mut RawArray<'a, T>) {
        check_same_allocator(self.alloc, other.alloc);
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// A helper function to create a [`Layout`] for `cap` values of `T`.
    pub(crate) fn make_layout(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<T>(cap).map_err(|_| CapacityOverflow)
    }
}

impl<T> Drop for RawArray<'_, T> {
    fn drop(&mut self) {
        // The layout was valid when the memory was allocated, so it still is.
        if let Ok(layout) = Self::make_layout(self.cap)
            && layout.size() != 0
        {
            // SAFETY: The block is live and was allocated with this layout by self.alloc.
            unsafe { self.alloc.free(self.ptr.cast(), layout); }
        }
    }
}

impl<T> Debug for RawArray<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawArray")
            .field("ptr", &self.ptr)
            .field("cap", &self.cap)
            .finish_non_exhaustive()
    }
}

/// Checks that two containers are backed by the same allocator, the precondition for exchanging
/// buffers between them.
///
/// # Panics
/// Panics if `a` and `b` are different allocators.
#[track_caller]
pub(crate) fn check_same_allocator(a: &dyn Allocator, b: &dyn Allocator) {
    if !same_allocator(a, b) {
        Err::<(), _>(AllocatorMismatch).throw()
    }
}
