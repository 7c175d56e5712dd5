use std::alloc::Layout;
use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::ptr::NonNull;

use super::Allocator;
use crate::error::{AllocError, AllocationUnderflow};
use crate::util::result::ResultExtension;

/// Wraps another [`Allocator`], keeping count of the bytes and blocks that are currently live.
///
/// Every `free` and `resize` is checked against the live byte count, so releasing memory with the
/// wrong size is caught (at least when it's too large) instead of silently corrupting the
/// bookkeeping.
///
/// # Examples
/// ```
/// # use stowage::alloc::{default_allocator, TrackingAllocator};
/// # use stowage::collections::Vector;
/// let tracker = TrackingAllocator::new(default_allocator());
/// {
///     let mut vec = Vector::new_in(&tracker);
///     vec.push(1_u32);
///     assert_eq!(tracker.live_allocations(), 1);
/// }
/// assert_eq!(tracker.live_bytes(), 0);
/// ```
pub struct TrackingAllocator<'a> {
    inner: &'a dyn Allocator,
    live_bytes: Cell<usize>,
    live_allocations: Cell<usize>,
    total_allocations: Cell<usize>,
}

impl<'a> TrackingAllocator<'a> {
    pub fn new(inner: &'a dyn Allocator) -> TrackingAllocator<'a> {
        TrackingAllocator {
            inner,
            live_bytes: Cell::new(0),
            live_allocations: Cell::new(0),
            total_allocations: Cell::new(0),
        }
    }

    /// The number of bytes currently allocated and not yet freed.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// The number of blocks currently allocated and not yet freed.
    pub fn live_allocations(&self) -> usize {
        self.live_allocations.get()
    }

    /// The number of successful calls to `allocate` over the lifetime of this allocator.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations.get()
    }

    fn release(&self, size: usize) {
        let live = self.live_bytes.get();
        let remaining = live.checked_sub(size).ok_or(AllocationUnderflow { size, live }).throw();
        self.live_bytes.set(remaining);
    }
}

// SAFETY: All blocks are forwarded unchanged from the inner allocator.
unsafe impl Allocator for TrackingAllocator<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;
        self.live_bytes.set(self.live_bytes.get() + layout.size());
        self.live_allocations.set(self.live_allocations.get() + 1);
        self.total_allocations.set(self.total_allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let live = self.live_bytes.get();
        let remaining = live.checked_sub(old.size())
            .ok_or(AllocationUnderflow { size: old.size(), live })
            .throw();

        // SAFETY: The caller's guarantees are forwarded to the inner allocator.
        let moved = unsafe { self.inner.resize(ptr, old, new_size)? };
        self.live_bytes.set(remaining + new_size);
        Ok(moved)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        self.release(layout.size());
        self.live_allocations.set(self.live_allocations.get().saturating_sub(1));
        // SAFETY: The caller's guarantees are forwarded to the inner allocator.
        unsafe { self.inner.free(ptr, layout); }
    }
}

impl Debug for TrackingAllocator<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingAllocator")
            .field("live_bytes", &self.live_bytes.get())
            .field("live_allocations", &self.live_allocations.get())
            .field("total_allocations", &self.total_allocations.get())
            .finish_non_exhaustive()
    }
}

impl Drop for TrackingAllocator<'_> {
    fn drop(&mut self) {
        if self.live_bytes.get() != 0 {
            log::warn!(
                "TrackingAllocator dropped with {} bytes in {} blocks still live",
                self.live_bytes.get(),
                self.live_allocations.get(),
            );
        }
    }
}
