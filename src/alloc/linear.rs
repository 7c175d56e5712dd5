use std::alloc::Layout;
use std::cell::Cell;
use std::fmt::{self, Debug, Formatter};
use std::ptr::{self, NonNull};

use super::Allocator;
use crate::error::AllocError;

/// The alignment of the backing buffer. Requests with a stricter alignment are still served, at
/// the cost of some padding.
const BACKING_ALIGN: usize = 16;

/// A linear (bump) allocator with a constant capacity, carved out of a single block requested
/// from a parent [`Allocator`].
///
/// Allocation is a pointer bump. Individual blocks can't be freed to make space, with the
/// exception of the most recent one, which can also be resized in place. All memory is reclaimed
/// at once by [`reset`](LinearAllocator::reset), which requires exclusive access and therefore
/// can't happen while any container still borrows the allocator.
///
/// # Examples
/// ```
/// # use stowage::alloc::{default_allocator, LinearAllocator};
/// # use stowage::collections::Vector;
/// let mut arena = LinearAllocator::new(default_allocator(), 1024).unwrap();
/// {
///     let mut vec = Vector::new_in(&arena);
///     vec.extend(0_u64..16);
///     assert!(arena.used() >= 16 * 8);
/// }
/// arena.reset();
/// assert_eq!(arena.used(), 0);
/// ```
pub struct LinearAllocator<'a> {
    parent: &'a dyn Allocator,
    base: NonNull<u8>,
    cap: usize,
    /// Offset of the first unallocated byte.
    top: Cell<usize>,
    /// Offset of the most recent allocation.
    last: Cell<usize>,
}

impl<'a> LinearAllocator<'a> {
    /// Creates a LinearAllocator with `cap` bytes of backing memory taken from `parent`.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the parent allocator can't provide the backing memory.
    pub fn new(parent: &'a dyn Allocator, cap: usize) -> Result<LinearAllocator<'a>, AllocError> {
        let base = if cap == 0 {
            NonNull::dangling()
        } else {
            let layout = Layout::from_size_align(cap, BACKING_ALIGN)
                .map_err(|_| AllocError { size: cap, align: BACKING_ALIGN })?;
            parent.allocate(layout)?
        };

        Ok(LinearAllocator {
            parent,
            base,
            cap,
            top: Cell::new(0),
            last: Cell::new(0),
        })
    }

    /// The number of bytes handed out so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.top.get()
    }

    /// The number of bytes of backing memory.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// The number of bytes left before allocations start failing. Alignment padding may make the
    /// usable amount smaller.
    pub fn remaining(&self) -> usize {
        self.cap - self.top.get()
    }

    /// Frees every allocation at once.
    pub fn reset(&mut self) {
        self.top.set(0);
        self.last.set(0);
    }

    fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        ptr.as_ptr() as usize - self.base.as_ptr() as usize
    }
}

// SAFETY: Blocks are disjoint ranges of the backing buffer, because top only moves backwards when
// the most recent block is freed or shrunk, or when every block is reset through &mut self.
unsafe impl Allocator for LinearAllocator<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::from_layout(layout));
        }
        let base_addr = self.base.as_ptr() as usize;
        let start = (base_addr + self.top.get())
            .checked_next_multiple_of(layout.align())
            .map(|addr| addr - base_addr);

        match start {
            Some(start) if start.checked_add(layout.size()).is_some_and(|end| end <= self.cap) => {
                self.last.set(start);
                self.top.set(start + layout.size());
                // SAFETY: start + size is within the backing buffer.
                Ok(unsafe { self.base.add(start) })
            },
            _ => Err(AllocError::from_layout(layout)),
        }
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let offset = self.offset_of(ptr);

        // The most recent block can be resized in place if it fits.
        if offset == self.last.get() && offset + old.size() == self.top.get() {
            return match offset.checked_add(new_size) {
                Some(end) if end <= self.cap => {
                    self.top.set(end);
                    Ok(ptr)
                },
                _ => Err(AllocError { size: new_size, align: old.align() }),
            };
        }

        if new_size <= old.size() {
            return Ok(ptr);
        }

        let new = Layout::from_size_align(new_size, old.align())
            .map_err(|_| AllocError { size: new_size, align: old.align() })?;
        let moved = self.allocate(new)?;
        // SAFETY: The old block is live for old.size() bytes and the new block is a distinct
        // range of at least that many bytes.
        unsafe { ptr::copy_nonoverlapping(ptr.as_ptr(), moved.as_ptr(), old.size()); }
        Ok(moved)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        let offset = self.offset_of(ptr);
        if offset == self.last.get() && offset + layout.size() == self.top.get() {
            self.top.set(offset);
        }
    }
}

impl Debug for LinearAllocator<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearAllocator")
            .field("base", &self.base)
            .field("cap", &self.cap)
            .field("used", &self.top.get())
            .finish_non_exhaustive()
    }
}

impl Drop for LinearAllocator<'_> {
    fn drop(&mut self) {
        if self.cap != 0 {
            // SAFETY: base was allocated by parent with this exact layout. Nothing can borrow self
            // anymore, so no block handed out by self is still in use.
            unsafe {
                self.parent.free(
                    self.base,
                    Layout::from_size_align_unchecked(self.cap, BACKING_ALIGN),
                );
            }
        }
    }
}
