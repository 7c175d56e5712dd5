use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::Allocator;
use crate::error::AllocError;

/// An [`Allocator`] backed by the global allocator of [`std::alloc`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

// SAFETY: All blocks come straight from the global allocator with the requested layout.
unsafe impl Allocator for Heap {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::from_layout(layout));
        }
        // SAFETY: The size was checked to be non-zero above.
        NonNull::new(unsafe { alloc::alloc(layout) })
            .ok_or(AllocError::from_layout(layout))
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(new_size > 0);
        // SAFETY: The caller upholds the contract of realloc: ptr was allocated with old, and
        // new_size is non-zero and doesn't overflow once rounded to the alignment.
        NonNull::new(unsafe { alloc::realloc(ptr.as_ptr(), old, new_size) })
            .ok_or(AllocError {
                size: new_size,
                align: old.align(),
            })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: The caller guarantees that ptr is a live block with this layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout); }
    }
}
