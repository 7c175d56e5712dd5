use std::alloc::Layout;
use std::ffi::c_void;
use std::mem;
use std::ptr::{self, NonNull};

use super::Allocator;
use crate::error::AllocError;

/// The alignment that `malloc` guarantees on the supported platforms.
const MALLOC_ALIGN: usize = 2 * mem::size_of::<usize>();

/// An [`Allocator`] that delegates to the C library's `malloc`, `realloc` and `free`.
///
/// Layouts with an alignment stricter than what `malloc` guarantees are served by
/// `posix_memalign` instead, and are moved by hand when resized.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcAllocator;

impl LibcAllocator {
    const fn malloc_aligned(layout: Layout) -> bool {
        layout.align() <= MALLOC_ALIGN && layout.align() <= layout.size()
    }

    fn aligned_alloc(layout: Layout) -> *mut c_void {
        let mut out = ptr::null_mut();
        let align = layout.align().max(mem::size_of::<usize>());
        // SAFETY: align is a power of two and a multiple of the pointer size.
        let ret = unsafe { libc::posix_memalign(&mut out, align, layout.size()) };
        if ret == 0 { out } else { ptr::null_mut() }
    }
}

// SAFETY: Blocks come from the C allocator, which hands out disjoint blocks valid for at least the
// requested size. Alignment above MALLOC_ALIGN is requested explicitly.
unsafe impl Allocator for LibcAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError::from_layout(layout));
        }
        let raw = if Self::malloc_aligned(layout) {
            // SAFETY: malloc has no preconditions.
            unsafe { libc::malloc(layout.size()) }
        } else {
            Self::aligned_alloc(layout)
        };

        NonNull::new(raw.cast()).ok_or(AllocError::from_layout(layout))
    }

    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(new_size > 0);
        let new = Layout::from_size_align(new_size, old.align())
            .map_err(|_| AllocError { size: new_size, align: old.align() })?;

        if Self::malloc_aligned(new) {
            // SAFETY: ptr came from malloc or posix_memalign, both of which realloc accepts.
            let raw = unsafe { libc::realloc(ptr.as_ptr().cast(), new_size) };
            return NonNull::new(raw.cast()).ok_or(AllocError::from_layout(new));
        }

        let moved = NonNull::new(Self::aligned_alloc(new).cast::<u8>())
            .ok_or(AllocError::from_layout(new))?;
        // SAFETY: Both blocks are valid for at least the smaller of the two sizes and are distinct
        // allocations.
        unsafe {
            ptr::copy_nonoverlapping(ptr.as_ptr(), moved.as_ptr(), old.size().min(new_size));
            libc::free(ptr.as_ptr().cast());
        }
        Ok(moved)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, _layout: Layout) {
        // SAFETY: The caller guarantees that ptr is a live block from this allocator.
        unsafe { libc::free(ptr.as_ptr().cast()); }
    }
}
