use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// A source of raw memory.
///
/// Allocations are described with a [`Layout`], and the exact layout of an allocation is
/// required again to resize or free it. Zero-sized allocations are refused with an
/// [`AllocError`]; containers deal with zero-sized types themselves without calling into the
/// allocator.
///
/// Failing to allocate is reported through [`AllocError`]. The containers in this crate treat
/// that error as fatal, unless it came through one of their `try_` methods.
///
/// # Safety
/// Implementors must return blocks that are valid for reads and writes of the requested size,
/// aligned to the requested alignment and disjoint from every other live block. A block must
/// stay valid until it is passed to [`free`](Allocator::free) or
/// [`resize`](Allocator::resize).
pub unsafe trait Allocator {
    /// Allocates a block of memory fitting `layout`.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the memory isn't available, or if `layout.size()` is 0.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Resizes the block at `ptr` to `new_size` bytes, keeping the alignment of `old`. The first
    /// `min(old.size(), new_size)` bytes are preserved, although the block may move. On success
    /// `ptr` is invalidated. On failure the original block is left untouched.
    ///
    /// # Safety
    /// `ptr` must be a live block returned by this allocator with the layout `old`, and
    /// `new_size` must be greater than 0 and not overflow [`isize::MAX`] when rounded up to
    /// `old.align()`.
    unsafe fn resize(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Releases the block at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be a live block returned by this allocator with the layout `layout`. The block
    /// can't be used after this call.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

impl dyn Allocator + '_ {
    /// Moves `value` into a new allocation, returning a pointer to it. Zero-sized values aren't
    /// allocated and produce a dangling pointer instead.
    ///
    /// The returned pointer needs to be released with [`free_object`](Self::free_object) to drop
    /// the value and return its memory.
    pub fn alloc_object<T>(&self, value: T) -> NonNull<T> {
        let layout = Layout::new::<T>();
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            match self.allocate(layout) {
                Ok(ptr) => ptr.cast(),
                Err(error) => fatal_alloc(error),
            }
        };

        // SAFETY: ptr is either dangling for a ZST or a fresh block with the layout of T.
        unsafe { ptr.write(value); }
        ptr
    }

    /// Drops the value behind `ptr` and frees its allocation.
    ///
    /// # Safety
    /// `ptr` must have been returned by [`alloc_object`](Self::alloc_object) on this allocator
    /// and not freed since.
    pub unsafe fn free_object<T>(&self, ptr: NonNull<T>) {
        let layout = Layout::new::<T>();
        // SAFETY: The caller guarantees that ptr points to a live T.
        unsafe { ptr::drop_in_place(ptr.as_ptr()); }

        if layout.size() != 0 {
            // SAFETY: The block was allocated by self with the layout of T.
            unsafe { self.free(ptr.cast(), layout); }
        }
    }
}

/// Returns the process-wide allocator used by containers that aren't given one.
///
/// With the `libc` feature (on by default) this is a [`LibcAllocator`](super::LibcAllocator),
/// otherwise it is [`Heap`](super::Heap).
pub fn default_allocator() -> &'static dyn Allocator {
    #[cfg(all(feature = "libc", unix))]
    {
        static DEFAULT: super::LibcAllocator = super::LibcAllocator;
        &DEFAULT
    }
    #[cfg(not(all(feature = "libc", unix)))]
    {
        static DEFAULT: super::Heap = super::Heap;
        &DEFAULT
    }
}

/// Returns true if `a` and `b` are the same allocator instance, meaning that blocks from one can
/// be freed through the other.
///
/// Instances are identified by address. Two distinct values of a zero-sized allocator such as
/// [`Heap`](super::Heap) may compare as different even though they share a backing store, so
/// containers refuse to exchange buffers between them. That is conservative, never unsound.
pub fn same_allocator(a: &dyn Allocator, b: &dyn Allocator) -> bool {
    ptr::addr_eq(ptr::from_ref(a), ptr::from_ref(b))
}

/// Reports an allocation failure, which doesn't return.
#[track_caller]
pub(crate) fn fatal_alloc(error: AllocError) -> ! {
    let location = std::panic::Location::caller();
    log::error!("{}:{}: {}", location.file(), location.line(), error);
    alloc::handle_alloc_error(error.layout())
}
