//! The pluggable memory allocation interface used by every container in this crate.
//!
//! Containers never own their allocator. They borrow one as a `&'a dyn Allocator` at
//! construction, which ties the lifetime of the container to the lifetime of the allocator.
//! Containers that aren't given an allocator use [`default_allocator`], a process-wide instance
//! that delegates to the heap.
//!
//! # Sizes
//! The interface has no hidden bookkeeping: [`free`](Allocator::free) and
//! [`resize`](Allocator::resize) must be handed the exact [`Layout`](std::alloc::Layout) that
//! the block currently has. Every owner of an allocation is responsible for tracking it.
//!
//! # Provided Allocators
//! - [`Heap`]: [`std::alloc`]'s global allocator.
//! - [`LibcAllocator`]: `malloc`, `realloc` and `free` (with the `libc` feature, on unix).
//! - [`TrackingAllocator`]: counts the live allocations of another allocator.
//! - [`LinearAllocator`]: a bump allocator over a fixed buffer.

mod allocator;
mod heap;
#[cfg(all(feature = "libc", unix))]
mod malloc;
mod linear;
mod tracking;


pub use allocator::*;
pub use heap::*;
#[cfg(all(feature = "libc", unix))]
pub use malloc::*;
pub use linear::*;
pub use tracking::*;
