//! Error types raised by the containers and allocators in this crate.
//!
//! Almost every error here is fatal: containers detect the condition, log it and panic via
//! [`throw`](crate::util::result::ResultExtension::throw). The exception is [`ReserveError`],
//! which the `try_` family of methods hands back to the caller instead.

use std::alloc::Layout;

use derive_more::{Display, Error, From, IsVariant, TryInto};

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Index {index} out of bounds for collection with {len} elements!")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Capacity overflow!")]
pub struct CapacityOverflow;

/// An allocator was unable to provide memory for the given layout.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Allocation of {size} bytes (align {align}) failed!")]
pub struct AllocError {
    pub size: usize,
    pub align: usize,
}

impl AllocError {
    pub const fn from_layout(layout: Layout) -> AllocError {
        AllocError {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Rebuilds the layout that failed. Only used to forward the failure to
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error).
    pub(crate) fn layout(&self) -> Layout {
        Layout::from_size_align(self.size, self.align).unwrap_or(Layout::new::<u8>())
    }
}

/// Two containers backed by different allocators were asked to exchange buffers.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Containers backed by different allocators can't exchange buffers!")]
pub struct AllocatorMismatch;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Attempted to pop from an empty collection!")]
pub struct EmptyCollection;

/// A typed access named a case that isn't the active one. `found` is None for an empty cell.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Expected variant {expected} but found {found:?}!")]
pub struct WrongVariant {
    pub expected: usize,
    pub found: Option<usize>,
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Attempted to access the value of an empty Optional!")]
pub struct ValueMissing;

/// The ways in which reserving capacity can fail without aborting.
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    CapacityOverflow(CapacityOverflow),
    AllocError(AllocError),
}

/// A [`TrackingAllocator`](crate::alloc::TrackingAllocator) was asked to release more memory than
/// it had handed out.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Released {size} bytes while only {live} bytes were live!")]
pub struct AllocationUnderflow {
    pub size: usize,
    pub live: usize,
}
