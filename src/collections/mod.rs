//! Allocator-aware collection types.
//!
//! Every collection here borrows an [`Allocator`](crate::alloc::Allocator) for its whole lifetime
//! and returns all of its memory to it on drop. The constructors without an `_in` suffix use the
//! [`default_allocator`](crate::alloc::default_allocator).
//!
//! Applicable types here implement [`Deref<Target = [T]>`](std::ops::Deref) (and DerefMut), which
//! provides slice functionality without repeating it.

pub mod contiguous;
pub mod hash;

#[doc(inline)]
pub use contiguous::Vector;
#[doc(inline)]
pub use hash::HashMap;
