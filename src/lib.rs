//! Allocator-aware containers and variant storage.
//!
//! This crate is a small foundation library: a pluggable memory allocator interface, the two
//! containers that most other code is built from ([`Vector`](collections::Vector) and
//! [`HashMap`](collections::HashMap)), a fast non-cryptographic hash and a family of types for
//! storing one of several possible values.
//!
//! # Allocators
//! Every container borrows an [`Allocator`](alloc::Allocator) for its whole lifetime, which means
//! the borrow checker guarantees that the allocator outlives everything allocated from it.
//! Containers created without an explicit allocator use the process-wide
//! [`default_allocator`](alloc::default_allocator). See the [`alloc`] module for the provided
//! implementations.
//!
//! # Error Handling
//! For a foundation library, it is more ergonomic for functions to panic in some cases, because
//! users don't want to be forced to handle an error every time they invoke a method. Imagine
//! having to handle the possibility of a capacity overflow every time you push into a Vector.
//!
//! So programming errors (indexing out of bounds, popping from an empty Vector, reading the
//! wrong variant, mixing allocators) and resource exhaustion are fatal: the error is logged
//! through [`log`] with the location of the caller, then the thread panics with the error's
//! message. Allocation failure is also exposed through the `try_` methods, which return a typed
//! [`ReserveError`](error::ReserveError) instead.
//!
//! When this crate employs errors via [`Result`](core::result::Result)s, it does so in a method
//! that is strongly typed, using enums for static dispatch rather than dynamic, with structs
//! (often ZSTs) that implement [`Error`](std::error::Error). They all live in [`error`].
//!
//! # Dependencies
//! The containers here don't use [`Vec`] or [`std::collections`] at all. This crate depends on
//! `derive_more` for its error and variant boilerplate, `log` for diagnostics, and (with the
//! default `libc` feature, on unix) `libc` for its `malloc`-backed default allocator.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
pub mod collections;
pub mod error;
pub mod hashing;
pub mod variant;

pub(crate) mod util;

#[cfg(test)]
mod proptests;

/// Re-exports used by the code that [`tagged_union!`] generates in other crates.
#[doc(hidden)]
pub mod __private {
    pub use derive_more;
}
