//! Contiguous collection types. Namely [`Vector`], a growable array, and [`RawArray`], the
//! allocator-backed uninitialized storage that Vector and
//! [`HashMap`](crate::collections::HashMap) are built from.

mod raw_array;
pub mod vector;

pub use raw_array::RawArray;
pub(crate) use raw_array::check_same_allocator;
#[doc(inline)]
pub use vector::Vector;
