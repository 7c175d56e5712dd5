//! Hash-based collection types.

pub mod map;

#[doc(inline)]
pub use map::HashMap;
