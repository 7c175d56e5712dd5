//! Types that store one of several possible values.
//!
//! The building block is the family of sum types, [`SumType1`] through [`SumType4`]: cells that
//! hold at most one value, chosen from a fixed list of types and addressed by index. Exactly one
//! case is active at a time, and the active value is dropped exactly once, whether it is
//! replaced, reset or goes out of scope.
//!
//! The other types put a narrower interface on top of a sum type:
//! - [`Optional`] holds a value or nothing.
//! - [`Either`] holds a value of one of two types, and is never empty.
//! - [`Result`] is an [`Either`] of a value and an error.
//!
//! Labelled unions with named cases are declared with [`tagged_union!`](crate::tagged_union) and
//! described by the [`TaggedUnion`] trait.
//!
//! Asking any of these types for a case that isn't active is treated as a programming error: the
//! failure is logged and the thread panics. Each fatal accessor has a counterpart returning an
//! [`Option`] for when the active case isn't known ahead of time.

mod either;
mod optional;
mod result;
mod sum_type;
mod tagged_union;
mod tests;

pub use either::*;
pub use optional::*;
pub use result::*;
pub use sum_type::*;
pub use tagged_union::*;
