//! Non-cryptographic hashing for the hash-based collections in this crate.
//!
//! The hash function is a member of the wyhash family: seeded, 64-bit and very fast on short
//! keys, with good avalanche behaviour. It makes no attempt to resist adversarial input, so
//! don't use it where an attacker chooses the keys.
//!
//! [`WyHasher`] adapts the function to [`std::hash::Hasher`] by chaining: every `write` hashes
//! the new bytes using the running state as the seed.

mod hasher;
mod wyhash;


pub use hasher::*;
pub use wyhash::*;
