use std::hash::{BuildHasher, Hash, Hasher};

use super::{wyhash, DEFAULT_SEED};

/// A [`Hasher`] that feeds every write through [`wyhash`], seeded with the running state.
///
/// Integers are written as little-endian bytes, so hashes don't depend on the platform.
#[derive(Debug, Clone)]
pub struct WyHasher {
    state: u64,
}

impl WyHasher {
    pub const fn with_seed(seed: u64) -> WyHasher {
        WyHasher {
            state: seed,
        }
    }
}

impl Default for WyHasher {
    fn default() -> Self {
        WyHasher::with_seed(DEFAULT_SEED)
    }
}

impl Hasher for WyHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        self.state = wyhash(bytes, self.state);
    }

    fn write_u8(&mut self, i: u8) {
        self.write(&[i]);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        // Widened so that 32 and 64-bit targets agree.
        self.write_u64(i as u64);
    }
}

/// Builds [`WyHasher`]s that all start from the same seed. This is the default hasher of
/// [`HashMap`](crate::collections::HashMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WyHashBuilder {
    seed: u64,
}

impl WyHashBuilder {
    pub const fn with_seed(seed: u64) -> WyHashBuilder {
        WyHashBuilder {
            seed,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for WyHashBuilder {
    fn default() -> Self {
        WyHashBuilder::with_seed(DEFAULT_SEED)
    }
}

impl BuildHasher for WyHashBuilder {
    type Hasher = WyHasher;

    fn build_hasher(&self) -> Self::Hasher {
        WyHasher::with_seed(self.seed)
    }
}

/// Hashes `value` with a default-seeded [`WyHasher`].
///
/// # Examples
/// ```
/// # use stowage::hashing::hash_one;
/// assert_eq!(hash_one(&1_u32), hash_one(&1_u32));
/// assert_ne!(hash_one("hello"), hash_one("bonjour"));
/// ```
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    WyHashBuilder::default().hash_one(value)
}
