/// The seed used by [`WyHashBuilder::default`](super::WyHashBuilder).
pub const DEFAULT_SEED: u64 = 0xbdd89aa982704029;

const SECRET: [u64; 3] = [0x2d358dccaa6c78a5, 0x8bb84b93962eacc9, 0x4b33a62ed433d4a3];

/// Hashes `data` with the provided `seed`.
///
/// Inputs are read as little-endian words, so the result is the same on every platform.
///
/// # Examples
/// ```
/// # use stowage::hashing::{wyhash, DEFAULT_SEED};
/// assert_eq!(wyhash(b"hello", DEFAULT_SEED), wyhash(b"hello", DEFAULT_SEED));
/// assert_ne!(wyhash(b"hello", DEFAULT_SEED), wyhash(b"hello", 0));
/// ```
pub fn wyhash(data: &[u8], mut seed: u64) -> u64 {
    let len = data.len();
    let (mut a, mut b);

    if len <= 16 {
        if len >= 4 {
            let last = len - 4;
            let delta = (len >> 3) << 2;
            a = (read4(data, 0) << 32) | read4(data, last);
            b = (read4(data, delta) << 32) | read4(data, last - delta);
        } else if len > 0 {
            a = read3(data);
            b = 0;
        } else {
            a = 0;
            b = 0;
        }
    } else {
        let mut rest = data;
        if rest.len() > 48 {
            let mut seed1 = seed;
            let mut seed2 = seed;
            while rest.len() >= 48 {
                seed = mix(read8(rest, 0) ^ SECRET[0], read8(rest, 8) ^ seed);
                seed1 = mix(read8(rest, 16) ^ SECRET[1], read8(rest, 24) ^ seed1);
                seed2 = mix(read8(rest, 32) ^ SECRET[2], read8(rest, 40) ^ seed2);
                rest = &rest[48..];
            }
            seed ^= seed1 ^ seed2;
        }
        if rest.len() > 16 {
            seed = mix(read8(rest, 0) ^ SECRET[2], read8(rest, 8) ^ seed ^ SECRET[1]);
            if rest.len() > 32 {
                seed = mix(read8(rest, 16) ^ SECRET[2], read8(rest, 24) ^ seed);
            }
        }
        // The final two words always come from the end of the whole input, which may overlap
        // with bytes already consumed.
        a = read8(data, len - 16);
        b = read8(data, len - 8);
    }

    a ^= SECRET[1];
    b ^= seed;
    (a, b) = multiply(a, b);
    mix(a ^ SECRET[0] ^ len as u64, b ^ SECRET[1])
}

/// Full 64x64 -> 128 bit multiplication, returning the (low, high) halves.
const fn multiply(a: u64, b: u64) -> (u64, u64) {
    let r = (a as u128) * (b as u128);
    (r as u64, (r >> 64) as u64)
}

const fn mix(a: u64, b: u64) -> u64 {
    let (lo, hi) = multiply(a, b);
    lo ^ hi
}

/// Reads 1 to 3 bytes: the first, middle and last.
fn read3(data: &[u8]) -> u64 {
    let len = data.len();
    ((data[0] as u64) << 56) | ((data[len >> 1] as u64) << 32) | data[len - 1] as u64
}

fn read4(data: &[u8], at: usize) -> u64 {
    let mut word = [0; 4];
    word.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(word) as u64
}

fn read8(data: &[u8], at: usize) -> u64 {
    let mut word = [0; 8];
    word.copy_from_slice(&data[at..at + 8]);
    u64::from_le_bytes(word)
}
