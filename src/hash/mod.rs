//! Deterministic 64-bit hashing.
//!
//! Adapted from MurmurHash3 by Austin Appleby (x64 variant, public domain),
//! trimmed to a 64-bit output. Both key placement and virtual-node placement
//! hash through this function, so every node in a deployment must agree on
//! it; the standard library hasher is unsuitable because its output is not
//! stable across processes.

/// Seed shared by all placement hashing in the cluster.
pub const PLACEMENT_SEED: u64 = 0xDEAD_BEEF;

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Deterministic 64-bit hash of arbitrary bytes. Pure function; no state.
pub fn murmur3_64(data: &[u8], seed: u64) -> u64 {
    let len = data.len();
    let n_blocks = len / 16;

    let mut h1 = seed;
    let mut h2 = seed;

    for block in 0..n_blocks {
        let mut k1 = read_u64_le(&data[block * 16..]);
        let mut k2 = read_u64_le(&data[block * 16 + 8..]);

        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dc_e729);

        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x3849_5ab5);
    }

    let tail = &data[n_blocks * 16..];
    let mut k1: u64 = 0;
    let mut k2: u64 = 0;

    if tail.len() > 8 {
        for i in (8..tail.len()).rev() {
            k2 ^= (tail[i] as u64) << ((i - 8) * 8);
        }
        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
    }
    if !tail.is_empty() {
        for i in (0..tail.len().min(8)).rev() {
            k1 ^= (tail[i] as u64) << (i * 8);
        }
        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= len as u64;
    h2 ^= len as u64;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1.wrapping_add(h2)
}

/// Convenience wrapper for string keys.
pub fn murmur3_64_str(key: &str, seed: u64) -> u64 {
    murmur3_64(key.as_bytes(), seed)
}

fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

// Final avalanche step from the reference implementation.
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deterministic_for_same_input() {
        assert_eq!(murmur3_64_str("hello world", 42), murmur3_64_str("hello world", 42));
    }

    #[test]
    fn different_seeds_produce_different_hashes() {
        assert_ne!(murmur3_64_str("hello world", 1), murmur3_64_str("hello world", 2));
    }

    #[test]
    fn different_keys_produce_different_hashes() {
        assert_ne!(murmur3_64_str("key1", 0), murmur3_64_str("key2", 0));
    }

    #[test]
    fn empty_input_is_deterministic_and_seed_sensitive() {
        assert_eq!(murmur3_64_str("", 0), murmur3_64_str("", 0));
        assert_ne!(murmur3_64_str("", 1), murmur3_64_str("", 2));
    }

    #[test]
    fn tail_lengths_around_block_boundary_differ() {
        // 15, 16 and 17 bytes exercise the tail, the block loop and both.
        let inputs = ["aaaaaaaaaaaaaaa", "aaaaaaaaaaaaaaaa", "aaaaaaaaaaaaaaaaa"];
        let hashes: HashSet<u64> = inputs
            .iter()
            .map(|input| murmur3_64_str(input, 0))
            .collect();
        assert_eq!(hashes.len(), inputs.len());
    }

    #[test]
    fn no_collisions_for_small_key_set() {
        let mut hashes = HashSet::new();
        for i in 0..10_000 {
            hashes.insert(murmur3_64_str(&format!("key_{}", i), 0));
        }
        assert_eq!(hashes.len(), 10_000);
    }
}
