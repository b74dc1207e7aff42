//! Implements [`HashEngine`] on top of the XXH3 hash function.
use fairtable_core::HashEngine;
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// Hasher based on XXH3 algorithm.
///
/// Integers are hashed as their little-endian bytes with a seed of 1 so that an integer key
/// and the byte key spelling it never share a hash by construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Xxh3Hasher;

impl HashEngine for Xxh3Hasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        xxh3_64(bytes)
    }

    #[inline]
    fn hash_u64(&self, value: u64) -> u64 {
        xxh3_64_with_seed(&value.to_le_bytes(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_empty_hash() {
        assert_eq!(Xxh3Hasher.hash_bytes(b""), 0x2d06_8005_38d3_94c2);
    }

    #[test]
    fn test_integer_and_bytes_differ() {
        assert_ne!(
            Xxh3Hasher.hash_u64(7),
            Xxh3Hasher.hash_bytes(&7u64.to_le_bytes())
        );
    }
}
