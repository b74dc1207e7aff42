use crate::hashing::engine::{hash_bytes, hash_u64};
use fairtable_core::HashEngine;

/// Stateless engine forwarding to [`crate::hashing::engine`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FairHasher;

impl HashEngine for FairHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        hash_bytes(bytes)
    }

    #[inline]
    fn hash_u64(&self, value: u64) -> u64 {
        hash_u64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairtable_core::HashKey;
    use fairtable_testing::{avalanche, bucket_uniformity, jitter_independence};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const ALPHA: f64 = 0.001;

    #[test]
    fn test_forwards_to_engine() {
        assert_eq!(b"abc"[..].hash_with(&FairHasher), hash_bytes(b"abc"));
        assert_eq!(42u16.hash_with(&FairHasher), hash_u64(42));
        assert_eq!(42u32.hash_with(&FairHasher), 42u64.hash_with(&FairHasher));
    }

    #[test]
    fn test_integer_buckets_are_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        bucket_uniformity::<_, u64>(&mut rng, &|key| FairHasher.hash_u64(*key), 64, 50, 100, ALPHA);
    }

    #[test]
    fn test_byte_buckets_are_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        bucket_uniformity::<_, Vec<u8>>(
            &mut rng,
            &|key| FairHasher.hash_bytes(key),
            64,
            50,
            100,
            ALPHA,
        );
    }

    #[test]
    fn test_byte_jitter_lands_independently() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        jitter_independence::<_, Vec<u8>>(
            &mut rng,
            &|key| FairHasher.hash_bytes(key),
            16,
            10,
            100,
            ALPHA,
        );
    }

    #[test]
    fn test_byte_avalanche() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        avalanche::<_, Vec<u8>>(&mut rng, &|key| FairHasher.hash_bytes(key), 20_000, 0.03);
    }

    // The integer path is a single fold, so single-bit flips only reach most output bits.
    #[test]
    fn test_integer_avalanche_is_partial() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        avalanche::<_, u64>(&mut rng, &|key| FairHasher.hash_u64(*key), 20_000, 0.15);
    }
}
