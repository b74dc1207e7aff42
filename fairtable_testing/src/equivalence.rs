//! Implements a utility-function for testing that two hash paths agree.
use rand::prelude::*;
use std::fmt::Debug;

type HashFunction<'a, K> = dyn Fn(&K) -> u64 + 'a;

/// Verifies that two hash functions produce identical outputs for the same inputs.
///
/// # Parameters
///
/// - `rng`: A random number generator used to create test keys.
/// - `hash1`: The first hash function, e.g. the raw hash reported by one backend.
/// - `hash2`: The second hash function, e.g. the raw hash reported by another backend.
/// - `gen_key`: Key generator function.
/// - `num_trials`: Number of different keys to test.
///
/// # Panics
///
/// If for any key the hash values differ.
pub fn equivalence<R, K>(
    rng: &mut R,
    hash1: &HashFunction<'_, K>,
    hash2: &HashFunction<'_, K>,
    gen_key: &dyn Fn(&mut R) -> K,
    num_trials: usize,
) where
    R: Rng,
    K: Debug,
{
    for _ in 0..num_trials {
        let key = gen_key(rng);

        let hash1 = hash1(&key);
        let hash2 = hash2(&key);

        assert_eq!(
            hash1, hash2,
            "Hash functions produce different results for key {:?}: {:#018x}, {:#018x}",
            key, hash1, hash2,
        );
    }
}

/// Verifies that two table types place every key by the same raw hash.
#[macro_export]
macro_rules! table_hash_equivalence {
    ($T1:ty, $T2:ty, $K:ty, $V:ty, $rng:expr, $gen_key:expr, $num_trials:expr) => {{
        use $crate::fairtable_core::{NewTable, Table, TableKey};
        use $crate::equivalence::equivalence;

        let table1 = <$T1 as NewTable<$K, $V>>::create();
        let table2 = <$T2 as NewTable<$K, $V>>::create();
        let hash1 = |key: &$K| table1.raw_hash(key.as_lookup());
        let hash2 = |key: &$K| table2.raw_hash(key.as_lookup());

        equivalence::<_, $K>($rng, &hash1, &hash2, &$gen_key, $num_trials)
    }};
}
pub use table_hash_equivalence;
