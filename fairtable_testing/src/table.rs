//! Utilities for testing tables against the shared contract.
use crate::generate::{generate_entries, Generate};
use fairtable_core::{Cursor, NewTable, Table, TableConfig, TableKey};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Seed every generated suite starts from, so failures reproduce.
pub const SEED: u64 = 0x5eed_f00d;

/// Generates `size` entries with unique keys from a fixed seed.
pub fn seeded_entries<K, V>(size: usize) -> Vec<(K, V)>
where
    K: Generate<ChaCha8Rng> + Hash + Eq + Clone,
    V: Generate<ChaCha8Rng>,
{
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    generate_entries(&mut rng, size)
}

/// Tests that every inserted key reads back its value and that re-inserting is not counted.
pub fn test_round_trip<K, V, T>(data: &[(K, V)])
where
    K: TableKey + Clone + Debug,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    for (key, value) in data {
        assert!(
            table.insert(key.clone(), value.clone()).unwrap(),
            "Key: {:?}",
            key
        );
    }
    assert_eq!(table.size(), data.len());
    for (key, value) in data {
        assert_eq!(table.get(key.as_lookup()), Some(value), "Key: {:?}", key);
    }
    for (key, value) in data {
        assert!(
            !table.insert(key.clone(), value.clone()).unwrap(),
            "Key: {:?}",
            key
        );
    }
    assert_eq!(table.size(), data.len());
}

/// Tests that absent keys are neither found nor erased.
pub fn test_absent<K, V, T>(present: &[(K, V)], absent: &[(K, V)])
where
    K: TableKey + Clone + Debug,
    V: Clone + Debug,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    for (key, _) in absent {
        assert!(table.get(key.as_lookup()).is_none(), "Key: {:?}", key);
        assert!(!table.erase(key.as_lookup()), "Key: {:?}", key);
    }
    for (key, value) in present {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    for (key, _) in absent {
        assert!(table.get(key.as_lookup()).is_none(), "Key: {:?}", key);
        assert!(!table.erase(key.as_lookup()), "Key: {:?}", key);
    }
    assert_eq!(table.size(), present.len());
}

/// Tests that overwriting replaces the value and keeps a single entry.
pub fn test_overwrite<K, V, T>(key: K, first: V, second: V)
where
    K: TableKey + Clone + Debug,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    assert!(table.insert(key.clone(), first).unwrap());
    assert!(!table.insert(key.clone(), second.clone()).unwrap());
    assert_eq!(table.size(), 1);
    assert_eq!(table.get(key.as_lookup()), Some(&second));
    assert_eq!(table.iterate().count(), 1);
}

/// Tests erasing every other key and then the rest.
pub fn test_erase<K, V, T>(data: &[(K, V)])
where
    K: TableKey + Clone + Debug,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    for (key, value) in data {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    for (key, _) in data.iter().step_by(2) {
        assert!(table.erase(key.as_lookup()), "Key: {:?}", key);
        assert!(!table.erase(key.as_lookup()), "Key: {:?}", key);
    }
    assert_eq!(table.size(), data.len() / 2);
    for (i, (key, value)) in data.iter().enumerate() {
        let expected = (i % 2 == 1).then_some(value);
        assert_eq!(table.get(key.as_lookup()), expected, "Key: {:?}", key);
    }
    for (key, _) in data.iter().skip(1).step_by(2) {
        assert!(table.erase(key.as_lookup()), "Key: {:?}", key);
    }
    assert!(table.is_empty());
    assert!(table.iterate().is_end());
}

/// Tests that a traversal visits exactly the live entries, each once.
pub fn test_size_matches_cursor<K, V, T>(data: &[(K, V)])
where
    K: TableKey + Clone + Debug + Hash + Eq,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    for (key, value) in data {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    for (key, _) in data.iter().step_by(3) {
        table.erase(key.as_lookup());
    }

    let mut seen = HashSet::new();
    let mut cursor = table.iterate();
    while !cursor.is_end() {
        let Some((key, value)) = cursor.entry() else {
            panic!("Cursor is not at the end but has no entry");
        };
        assert!(seen.insert(key), "Key visited twice: {:?}", key);
        assert_eq!(table.get(key.as_lookup()), Some(value), "Key: {:?}", key);
        cursor.advance();
    }
    assert_eq!(seen.len(), table.size());
    assert_eq!(cursor.entry(), None);
    assert_eq!(table.iterate().count(), table.size());
}

/// Runs the reference scenario: `1 -> A`, `2 -> B`, `1 -> C`, erase `2`.
///
/// `keys` stand in for `1` and `2`, `values` for `A`, `B` and `C`.
pub fn test_scenario<K, V, T>(keys: [K; 2], values: [V; 3])
where
    K: TableKey + Clone + PartialEq + Debug,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let [one, two] = keys;
    let [a, b, c] = values;
    let mut table = T::create();
    assert!(table.insert(one.clone(), a).unwrap());
    assert!(table.insert(two.clone(), b).unwrap());
    assert!(!table.insert(one.clone(), c.clone()).unwrap());
    assert_eq!(table.size(), 2);
    assert_eq!(table.get(one.as_lookup()), Some(&c));
    assert!(table.erase(two.as_lookup()));
    assert_eq!(table.size(), 1);
    let entries: Vec<_> = table.iterate().collect();
    assert_eq!(entries, vec![(&one, &c)]);
}

/// Tests that the footprint never shrinks while inserting and covers the reserved buckets.
pub fn test_memory_monotonic<K, V, T>(data: &[(K, V)])
where
    K: TableKey + Clone + Debug,
    V: Clone,
    T: NewTable<K, V>,
{
    let mut table = T::create();
    let mut last = table.memory_footprint();
    assert!(last >= std::mem::size_of::<T>());
    for (key, value) in data {
        table.insert(key.clone(), value.clone()).unwrap();
        let footprint = table.memory_footprint();
        assert!(footprint >= last, "Footprint shrank after inserting {:?}", key);
        assert!(footprint >= table.bucket_count() * std::mem::size_of::<(K, V)>());
        last = footprint;
    }
}

/// Tests that a table sized through its config takes all entries without growing.
pub fn test_presized<K, V, T>(data: &[(K, V)])
where
    K: TableKey + Clone,
    V: Clone,
    T: NewTable<K, V>,
{
    let config = TableConfig::default().with_initial_capacity(data.len());
    let mut table = T::with_config(&config).unwrap();
    let num_buckets = table.bucket_count();
    assert!(num_buckets >= data.len());
    for (key, value) in data {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    assert_eq!(table.bucket_count(), num_buckets);
    table.destroy();
}

/// Tests the empty key and a key of zero bytes next to ordinary keys.
///
/// `empty` and `zeros` must not occur among the keys of `data`.
pub fn test_empty_key<K, V, T>(empty: K, zeros: K, data: &[(K, V)], values: [V; 2])
where
    K: TableKey + Clone + PartialEq + Debug,
    V: Clone + PartialEq + Debug,
    T: NewTable<K, V>,
{
    let [first, second] = values;
    let mut table = T::create();
    assert!(table.get(empty.as_lookup()).is_none());
    assert!(!table.erase(empty.as_lookup()));
    for (key, value) in data {
        table.insert(key.clone(), value.clone()).unwrap();
    }
    assert!(table.insert(empty.clone(), first.clone()).unwrap());
    assert!(table.insert(zeros.clone(), second.clone()).unwrap());
    assert_eq!(table.size(), data.len() + 2);
    assert_eq!(table.get(empty.as_lookup()), Some(&first));
    assert_eq!(table.get(zeros.as_lookup()), Some(&second));

    let found: Vec<_> = table.iterate().filter(|&(key, _)| *key == empty).collect();
    assert_eq!(found, vec![(&empty, &first)]);

    assert!(table.erase(empty.as_lookup()));
    assert!(!table.erase(empty.as_lookup()));
    assert!(table.get(empty.as_lookup()).is_none());
    assert_eq!(table.get(zeros.as_lookup()), Some(&second));
    assert_eq!(table.size(), data.len() + 1);
    for (key, value) in data {
        assert_eq!(table.get(key.as_lookup()), Some(value), "Key: {:?}", key);
    }
}

/// Generates the contract suite for a table type for every key and value kind.
///
/// `$Table` must be generic over key and value as its first two parameters and implement
/// [`NewTable`] for each combination.
#[macro_export]
macro_rules! generate_table_tests {
    ($Table:ident) => {
        $crate::generate_table_tests!(@owned $Table, u16_void, u16, ());
        $crate::generate_table_tests!(@owned $Table, u32_val4, u32, $crate::fairtable_core::Val4);
        $crate::generate_table_tests!(@owned $Table, u64_val56, u64, $crate::fairtable_core::Val56);
        $crate::generate_table_tests!(@owned $Table, u64_val256, u64, $crate::fairtable_core::Val256);
        $crate::generate_table_tests!(@owned $Table, str_void, Box<[u8]>, (); bytes);
        $crate::generate_table_tests!(@owned $Table, str_val64, Box<[u8]>, $crate::fairtable_core::Val64; bytes);
        $crate::generate_table_tests!(@borrowed $Table, strfair_val4, $crate::fairtable_core::Val4);
    };
    (@owned $Table:ident, $name:ident, $K:ty, $V:ty $(; $bytes:ident)?) => {
        mod $name {
            use super::*;

            const SIZE: usize = 999;

            fn owned() -> Vec<($K, $V)> {
                $crate::table::seeded_entries::<$K, $V>(SIZE + SIZE / 3)
            }

            fn view(owned: &[($K, $V)]) -> Vec<($K, $V)> {
                owned.to_vec()
            }

            $crate::generate_table_tests!(@suite $Table, $K, $V);
            $($crate::generate_table_tests!(@$bytes $Table, $K, $V);)?
        }
    };
    (@borrowed $Table:ident, $name:ident, $V:ty) => {
        mod $name {
            use super::*;

            const SIZE: usize = 999;

            fn owned() -> Vec<(Box<[u8]>, $V)> {
                $crate::table::seeded_entries::<Box<[u8]>, $V>(SIZE + SIZE / 3)
            }

            fn view(owned: &[(Box<[u8]>, $V)]) -> Vec<(&[u8], $V)> {
                owned.iter().map(|(k, v)| (&k[..], v.clone())).collect()
            }

            $crate::generate_table_tests!(@suite $Table, &[u8], $V);
            $crate::generate_table_tests!(@bytes $Table, &[u8], $V);
        }
    };
    (@bytes $Table:ident, $K:ty, $V:ty) => {
        #[test]
        fn test_empty_key() {
            // Generated keys are 1 to 64 bytes long, so neither key below collides.
            let empty: Box<[u8]> = Box::new([]);
            let zeros: Box<[u8]> = Box::new([0; 65]);
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_empty_key::<$K, $V, $Table<$K, $V>>(
                <$K>::from(&empty[..]),
                <$K>::from(&zeros[..]),
                &data[..SIZE],
                [data[0].1.clone(), data[1].1.clone()],
            );
        }
    };
    (@suite $Table:ident, $K:ty, $V:ty) => {
        #[test]
        fn test_round_trip() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_round_trip::<$K, $V, $Table<$K, $V>>(&data[..SIZE]);
        }

        #[test]
        fn test_absent() {
            let owned = owned();
            let data = view(&owned);
            let (present, absent) = data.split_at(SIZE);
            $crate::table::test_absent::<$K, $V, $Table<$K, $V>>(present, absent);
        }

        #[test]
        fn test_overwrite() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_overwrite::<$K, $V, $Table<$K, $V>>(
                data[0].0.clone(),
                data[1].1.clone(),
                data[2].1.clone(),
            );
        }

        #[test]
        fn test_erase() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_erase::<$K, $V, $Table<$K, $V>>(&data[..SIZE]);
        }

        #[test]
        fn test_size_matches_cursor() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_size_matches_cursor::<$K, $V, $Table<$K, $V>>(&data[..SIZE]);
        }

        #[test]
        fn test_scenario() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_scenario::<$K, $V, $Table<$K, $V>>(
                [data[0].0.clone(), data[1].0.clone()],
                [data[0].1.clone(), data[1].1.clone(), data[2].1.clone()],
            );
        }

        #[test]
        fn test_memory_monotonic() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_memory_monotonic::<$K, $V, $Table<$K, $V>>(&data[..SIZE]);
        }

        #[test]
        fn test_presized() {
            let owned = owned();
            let data = view(&owned);
            $crate::table::test_presized::<$K, $V, $Table<$K, $V>>(&data[..SIZE]);
        }
    };
}
pub use generate_table_tests;
