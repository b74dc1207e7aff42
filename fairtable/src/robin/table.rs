//! Implements the table contract for [`RobinTable`].
use crate::cursor::MetadataCursor;
use crate::hashing::common::home_bucket;
use crate::memory::footprint;
use crate::robin::probe::{apply, plan};
use crate::robin::{Meta, RobinTable};
use fairtable_core::{HashEngine, HashKey, NewTable, Result, Table, TableConfig, TableKey};
use std::mem::MaybeUninit;

impl<K: TableKey, V, E: HashEngine> RobinTable<K, V, E> {
    /// Finds the bucket holding `key`.
    ///
    /// Stops at the first bucket whose occupant is closer to home than `key` would be there.
    fn find(&self, hash: u64, key: &K::Lookup) -> Option<usize> {
        if self.meta.is_empty() {
            return None;
        }
        let mask = self.mask();
        let fingerprint = Meta::fingerprint_of(hash);
        let mut index = home_bucket(hash, mask);
        let mut dib = 1;
        loop {
            let meta = self.meta[index];
            if meta.dib() < dib {
                return None;
            }
            if meta.dib() == dib && meta.fingerprint() == fingerprint {
                // SAFETY: occupied buckets are initialized.
                let (stored, _) = unsafe { self.buckets[index].assume_init_ref() };
                if stored.as_lookup() == key {
                    return Some(index);
                }
            }
            index = (index + 1) & mask;
            dib += 1;
        }
    }
}

impl<K: TableKey, V, E: HashEngine> Table<K, V> for RobinTable<K, V, E> {
    type Cursor<'a>
        = MetadataCursor<'a, Meta, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Result<bool> {
        let hash = key.as_lookup().hash_with(&self.engine);
        if let Some(index) = self.find(hash, key.as_lookup()) {
            // SAFETY: `find` only returns occupied buckets.
            unsafe { self.buckets[index].assume_init_mut() }.1 = value;
            return Ok(false);
        }

        if self.len >= self.max_used {
            self.resize(self.next_num_buckets()?)?;
        }
        let placement = loop {
            if let Some(placement) = plan(&self.meta, hash) {
                break placement;
            }
            self.resize(self.next_num_buckets()?)?;
        };
        apply(&mut self.meta, &mut self.buckets, placement, (key, value));
        self.len += 1;
        Ok(true)
    }

    fn get(&self, key: &K::Lookup) -> Option<&V> {
        let hash = key.hash_with(&self.engine);
        let index = self.find(hash, key)?;
        // SAFETY: `find` only returns occupied buckets.
        let (_, value) = unsafe { self.buckets[index].assume_init_ref() };
        Some(value)
    }

    fn erase(&mut self, key: &K::Lookup) -> bool {
        let hash = key.hash_with(&self.engine);
        let Some(index) = self.find(hash, key) else {
            return false;
        };
        // SAFETY: `find` only returns occupied buckets; the hole is refilled or emptied below.
        unsafe { self.buckets[index].assume_init_drop() };

        let mask = self.mask();
        let mut hole = index;
        loop {
            let next = (hole + 1) & mask;
            let meta = self.meta[next];
            // Stop at an empty bucket or at an entry already in its home bucket.
            if meta.dib() <= 1 {
                break;
            }
            self.meta[hole] = meta.pulled();
            self.buckets[hole] = std::mem::replace(&mut self.buckets[next], MaybeUninit::uninit());
            hole = next;
        }
        self.meta[hole] = Meta::EMPTY;
        self.len -= 1;
        true
    }

    fn size(&self) -> usize {
        self.len
    }

    fn iterate(&self) -> Self::Cursor<'_> {
        // SAFETY: `buckets[i]` is initialized iff `meta[i]` is occupied.
        unsafe { MetadataCursor::new(&self.buckets, &self.meta) }
    }

    fn bucket_count(&self) -> usize {
        self.meta.len()
    }

    fn memory_footprint(&self) -> usize {
        footprint::<K, V, Self>(self)
    }

    fn raw_hash(&self, key: &K::Lookup) -> u64 {
        key.hash_with(&self.engine)
    }
}

impl<K: TableKey, V, E: HashEngine> NewTable<K, V> for RobinTable<K, V, E> {
    fn create() -> Self {
        Self::new()
    }

    fn with_config(config: &TableConfig) -> Result<Self> {
        Self::try_with_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairtable_core::{SetTable, Val4};
    use fairtable_testing::generate_table_tests;

    generate_table_tests!(RobinTable);

    /// Hashes every key to its own value, so tests control home buckets.
    #[derive(Default, Clone)]
    struct Identity;

    impl HashEngine for Identity {
        fn hash_bytes(&self, bytes: &[u8]) -> u64 {
            bytes.len() as u64
        }
        fn hash_u64(&self, value: u64) -> u64 {
            value
        }
    }

    fn dibs<V>(table: &RobinTable<u64, V, Identity>) -> Vec<u32> {
        table.meta.iter().map(|meta| meta.dib()).collect()
    }

    #[test]
    fn test_erase_shifts_cluster_back() {
        let mut table = RobinTable::<u64, Val4, Identity>::new();
        // Three keys homed at 1 and one homed at 2.
        for key in [1, 9, 17, 2] {
            table.insert(key, Val4::filled(key as u8)).unwrap();
        }
        assert_eq!(dibs(&table), vec![0, 1, 2, 3, 3, 0, 0, 0]);
        assert!(table.erase(&9));
        assert_eq!(dibs(&table), vec![0, 1, 2, 2, 0, 0, 0, 0]);
        for key in [1, 17, 2] {
            assert_eq!(table.get(&key), Some(&Val4::filled(key as u8)), "Key: {key}");
        }
        assert_eq!(table.get(&9), None);
    }

    #[test]
    fn test_lookup_stops_early() {
        let mut table = RobinTable::<u64, (), Identity>::new();
        for key in [1, 2, 3] {
            table.insert_key(key).unwrap();
        }
        // Home 1 is followed by entries at home, so a key homed at 1 cannot be past them.
        assert!(!table.contains(&9));
        assert_eq!(table.max_distance(), 0);
    }

    #[test]
    fn test_distances_stay_bounded_under_churn() {
        let mut table = RobinTable::<u64, ()>::new();
        for key in 0..5000u64 {
            table.insert_key(key).unwrap();
        }
        for key in (0..5000u64).filter(|key| key % 2 == 0) {
            assert!(table.erase(&key));
        }
        for key in 5000..7500u64 {
            table.insert_key(key).unwrap();
        }
        assert_eq!(table.size(), 5000);
        assert!(table.max_distance() < 64, "{}", table.max_distance());
        for key in 0..7500u64 {
            assert_eq!(table.contains(&key), key >= 5000 || key % 2 == 1, "Key: {key}");
        }
    }
}
