//! Implements the table contract for [`TombTable`].
use crate::cursor::MetadataCursor;
use crate::hashing::common::home_bucket;
use crate::memory::footprint;
use crate::tomb::{Ctrl, TombTable};
use fairtable_core::{HashEngine, HashKey, NewTable, Result, Table, TableConfig, TableKey};

impl<K: TableKey, V, E: HashEngine> TombTable<K, V, E> {
    /// Finds the bucket holding `key`.
    fn find(&self, hash: u64, key: &K::Lookup) -> Option<usize> {
        if self.ctrl.is_empty() {
            return None;
        }
        let mask = self.mask();
        let tag = Ctrl::full(hash);
        let mut index = home_bucket(hash, mask);
        for _ in 0..=mask {
            let ctrl = self.ctrl[index];
            if ctrl == Ctrl::EMPTY {
                return None;
            }
            if ctrl == tag {
                // SAFETY: full buckets are initialized.
                let (stored, _) = unsafe { self.buckets[index].assume_init_ref() };
                if stored.as_lookup() == key {
                    return Some(index);
                }
            }
            index = (index + 1) & mask;
        }
        None
    }

    /// First empty or deleted bucket on the probe sequence of `hash`.
    fn find_insert_slot(&self, hash: u64) -> usize {
        let mask = self.mask();
        let mut index = home_bucket(hash, mask);
        while self.ctrl[index].is_full() {
            index = (index + 1) & mask;
        }
        index
    }
}

impl<K: TableKey, V, E: HashEngine> Table<K, V> for TombTable<K, V, E> {
    type Cursor<'a>
        = MetadataCursor<'a, Ctrl, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Result<bool> {
        let hash = key.as_lookup().hash_with(&self.engine);
        if let Some(index) = self.find(hash, key.as_lookup()) {
            // SAFETY: `find` only returns full buckets.
            unsafe { self.buckets[index].assume_init_mut() }.1 = value;
            return Ok(false);
        }

        if self.len + self.tombstones >= self.max_used {
            self.grow()?;
        }

        let index = self.find_insert_slot(hash);
        if self.ctrl[index] == Ctrl::DELETED {
            self.tombstones -= 1;
        }
        self.ctrl[index] = Ctrl::full(hash);
        self.buckets[index].write((key, value));
        self.len += 1;
        Ok(true)
    }

    fn get(&self, key: &K::Lookup) -> Option<&V> {
        let hash = key.hash_with(&self.engine);
        let index = self.find(hash, key)?;
        // SAFETY: `find` only returns full buckets.
        let (_, value) = unsafe { self.buckets[index].assume_init_ref() };
        Some(value)
    }

    fn erase(&mut self, key: &K::Lookup) -> bool {
        let hash = key.hash_with(&self.engine);
        let Some(index) = self.find(hash, key) else {
            return false;
        };
        // SAFETY: `find` only returns full buckets; the control byte is cleared right after.
        unsafe { self.buckets[index].assume_init_drop() };

        // No probe sequence can pass through `index` if the next bucket terminates it.
        let mask = self.mask();
        if self.ctrl[(index + 1) & mask] == Ctrl::EMPTY {
            self.ctrl[index] = Ctrl::EMPTY;
        } else {
            self.ctrl[index] = Ctrl::DELETED;
            self.tombstones += 1;
        }
        self.len -= 1;
        true
    }

    fn size(&self) -> usize {
        self.len
    }

    fn iterate(&self) -> Self::Cursor<'_> {
        // SAFETY: `buckets[i]` is initialized iff `ctrl[i]` is full.
        unsafe { MetadataCursor::new(&self.buckets, &self.ctrl) }
    }

    fn bucket_count(&self) -> usize {
        self.ctrl.len()
    }

    fn memory_footprint(&self) -> usize {
        footprint::<K, V, Self>(self)
    }

    fn raw_hash(&self, key: &K::Lookup) -> u64 {
        key.hash_with(&self.engine)
    }
}

impl<K: TableKey, V, E: HashEngine> NewTable<K, V> for TombTable<K, V, E> {
    fn create() -> Self {
        Self::new()
    }

    fn with_config(config: &TableConfig) -> Result<Self> {
        Self::try_with_config(config)
    }
}
