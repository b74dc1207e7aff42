//! Implements the table contract for [`SwissTable`].
use crate::memory::footprint;
use crate::swiss::{buckets_for_capacity, SwissCursor, SwissTable};
use fairtable_core::{HashEngine, HashKey, NewTable, Result, Table, TableConfig, TableKey};

impl<K: TableKey, V, E: HashEngine> Table<K, V> for SwissTable<K, V, E> {
    type Cursor<'a>
        = SwissCursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Result<bool> {
        let hash = key.as_lookup().hash_with(&self.engine);
        let lookup = key.as_lookup();
        if let Some((_, stored)) = self.table.find_mut(hash, |(k, _)| k.as_lookup() == lookup) {
            *stored = value;
            return Ok(false);
        }
        self.reserve(1)?;
        let engine = &self.engine;
        self.table
            .insert_unique(hash, (key, value), |(k, _)| k.as_lookup().hash_with(engine));
        Ok(true)
    }

    fn get(&self, key: &K::Lookup) -> Option<&V> {
        let hash = key.hash_with(&self.engine);
        self.table
            .find(hash, |(k, _)| k.as_lookup() == key)
            .map(|(_, value)| value)
    }

    fn erase(&mut self, key: &K::Lookup) -> bool {
        let hash = key.hash_with(&self.engine);
        match self.table.find_entry(hash, |(k, _)| k.as_lookup() == key) {
            Ok(entry) => {
                entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    fn size(&self) -> usize {
        self.table.len()
    }

    fn iterate(&self) -> Self::Cursor<'_> {
        SwissCursor::new(self.table.iter())
    }

    fn bucket_count(&self) -> usize {
        buckets_for_capacity(self.table.capacity())
    }

    fn memory_footprint(&self) -> usize {
        footprint::<K, V, Self>(self)
    }

    fn raw_hash(&self, key: &K::Lookup) -> u64 {
        key.hash_with(&self.engine)
    }
}

impl<K: TableKey, V, E: HashEngine> NewTable<K, V> for SwissTable<K, V, E> {
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
    use fairtable_core::{Cursor, SetTable};
    use fairtable_testing::generate_table_tests;

    generate_table_tests!(SwissTable);

    #[test]
    fn test_cursor_is_exact_size() {
        let mut table = SwissTable::<u32, ()>::create();
        for key in 0..50 {
            table.insert_key(key).unwrap();
        }
        let mut cursor = table.iterate();
        assert_eq!(cursor.len(), 50);
        cursor.advance();
        assert_eq!(cursor.len(), 49);
        assert!(cursor.entry().is_some());
    }

    #[test]
    fn test_empty_cursor() {
        let table = SwissTable::<Box<[u8]>, ()>::create();
        let mut cursor = table.iterate();
        assert!(cursor.is_end());
        assert_eq!(cursor.entry(), None);
        cursor.advance();
        assert!(cursor.is_end());
    }

    #[test]
    fn test_bucket_count_grows_with_entries() {
        let mut table = SwissTable::<u64, ()>::create();
        assert_eq!(table.bucket_count(), 0);
        table.insert_key(1).unwrap();
        let first = table.bucket_count();
        assert!(first.is_power_of_two());
        for key in 2..=1000 {
            table.insert_key(key).unwrap();
        }
        assert!(table.bucket_count() >= 1000 * 8 / 7);
        assert!(table.bucket_count().is_power_of_two());
    }
}
