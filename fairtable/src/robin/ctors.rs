//! Implements constructors and rehashing for [`RobinTable`].
use crate::hashing::common::{max_used_for_buckets, num_buckets_for_capacity};
use crate::robin::probe::{apply, plan};
use crate::robin::{Meta, RobinTable};
use crate::utils::alloc::{try_alloc_buckets, try_alloc_metadata};
use fairtable_core::{HashEngine, HashKey, Result, TableConfig, TableError, TableKey};
use std::mem::MaybeUninit;
use tracing::debug;

type Arrays<K, V> = (Box<[Meta]>, Box<[MaybeUninit<(K, V)>]>);

impl<K: TableKey, V, E: HashEngine> RobinTable<K, V, E> {
    /// Creates an empty table that allocates on first insert.
    pub fn new() -> Self {
        Self::with_engine(E::default())
    }

    /// Creates an empty table hashing through `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            meta: Box::new([]),
            buckets: Box::new([]),
            len: 0,
            max_used: 0,
            max_load: Self::DEFAULT_MAX_LOAD,
            engine,
        }
    }

    /// Creates a table sized for `config.initial_capacity` entries.
    ///
    /// # Parameters
    ///
    /// - `config`: Initial capacity and maximum load factor (default `0.8`).
    pub fn try_with_config(config: &TableConfig) -> Result<Self> {
        config.validate()?;
        let mut table = Self::new();
        table.max_load = config.load_factor_or(Self::DEFAULT_MAX_LOAD);
        if config.initial_capacity > 0 {
            let num_buckets =
                num_buckets_for_capacity(config.initial_capacity, table.max_load, Self::MIN_BUCKETS)
                    .ok_or(TableError::CapacityOverflow)?;
            table.resize(num_buckets)?;
        }
        Ok(table)
    }

    /// Bucket count the table grows to when it runs out of room.
    pub(crate) fn next_num_buckets(&self) -> Result<usize> {
        match self.meta.len() {
            0 => Ok(Self::MIN_BUCKETS),
            num_buckets => num_buckets
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow),
        }
    }

    /// Moves every live entry into freshly allocated arrays of at least `num_buckets` buckets.
    ///
    /// Doubles again in the unlikely case that an entry would end up too far from home.
    pub(crate) fn resize(&mut self, mut num_buckets: usize) -> Result<()> {
        debug_assert!(num_buckets.is_power_of_two(), r#""num_buckets" must be a power of two"#);
        debug_assert!(num_buckets > self.len, "Table must fit all entries");

        let (meta, buckets) = loop {
            if let Some(arrays) = self.rehash_into(num_buckets)? {
                break arrays;
            }
            num_buckets = num_buckets
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow)?;
        };

        debug!(
            backend = "robin",
            old_buckets = self.meta.len(),
            new_buckets = num_buckets,
            len = self.len,
            "rehash"
        );

        self.meta = meta;
        self.buckets = buckets;
        self.max_used = max_used_for_buckets(num_buckets, self.max_load);
        Ok(())
    }

    /// Bit-copies every live entry into new arrays, leaving the current ones untouched.
    ///
    /// Returns `Ok(None)` if placement fails. The new arrays are then released without
    /// dropping anything, so the current arrays stay the sole owners of the entries.
    fn rehash_into(&self, num_buckets: usize) -> Result<Option<Arrays<K, V>>> {
        let mut meta = try_alloc_metadata(num_buckets, Meta::EMPTY)?;
        let mut buckets = try_alloc_buckets::<(K, V)>(num_buckets)?;

        for (old_meta, old_bucket) in self.meta.iter().zip(self.buckets.iter()) {
            if *old_meta == Meta::EMPTY {
                continue;
            }
            // SAFETY: occupied buckets are initialized.
            let (key, _) = unsafe { old_bucket.assume_init_ref() };
            let hash = key.as_lookup().hash_with(&self.engine);
            let Some(placement) = plan(&meta, hash) else {
                return Ok(None);
            };
            // SAFETY: the copy stays owned by the old array until the caller commits the new one.
            let entry = unsafe { old_bucket.assume_init_read() };
            apply(&mut meta, &mut buckets, placement, entry);
        }
        Ok(Some((meta, buckets)))
    }
}

impl<K: TableKey, V, E: HashEngine> Default for RobinTable<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairtable_core::{NewTable, Table};

    #[test]
    fn test_create_does_not_allocate() {
        let table = RobinTable::<u16, ()>::create();
        assert_eq!(table.bucket_count(), 0);
        assert_eq!(table.max_distance(), 0);
    }

    #[test]
    fn test_grows_past_load_factor() {
        let mut table = RobinTable::<u64, ()>::create();
        for key in 0..6 {
            table.insert(key, ()).unwrap();
        }
        assert_eq!(table.bucket_count(), 8);
        table.insert(6, ()).unwrap();
        assert_eq!(table.bucket_count(), 16);
        for key in 0..7 {
            assert!(table.get(&key).is_some(), "Key: {key}");
        }
    }

    #[test]
    fn test_with_config_rejects_nan_load() {
        let config = TableConfig::default().with_max_load_factor(f32::NAN);
        assert!(RobinTable::<u64, ()>::with_config(&config).is_err());
    }

    #[test]
    fn test_with_config_uses_load_factor() {
        let config = TableConfig::default()
            .with_initial_capacity(100)
            .with_max_load_factor(0.5);
        let table = RobinTable::<u64, ()>::with_config(&config).unwrap();
        assert_eq!(table.bucket_count(), 256);
    }
}
