//! Implements constructors and rehashing for [`TombTable`].
use crate::hashing::common::{home_bucket, max_used_for_buckets, num_buckets_for_capacity};
use crate::tomb::{Ctrl, TombTable};
use crate::utils::alloc::{try_alloc_buckets, try_alloc_metadata};
use fairtable_core::{HashEngine, HashKey, Result, TableConfig, TableError, TableKey};
use tracing::debug;

impl<K: TableKey, V, E: HashEngine> TombTable<K, V, E> {
    /// Creates an empty table that allocates on first insert.
    pub fn new() -> Self {
        Self::with_engine(E::default())
    }

    /// Creates an empty table hashing through `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            ctrl: Box::new([]),
            buckets: Box::new([]),
            len: 0,
            tombstones: 0,
            max_used: 0,
            max_load: Self::DEFAULT_MAX_LOAD,
            engine,
        }
    }

    /// Creates a table sized for `config.initial_capacity` entries.
    ///
    /// # Parameters
    ///
    /// - `config`: Initial capacity and maximum load factor (default `0.875`).
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

    /// Makes room for one more entry.
    ///
    /// Rehashes in place when at least half of the used buckets are tombstones, doubles the
    /// bucket count otherwise.
    pub(crate) fn grow(&mut self) -> Result<()> {
        let num_buckets = self.ctrl.len();
        let new_num_buckets = if num_buckets == 0 {
            Self::MIN_BUCKETS
        } else if self.tombstones >= (self.len + self.tombstones) / 2 {
            num_buckets
        } else {
            num_buckets
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow)?
        };
        self.resize(new_num_buckets)
    }

    /// Moves every live entry into freshly allocated arrays of `num_buckets` buckets.
    ///
    /// Entries are bit-copied and the old arrays are released without dropping their
    /// contents, so a failure before the swap leaves the table untouched.
    pub(crate) fn resize(&mut self, num_buckets: usize) -> Result<()> {
        debug_assert!(num_buckets.is_power_of_two(), r#""num_buckets" must be a power of two"#);
        debug_assert!(num_buckets > self.len, "Table must fit all entries");

        let mut ctrl = try_alloc_metadata(num_buckets, Ctrl::EMPTY)?;
        let mut buckets = try_alloc_buckets::<(K, V)>(num_buckets)?;
        let mask = num_buckets - 1;

        for (old_ctrl, old_bucket) in self.ctrl.iter().zip(self.buckets.iter()) {
            if !old_ctrl.is_full() {
                continue;
            }
            // SAFETY: full buckets are initialized.
            let (key, _) = unsafe { old_bucket.assume_init_ref() };
            let hash = key.as_lookup().hash_with(&self.engine);
            let mut index = home_bucket(hash, mask);
            while ctrl[index] != Ctrl::EMPTY {
                index = (index + 1) & mask;
            }
            ctrl[index] = Ctrl::full(hash);
            // SAFETY: the old array is dropped below without running destructors, so the
            // entry ends up owned exactly once.
            buckets[index].write(unsafe { old_bucket.assume_init_read() });
        }

        debug!(
            backend = "tomb",
            old_buckets = self.ctrl.len(),
            new_buckets = num_buckets,
            len = self.len,
            tombstones_dropped = self.tombstones,
            "rehash"
        );

        self.ctrl = ctrl;
        self.buckets = buckets;
        self.tombstones = 0;
        self.max_used = max_used_for_buckets(num_buckets, self.max_load);
        Ok(())
    }
}

impl<K: TableKey, V, E: HashEngine> Default for TombTable<K, V, E> {
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
        let table = TombTable::<u64, ()>::create();
        assert_eq!(table.bucket_count(), 0);
        assert_eq!(table.size(), 0);
    }

    #[test]
    fn test_with_config_presizes() {
        let config = TableConfig::default().with_initial_capacity(1000);
        let mut table = TombTable::<u32, ()>::with_config(&config).unwrap();
        let num_buckets = table.bucket_count();
        assert!(num_buckets >= 1000);
        for key in 0..1000 {
            table.insert(key, ()).unwrap();
        }
        assert_eq!(table.bucket_count(), num_buckets, "No growth expected");
    }

    #[test]
    fn test_with_config_rejects_bad_load() {
        let config = TableConfig::default().with_max_load_factor(1.0);
        assert!(matches!(
            TombTable::<u32, ()>::with_config(&config),
            Err(TableError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tombstone_heavy_table_rehashes_in_place() {
        let mut table = TombTable::<u64, ()>::create();
        for key in 0..14 {
            table.insert(key, ()).unwrap();
        }
        let num_buckets = table.bucket_count();
        assert_eq!(num_buckets, 16);
        for key in 0..10 {
            assert!(table.erase(&key));
        }
        // Churn keeps the live count low while tombstones pile up.
        for key in 100..400 {
            table.insert(key, ()).unwrap();
            assert!(table.erase(&key));
        }
        assert_eq!(table.size(), 4);
        assert_eq!(table.bucket_count(), num_buckets);
    }

    #[test]
    fn test_lower_load_factor_reserves_more_buckets() {
        let dense = TableConfig::default().with_initial_capacity(100);
        let sparse = dense.with_max_load_factor(0.25);
        let dense = TombTable::<u64, ()>::with_config(&dense).unwrap();
        let sparse = TombTable::<u64, ()>::with_config(&sparse).unwrap();
        assert!(sparse.bucket_count() > dense.bucket_count());
    }
}
