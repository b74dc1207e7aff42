//! Declares [`SwissTable`] and its constructors.
use crate::hashing::hashers::FairHasher;
use fairtable_core::{HashEngine, HashKey, Result, TableConfig, TableError, TableKey};
use hashbrown::{HashTable, TryReserveError};
use std::fmt::{Debug, Formatter};
use tracing::{debug, warn};

/// Hash table backed by hashbrown's SwissTable implementation.
///
/// The maximum load factor is hashbrown's fixed `7/8`, so [`TableConfig::max_load_factor`]
/// is validated but otherwise ignored.
pub struct SwissTable<K, V, E = FairHasher> {
    pub(crate) table: HashTable<(K, V)>,
    pub(crate) engine: E,
}

/// Bucket count hashbrown keeps behind a usable `capacity`.
pub const fn buckets_for_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        0
    } else if capacity < 8 {
        capacity + 1
    } else {
        (capacity * 8 / 7).next_power_of_two()
    }
}

impl<K: TableKey, V, E: HashEngine> SwissTable<K, V, E> {
    /// Creates an empty table that allocates on first insert.
    pub fn new() -> Self {
        Self::with_engine(E::default())
    }

    pub fn with_engine(engine: E) -> Self {
        Self {
            table: HashTable::new(),
            engine,
        }
    }

    /// Creates a table with room for `config.initial_capacity` entries.
    pub fn try_with_config(config: &TableConfig) -> Result<Self> {
        config.validate()?;
        let mut table = Self::new();
        if config.initial_capacity > 0 {
            table.reserve(config.initial_capacity)?;
        }
        Ok(table)
    }

    /// Makes room for `additional` more entries, reporting allocation failure as an error.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        let old_buckets = buckets_for_capacity(self.table.capacity());
        let requested = self.table.len().saturating_add(additional);
        let engine = &self.engine;
        self.table
            .try_reserve(additional, |(key, _)| key.as_lookup().hash_with(engine))
            .map_err(|err| match err {
                TryReserveError::CapacityOverflow => TableError::CapacityOverflow,
                TryReserveError::AllocError { layout } => {
                    warn!(backend = "swiss", bytes = layout.size(), "bucket allocation failed");
                    TableError::AllocationFailed {
                        buckets: buckets_for_capacity(requested),
                    }
                }
            })?;

        let new_buckets = buckets_for_capacity(self.table.capacity());
        if new_buckets != old_buckets {
            debug!(
                backend = "swiss",
                old_buckets,
                new_buckets,
                len = self.table.len(),
                "rehash"
            );
        }
        Ok(())
    }
}

impl<K: TableKey, V, E: HashEngine> Default for SwissTable<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> Debug for SwissTable<K, V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwissTable")
            .field("len", &self.table.len())
            .field("capacity", &self.table.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashTable;

    #[test]
    fn test_buckets_for_capacity_matches_hashbrown() {
        for requested in [0, 1, 3, 7, 8, 14, 15, 28, 100, 1000, 5000] {
            let table = HashTable::<u64>::with_capacity(requested);
            let num_buckets = buckets_for_capacity(table.capacity());
            assert!(num_buckets == 0 || num_buckets.is_power_of_two(), "{requested}");
            assert!(num_buckets > table.capacity() || num_buckets == 0, "{requested}");
        }
        assert_eq!(buckets_for_capacity(3), 4);
        assert_eq!(buckets_for_capacity(7), 8);
        assert_eq!(buckets_for_capacity(14), 16);
        assert_eq!(buckets_for_capacity(896), 1024);
    }

    #[test]
    fn test_config_load_factor_is_validated() {
        let config = TableConfig::default().with_max_load_factor(0.0);
        assert!(SwissTable::<u64, ()>::try_with_config(&config).is_err());
        let config = TableConfig::default().with_max_load_factor(0.5);
        assert!(SwissTable::<u64, ()>::try_with_config(&config).is_ok());
    }
}
