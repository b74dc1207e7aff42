//! A table whose backend is chosen at runtime.
use crate::cursor::MetadataCursor;
use crate::hashing::hashers::FairHasher;
use crate::robin::{Meta, RobinTable};
use crate::swiss::{SwissCursor, SwissTable};
use crate::tomb::{Ctrl, TombTable};
use fairtable_core::{Cursor, HashEngine, Result, Table, TableConfig, TableError, TableKey};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The table backends.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Backend {
    Swiss,
    Tomb,
    Robin,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Swiss, Backend::Tomb, Backend::Robin];

    /// Name used in variant names.
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Swiss => "swiss",
            Backend::Tomb => "tomb",
            Backend::Robin => "robin",
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = TableError;

    fn from_str(name: &str) -> Result<Self> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.name() == name)
            .ok_or_else(|| TableError::UnknownVariant(name.to_owned()))
    }
}

/// One of the backends behind a single type.
///
/// Every method forwards to the wrapped table, so behavior is exactly the backend's.
#[derive(Debug)]
pub enum AnyTable<K, V, E = FairHasher> {
    Swiss(SwissTable<K, V, E>),
    Tomb(TombTable<K, V, E>),
    Robin(RobinTable<K, V, E>),
}

macro_rules! dispatch {
    ($value:expr, $Enum:ident, $inner:ident => $body:expr) => {
        match $value {
            $Enum::Swiss($inner) => $body,
            $Enum::Tomb($inner) => $body,
            $Enum::Robin($inner) => $body,
        }
    };
}

impl<K: TableKey, V, E: HashEngine> AnyTable<K, V, E> {
    /// Creates an empty table of `backend`. Never allocates.
    pub fn create(backend: Backend) -> Self {
        match backend {
            Backend::Swiss => AnyTable::Swiss(SwissTable::new()),
            Backend::Tomb => AnyTable::Tomb(TombTable::new()),
            Backend::Robin => AnyTable::Robin(RobinTable::new()),
        }
    }

    /// Creates a table of `backend` pre-sized according to `config`.
    pub fn with_config(backend: Backend, config: &TableConfig) -> Result<Self> {
        Ok(match backend {
            Backend::Swiss => AnyTable::Swiss(SwissTable::try_with_config(config)?),
            Backend::Tomb => AnyTable::Tomb(TombTable::try_with_config(config)?),
            Backend::Robin => AnyTable::Robin(RobinTable::try_with_config(config)?),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            AnyTable::Swiss(_) => Backend::Swiss,
            AnyTable::Tomb(_) => Backend::Tomb,
            AnyTable::Robin(_) => Backend::Robin,
        }
    }
}

/// Cursor over an [`AnyTable`].
#[derive(Debug)]
pub enum AnyCursor<'a, K, V> {
    Swiss(SwissCursor<'a, K, V>),
    Tomb(MetadataCursor<'a, Ctrl, K, V>),
    Robin(MetadataCursor<'a, Meta, K, V>),
}

impl<'a, K, V> Cursor<'a, K, V> for AnyCursor<'a, K, V> {
    fn is_end(&self) -> bool {
        dispatch!(self, AnyCursor, cursor => cursor.is_end())
    }

    fn entry(&self) -> Option<(&'a K, &'a V)> {
        dispatch!(self, AnyCursor, cursor => cursor.entry())
    }

    fn advance(&mut self) {
        dispatch!(self, AnyCursor, cursor => cursor.advance())
    }
}

impl<'a, K, V> Iterator for AnyCursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        dispatch!(self, AnyCursor, cursor => cursor.next())
    }
}

impl<K: TableKey, V, E: HashEngine> Table<K, V> for AnyTable<K, V, E> {
    type Cursor<'a>
        = AnyCursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> Result<bool> {
        dispatch!(self, AnyTable, table => table.insert(key, value))
    }

    fn get(&self, key: &K::Lookup) -> Option<&V> {
        dispatch!(self, AnyTable, table => table.get(key))
    }

    fn erase(&mut self, key: &K::Lookup) -> bool {
        dispatch!(self, AnyTable, table => table.erase(key))
    }

    fn size(&self) -> usize {
        dispatch!(self, AnyTable, table => table.size())
    }

    fn iterate(&self) -> Self::Cursor<'_> {
        match self {
            AnyTable::Swiss(table) => AnyCursor::Swiss(table.iterate()),
            AnyTable::Tomb(table) => AnyCursor::Tomb(table.iterate()),
            AnyTable::Robin(table) => AnyCursor::Robin(table.iterate()),
        }
    }

    fn bucket_count(&self) -> usize {
        dispatch!(self, AnyTable, table => table.bucket_count())
    }

    fn memory_footprint(&self) -> usize {
        dispatch!(self, AnyTable, table => table.memory_footprint())
    }

    fn raw_hash(&self, key: &K::Lookup) -> u64 {
        dispatch!(self, AnyTable, table => table.raw_hash(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairtable_core::{SetTable, Val56};
    use fairtable_testing::{seeded_entries, table_hash_equivalence};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_backend_names_round_trip() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>(), Ok(backend));
            assert_eq!(backend.to_string(), backend.name());
        }
        assert_eq!(
            "hopscotch".parse::<Backend>(),
            Err(TableError::UnknownVariant("hopscotch".to_owned()))
        );
    }

    #[test]
    fn test_scenario_on_every_backend() {
        for backend in Backend::ALL {
            let mut table = AnyTable::<u64, Val56>::create(backend);
            assert_eq!(table.backend(), backend);
            assert!(table.insert(1, Val56::filled(b'A')).unwrap());
            assert!(table.insert(2, Val56::filled(b'B')).unwrap());
            assert!(!table.insert(1, Val56::filled(b'C')).unwrap());
            assert_eq!(table.size(), 2);
            assert_eq!(table.get(&1), Some(&Val56::filled(b'C')));
            assert!(table.erase(&2));
            assert_eq!(table.size(), 1);
            let entries: Vec<_> = table.iterate().collect();
            assert_eq!(entries, vec![(&1, &Val56::filled(b'C'))], "{backend}");
            table.destroy();
        }
    }

    #[test]
    fn test_backends_agree_on_contents() {
        let data = seeded_entries::<Box<[u8]>, ()>(2000);
        let mut tables: Vec<_> = Backend::ALL
            .into_iter()
            .map(AnyTable::<&[u8], ()>::create)
            .collect();
        for table in &mut tables {
            for (key, _) in &data {
                table.insert_key(&key[..]).unwrap();
            }
            for (key, _) in data.iter().step_by(4) {
                assert!(table.erase(key));
            }
        }
        for (i, (key, _)) in data.iter().enumerate() {
            for table in &tables {
                assert_eq!(table.contains(key), i % 4 != 0, "{}", table.backend());
            }
        }
        for table in &tables {
            assert_eq!(table.size(), 1500);
            assert_eq!(table.iterate().count(), 1500);
        }
    }

    #[test]
    fn test_backends_place_by_the_same_hash() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        table_hash_equivalence!(
            SwissTable<u64, ()>,
            TombTable<u64, ()>,
            u64,
            (),
            &mut rng,
            |rng: &mut ChaCha8Rng| rng.next_u64(),
            10_000
        );
        table_hash_equivalence!(
            TombTable<Box<[u8]>, ()>,
            RobinTable<Box<[u8]>, ()>,
            Box<[u8]>,
            (),
            &mut rng,
            |rng: &mut ChaCha8Rng| {
                let mut bytes = vec![0; (rng.next_u32() % 100) as usize];
                rng.fill_bytes(&mut bytes);
                bytes.into_boxed_slice()
            },
            10_000
        );
    }

    #[test]
    fn test_with_config_failure_is_reported() {
        let config = TableConfig::default().with_initial_capacity(usize::MAX / 2);
        for backend in Backend::ALL {
            assert!(AnyTable::<u64, ()>::with_config(backend, &config).is_err());
        }
    }
}
