//! The table capability contract.
use crate::config::TableConfig;
use crate::error::Result;
use crate::key::TableKey;

/// A forward-only traversal position over the live entries of one table.
///
/// Obtained from [`Table::iterate`], positioned at the first live entry. The cursor borrows
/// the table, so no insert or erase can happen while it is alive. Order is backend-internal.
pub trait Cursor<'a, K: 'a, V: 'a>: Iterator<Item = (&'a K, &'a V)> {
    /// Whether the cursor has moved past the last occupied bucket.
    fn is_end(&self) -> bool;

    /// The entry under the cursor, `None` once the end is reached.
    fn entry(&self) -> Option<(&'a K, &'a V)>;

    /// Moves to the next occupied bucket. Advancing an end cursor is a no-op.
    fn advance(&mut self);
}

/// A mutable hash table with a uniform contract across backends.
pub trait Table<K: TableKey, V> {
    type Cursor<'a>: Cursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Inserts `key` if absent or overwrites its value if present.
    ///
    /// Returns `true` only when the key was newly added. On error the table is unchanged.
    fn insert(&mut self, key: K, value: V) -> Result<bool>;

    /// Get the value associated with the given `key`.
    fn get(&self, key: &K::Lookup) -> Option<&V>;

    /// Removes `key`, returning whether it was present.
    fn erase(&mut self, key: &K::Lookup) -> bool;

    /// Get the number of distinct keys in the table.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Starts a fresh traversal.
    fn iterate(&self) -> Self::Cursor<'_>;

    /// Number of buckets currently reserved.
    fn bucket_count(&self) -> usize;

    /// Approximate resident footprint in bytes.
    ///
    /// `bucket_count * size_of::<(K, V)>() + size_of::<Self>()` plus the heap size of every
    /// stored key for key kinds that own heap storage. Metadata arrays are not counted.
    fn memory_footprint(&self) -> usize;

    /// The exact hash value the backend places `key` by.
    fn raw_hash(&self, key: &K::Lookup) -> u64;

    /// Releases all storage.
    fn destroy(self)
    where
        Self: Sized,
    {
    }
}

/// Construction of a specific backend.
pub trait NewTable<K: TableKey, V>: Table<K, V> + Sized {
    /// Creates an empty table. Never allocates.
    fn create() -> Self;

    /// Creates a table pre-sized according to `config`.
    fn with_config(config: &TableConfig) -> Result<Self>;
}

/// Set-mode conveniences for value-less tables.
pub trait SetTable<K: TableKey>: Table<K, ()> {
    fn insert_key(&mut self, key: K) -> Result<bool> {
        self.insert(key, ())
    }

    fn contains(&self, key: &K::Lookup) -> bool {
        self.get(key).is_some()
    }
}

impl<K: TableKey, T: Table<K, ()>> SetTable<K> for T {}
