//! Approximate resident-footprint accounting.
//!
//! The figure is meant for ranking backends against each other. It counts reserved buckets
//! at the size of one stored entry, the table header itself and, for key kinds that own a
//! heap allocation, each key's allocation. Allocator slack and metadata arrays are ignored.
use fairtable_core::{Table, TableKey};

/// Bytes one reserved bucket accounts for.
pub const fn entry_size<K, V>() -> usize {
    std::mem::size_of::<(K, V)>()
}

/// Computes the footprint of `table` from its bucket count and, if needed, its live keys.
///
/// Runs in `O(bucket_count)` for key kinds that own heap storage and `O(1)` otherwise.
pub fn footprint<'a, K, V, T>(table: &'a T) -> usize
where
    K: TableKey + 'a,
    V: 'a,
    T: Table<K, V>,
{
    let reserved = table.bucket_count() * entry_size::<K, V>() + std::mem::size_of::<T>();
    if !K::OWNS_HEAP {
        return reserved;
    }
    reserved
        + table
            .iterate()
            .map(|(key, _)| key.heap_size())
            .sum::<usize>()
}
