//! Declares core types for [`TombTable`].
use crate::cursor::Metadata;
use crate::hashing::common::extract_bits_64;
use crate::hashing::hashers::FairHasher;
use std::fmt::{Debug, Formatter};
use std::mem::MaybeUninit;

/// Control byte of one bucket.
///
/// Full buckets store the top 7 bits of the key's hash, so the high bit tells full buckets
/// apart from [`Ctrl::EMPTY`] and [`Ctrl::DELETED`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ctrl(pub(crate) u8);

impl Ctrl {
    pub const EMPTY: Ctrl = Ctrl(0xff);
    pub const DELETED: Ctrl = Ctrl(0x80);

    #[inline]
    pub const fn full(hash: u64) -> Ctrl {
        Ctrl(extract_bits_64::<{ u64::BITS }>(hash, 7) as u8)
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        self.0 & 0x80 == 0
    }
}

impl Metadata for Ctrl {
    #[inline]
    fn is_occupied(self) -> bool {
        self.is_full()
    }
}

/// Hash table with linear probing and tombstone deletion.
///
/// # Guarantees
///
/// - At least one bucket is always [`Ctrl::EMPTY`] once storage is allocated, so every probe
///   terminates.
/// - `buckets[i]` is initialized iff `ctrl[i]` is full.
///
/// # Examples
///
/// ```rust
/// use fairtable::tomb::TombTable;
/// use fairtable_core::{NewTable, Table, Val4};
///
/// let mut table = TombTable::<u64, Val4>::create();
/// assert!(table.insert(1, Val4::filled(b'A')).unwrap());
/// assert_eq!(table.get(&1), Some(&Val4::filled(b'A')));
/// assert!(table.erase(&1));
/// assert_eq!(table.size(), 0);
/// ```
pub struct TombTable<K, V, E = FairHasher> {
    pub(crate) ctrl: Box<[Ctrl]>,
    pub(crate) buckets: Box<[MaybeUninit<(K, V)>]>,
    pub(crate) len: usize,
    pub(crate) tombstones: usize,
    /// Full plus deleted buckets allowed before the next insert must rehash.
    pub(crate) max_used: usize,
    pub(crate) max_load: f32,
    pub(crate) engine: E,
}

impl<K, V, E> TombTable<K, V, E> {
    pub const MIN_BUCKETS: usize = 8;
    pub const DEFAULT_MAX_LOAD: f32 = 0.875;

    /// Number of tombstones currently occupying buckets.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.ctrl.len().wrapping_sub(1)
    }
}

impl<K, V, E> Debug for TombTable<K, V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TombTable")
            .field("len", &self.len)
            .field("tombstones", &self.tombstones)
            .field("num_buckets", &self.ctrl.len())
            .field("max_load", &self.max_load)
            .finish()
    }
}
