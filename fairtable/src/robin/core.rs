//! Declares core types for [`RobinTable`].
use crate::cursor::Metadata;
use crate::hashing::common::extract_bits_64;
use crate::hashing::hashers::FairHasher;
use std::fmt::{Debug, Formatter};
use std::mem::MaybeUninit;

/// Metadata word of one bucket.
///
/// The high 24 bits hold the distance from the home bucket plus one, the low 8 bits a
/// fingerprint taken from the top of the hash. Zero marks an empty bucket.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Meta(pub(crate) u32);

impl Meta {
    pub const EMPTY: Meta = Meta(0);

    /// Largest representable distance plus one.
    pub const MAX_DIB: u32 = (1 << 24) - 1;

    /// Builds the metadata of an entry `dib - 1` buckets away from home.
    #[inline]
    pub const fn new(dib: u32, fingerprint: u8) -> Meta {
        debug_assert!(dib >= 1 && dib <= Self::MAX_DIB);
        Meta(dib << 8 | fingerprint as u32)
    }

    #[inline]
    pub const fn fingerprint_of(hash: u64) -> u8 {
        extract_bits_64::<{ u64::BITS }>(hash, 8) as u8
    }

    /// Distance from home plus one, `0` for an empty bucket.
    #[inline]
    pub const fn dib(self) -> u32 {
        self.0 >> 8
    }

    #[inline]
    pub const fn fingerprint(self) -> u8 {
        self.0 as u8
    }

    /// The same entry moved one bucket further from home.
    #[inline]
    pub(crate) const fn pushed(self) -> Meta {
        Meta(self.0 + (1 << 8))
    }

    /// The same entry moved one bucket closer to home.
    #[inline]
    pub(crate) const fn pulled(self) -> Meta {
        Meta(self.0 - (1 << 8))
    }
}

impl Metadata for Meta {
    #[inline]
    fn is_occupied(self) -> bool {
        self.0 != 0
    }
}

/// Hash table with robin-hood linear probing.
///
/// # Guarantees
///
/// - Once storage is allocated at least one bucket is empty.
/// - `buckets[i]` is initialized iff `meta[i]` is not [`Meta::EMPTY`].
/// - Along any run of occupied buckets an entry's distance exceeds its predecessor's by at
///   most one.
///
/// # Examples
///
/// ```rust
/// use fairtable::robin::RobinTable;
/// use fairtable_core::{NewTable, SetTable, Table};
///
/// let mut table = RobinTable::<u32, ()>::create();
/// assert!(table.insert_key(7).unwrap());
/// assert!(!table.insert_key(7).unwrap());
/// assert!(table.contains(&7));
/// assert_eq!(table.size(), 1);
/// ```
pub struct RobinTable<K, V, E = FairHasher> {
    pub(crate) meta: Box<[Meta]>,
    pub(crate) buckets: Box<[MaybeUninit<(K, V)>]>,
    pub(crate) len: usize,
    pub(crate) max_used: usize,
    pub(crate) max_load: f32,
    pub(crate) engine: E,
}

impl<K, V, E> RobinTable<K, V, E> {
    pub const MIN_BUCKETS: usize = 8;
    pub const DEFAULT_MAX_LOAD: f32 = 0.8;

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.meta.len().wrapping_sub(1)
    }

    /// Longest distance from home over all live entries.
    pub fn max_distance(&self) -> usize {
        self.meta
            .iter()
            .map(|meta| meta.dib().saturating_sub(1) as usize)
            .max()
            .unwrap_or(0)
    }
}

impl<K, V, E> Debug for RobinTable<K, V, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobinTable")
            .field("len", &self.len)
            .field("num_buckets", &self.meta.len())
            .field("max_load", &self.max_load)
            .finish()
    }
}
