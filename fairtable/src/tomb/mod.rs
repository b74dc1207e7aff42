//! Open addressing with linear probing and one control byte per bucket.
//!
//! Erased entries leave a tombstone behind so that probe sequences running through the bucket
//! stay intact. Tombstones are reclaimed by inserts landing on them and by rehashing.
mod core;
pub use core::*;
mod ctors;
mod drop;
mod table;
