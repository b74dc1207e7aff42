//! SIMD-group probing on top of [`hashbrown::HashTable`].
//!
//! The raw table stores `(K, V)` tuples and never hashes on its own: every operation passes
//! in the hash computed by the table's [`fairtable_core::HashEngine`], so placement depends
//! on exactly the same 64-bit values as in the in-house backends.
mod core;
pub use core::*;
mod cursor;
pub use cursor::*;
mod table;
