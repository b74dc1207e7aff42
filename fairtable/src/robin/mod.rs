//! Robin-hood open addressing with backward-shift deletion.
//!
//! Every bucket carries a metadata word holding the distance from the entry's home bucket and
//! a fingerprint of its hash. Inserts displace entries that sit closer to their home than the
//! incoming one, so lookups stop as soon as they meet an entry that is closer to home than
//! the probed key would be. Erasing shifts the following cluster back by one, leaving no
//! tombstones.
mod core;
pub use core::*;
mod ctors;
mod drop;
mod probe;
mod table;
