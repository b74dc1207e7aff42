//! [`fairtable_core::HashEngine`] implementations.
//!
//! # Notes
//!
//! - [`FairHasher`] is the default for every backend and the only engine whose output is
//!   fixed across releases.
//! - `Xxh3Hasher` (behind the `xxh3` feature) trades that guarantee for a widely deployed hash,
//!   for runs that compare against tables using XXH3 natively.
mod fair;
pub use fair::*;
#[cfg(feature = "xxh3")]
mod xxh3;
#[cfg(feature = "xxh3")]
pub use xxh3::*;
