//! Hashing: the fair engine and the [`fairtable_core::HashEngine`] implementations built on it.
pub mod common;
pub mod engine;
pub mod hashers;

pub use engine::{hash_bytes, hash_bytes_seeded, hash_u64};
