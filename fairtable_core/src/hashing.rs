//! The hashing seam between keys and backends.

/// A deterministic 64-bit hash function shared by all backends of a comparison run.
///
/// Differs from [`core::hash::Hasher`] in the way that it is not a streaming interface: every
/// key is hashed in a single call, either as one byte span or as one integer. This keeps the
/// exact sequence of mixing steps identical no matter which backend asks for the hash, which
/// is what makes bucket distributions comparable across backends.
pub trait HashEngine: Default + Clone {
    /// Hash an arbitrary byte span, including the empty one.
    fn hash_bytes(&self, bytes: &[u8]) -> u64;

    /// Hash an integer key widened to 64 bits.
    fn hash_u64(&self, value: u64) -> u64;
}
