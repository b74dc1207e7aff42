//! Key kinds accepted by tables.
//!
//! A key kind has an owned form stored in the table and a borrowed lookup form used by
//! `get`/`erase`. Integers are their own lookup form, both byte-span kinds look up by `[u8]`.
use crate::error::{Result, TableError};
use crate::hashing::HashEngine;

/// Lookup form of a key: something that can be compared and hashed.
pub trait HashKey: Eq {
    fn hash_with<E: HashEngine>(&self, engine: &E) -> u64;
}

/// A key kind that can be stored in a table.
pub trait TableKey: Sized {
    type Lookup: HashKey + ?Sized;

    /// Whether stored keys hold a heap allocation that memory accounting must add.
    const OWNS_HEAP: bool;

    fn as_lookup(&self) -> &Self::Lookup;

    /// Size of the key's own heap allocation in bytes.
    fn heap_size(&self) -> usize;
}

/// A key kind that can be decoded from and encoded into bytes at the dynamic boundary.
///
/// Integers travel as little-endian bytes of their exact width, byte-span keys as themselves.
pub trait ByteKey<'k>: TableKey {
    /// Exact encoded width, `None` for byte spans of any length.
    const WIDTH: Option<usize>;

    fn from_key_bytes(bytes: &'k [u8]) -> Result<Self>;

    /// Decodes `bytes` into a lookup form without allocating and passes it to `f`.
    fn with_lookup<R>(bytes: &[u8], f: impl FnOnce(&Self::Lookup) -> R) -> Result<R>;

    fn with_key_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R;
}

macro_rules! impl_int_key {
    ($($int_type:ty),*) => {
        $(
            impl HashKey for $int_type {
                #[inline]
                fn hash_with<E: HashEngine>(&self, engine: &E) -> u64 {
                    engine.hash_u64(*self as u64)
                }
            }

            impl TableKey for $int_type {
                type Lookup = $int_type;

                const OWNS_HEAP: bool = false;

                #[inline]
                fn as_lookup(&self) -> &Self::Lookup {
                    self
                }

                fn heap_size(&self) -> usize {
                    0
                }
            }

            impl<'k> ByteKey<'k> for $int_type {
                const WIDTH: Option<usize> = Some(std::mem::size_of::<$int_type>());

                fn from_key_bytes(bytes: &'k [u8]) -> Result<Self> {
                    let array = bytes.try_into().map_err(|_| TableError::KeyWidth {
                        expected: std::mem::size_of::<$int_type>(),
                        actual: bytes.len(),
                    })?;
                    Ok(<$int_type>::from_le_bytes(array))
                }

                fn with_lookup<R>(bytes: &[u8], f: impl FnOnce(&Self::Lookup) -> R) -> Result<R> {
                    let key = <$int_type as ByteKey<'_>>::from_key_bytes(bytes)?;
                    Ok(f(&key))
                }

                fn with_key_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
                    f(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_int_key!(u16, u32, u64);

impl HashKey for [u8] {
    #[inline]
    fn hash_with<E: HashEngine>(&self, engine: &E) -> u64 {
        engine.hash_bytes(self)
    }
}

/// Owning byte-span key: bytes are copied into the table on insert.
impl TableKey for Box<[u8]> {
    type Lookup = [u8];

    const OWNS_HEAP: bool = true;

    #[inline]
    fn as_lookup(&self) -> &[u8] {
        self
    }

    fn heap_size(&self) -> usize {
        self.len()
    }
}

impl<'k> ByteKey<'k> for Box<[u8]> {
    const WIDTH: Option<usize> = None;

    fn from_key_bytes(bytes: &'k [u8]) -> Result<Self> {
        Ok(bytes.into())
    }

    fn with_lookup<R>(bytes: &[u8], f: impl FnOnce(&Self::Lookup) -> R) -> Result<R> {
        Ok(f(bytes))
    }

    fn with_key_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self)
    }
}

/// Borrowing byte-span key: the table holds on to the caller's buffer for `'k`.
///
/// This is the allocation-free mode used for fair comparisons. The lifetime makes the caller's
/// obligation (keep the buffer alive and unchanged) a compile-time check.
impl<'k> TableKey for &'k [u8] {
    type Lookup = [u8];

    const OWNS_HEAP: bool = false;

    #[inline]
    fn as_lookup(&self) -> &[u8] {
        self
    }

    fn heap_size(&self) -> usize {
        0
    }
}

impl<'k> ByteKey<'k> for &'k [u8] {
    const WIDTH: Option<usize> = None;

    fn from_key_bytes(bytes: &'k [u8]) -> Result<Self> {
        Ok(bytes)
    }

    fn with_lookup<R>(bytes: &[u8], f: impl FnOnce(&Self::Lookup) -> R) -> Result<R> {
        Ok(f(bytes))
    }

    fn with_key_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Clone)]
    struct Identity;

    impl HashEngine for Identity {
        fn hash_bytes(&self, bytes: &[u8]) -> u64 {
            bytes.len() as u64
        }
        fn hash_u64(&self, value: u64) -> u64 {
            value
        }
    }

    #[test]
    fn test_int_keys_widen() {
        assert_eq!(7u16.hash_with(&Identity), 7);
        assert_eq!(7u32.hash_with(&Identity), 7);
        assert_eq!(7u64.hash_with(&Identity), 7);
    }

    #[test]
    fn test_int_key_bytes() {
        assert_eq!(<u32 as ByteKey>::from_key_bytes(&[1, 0, 0, 0]), Ok(1));
        assert_eq!(
            <u16 as ByteKey>::from_key_bytes(&[1, 0, 0]),
            Err(TableError::KeyWidth {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(0x0102u16.with_key_bytes(|b| b.to_vec()), vec![2, 1]);
        assert_eq!(<u64 as ByteKey>::with_lookup(&[9; 8], |k| *k), Ok(u64::from_le_bytes([9; 8])));
    }

    #[test]
    fn test_byte_keys() {
        let owned: Box<[u8]> = <Box<[u8]> as ByteKey>::from_key_bytes(b"abc").unwrap();
        assert_eq!(owned.heap_size(), 3);
        assert_eq!(owned.as_lookup(), b"abc");

        let buffer = b"abcd".to_vec();
        let borrowed: &[u8] = <&[u8] as ByteKey>::from_key_bytes(&buffer).unwrap();
        assert_eq!(borrowed.heap_size(), 0);
        assert_eq!(borrowed.as_lookup().hash_with(&Identity), 4);
    }
}
