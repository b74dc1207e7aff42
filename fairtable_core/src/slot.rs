//! Fixed-width opaque values.
use crate::error::{Result, TableError};
use std::fmt::{Debug, Formatter};

/// An application value of exactly `N` bytes that tables copy in and hand back by reference.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot<const N: usize>(pub [u8; N]);

pub type Val4 = Slot<4>;
pub type Val56 = Slot<56>;
pub type Val64 = Slot<64>;
pub type Val256 = Slot<256>;

impl<const N: usize> Slot<N> {
    pub const WIDTH: usize = N;

    /// Builds a slot whose every byte is `byte`.
    pub const fn filled(byte: u8) -> Self {
        Self([byte; N])
    }

    pub const fn as_array(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for Slot<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> From<[u8; N]> for Slot<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> Debug for Slot<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot<{N}>(")?;
        for byte in self.0.iter().take(8) {
            write!(f, "{byte:02x}")?;
        }
        if N > 8 {
            write!(f, "..")?;
        }
        write!(f, ")")
    }
}

/// A value kind a table can store: either nothing (set mode) or a fixed-width slot.
pub trait SlotValue: Sized {
    /// Number of bytes crossing the byte-oriented boundary.
    const WIDTH: usize;

    /// Copies a value out of `bytes`, which must be exactly [`Self::WIDTH`] long.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    /// Borrows the stored bytes.
    fn as_bytes(&self) -> &[u8];
}

impl SlotValue for () {
    const WIDTH: usize = 0;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if !bytes.is_empty() {
            return Err(TableError::ValueWidth {
                expected: 0,
                actual: bytes.len(),
            });
        }
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        &[]
    }
}

impl<const N: usize> SlotValue for Slot<N> {
    const WIDTH: usize = N;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; N] = bytes.try_into().map_err(|_| TableError::ValueWidth {
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_checks_width() {
        assert_eq!(Val4::from_bytes(&[1, 2, 3, 4]), Ok(Slot([1, 2, 3, 4])));
        assert_eq!(
            Val64::from_bytes(&[0; 63]),
            Err(TableError::ValueWidth {
                expected: 64,
                actual: 63
            })
        );
        assert!(<() as SlotValue>::from_bytes(&[]).is_ok());
        assert!(<() as SlotValue>::from_bytes(&[0]).is_err());
    }

    #[test]
    fn test_slot_is_exactly_n_bytes() {
        assert_eq!(std::mem::size_of::<Val4>(), 4);
        assert_eq!(std::mem::size_of::<Val56>(), 56);
        assert_eq!(std::mem::size_of::<Val256>(), 256);
    }

    #[test]
    fn test_debug_is_truncated() {
        assert_eq!(format!("{:?}", Val4::filled(0xab)), "Slot<4>(abababab)");
        assert_eq!(
            format!("{:?}", Val64::default()),
            "Slot<64>(0000000000000000..)"
        );
    }
}
