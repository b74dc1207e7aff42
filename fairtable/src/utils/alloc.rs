//! Fallible allocation of bucket and metadata arrays.
use fairtable_core::{Result, TableError};
use std::mem::MaybeUninit;

fn reserve<T>(num_buckets: usize) -> Result<Vec<T>> {
    let fits = matches!(
        num_buckets.checked_mul(std::mem::size_of::<T>()),
        Some(bytes) if bytes <= isize::MAX as usize
    );
    if !fits {
        return Err(TableError::CapacityOverflow);
    }
    let mut array = Vec::new();
    array.try_reserve_exact(num_buckets).map_err(|_| {
        tracing::warn!(num_buckets, "bucket allocation failed");
        TableError::AllocationFailed {
            buckets: num_buckets,
        }
    })?;
    Ok(array)
}

/// Allocates `num_buckets` metadata words, all set to `fill`.
pub fn try_alloc_metadata<M: Copy>(num_buckets: usize, fill: M) -> Result<Box<[M]>> {
    let mut array = reserve::<M>(num_buckets)?;
    array.resize(num_buckets, fill);
    Ok(array.into_boxed_slice())
}

/// Allocates `num_buckets` uninitialized buckets.
pub fn try_alloc_buckets<T>(num_buckets: usize) -> Result<Box<[MaybeUninit<T>]>> {
    let mut array = reserve::<MaybeUninit<T>>(num_buckets)?;
    array.resize_with(num_buckets, MaybeUninit::uninit);
    Ok(array.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_metadata() {
        let metadata = try_alloc_metadata(8, 0xffu8).unwrap();
        assert_eq!(&*metadata, &[0xff; 8]);
    }

    #[test]
    fn test_alloc_buckets() {
        assert_eq!(try_alloc_buckets::<(u64, u64)>(16).unwrap().len(), 16);
        assert!(try_alloc_buckets::<(u64, u64)>(0).unwrap().is_empty());
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            try_alloc_buckets::<[u8; 256]>(usize::MAX / 2).unwrap_err(),
            TableError::CapacityOverflow
        );
    }
}
