/// Extract the top `num_bits` bits from a 64-bit value.
///
/// Backends place entries by the low bits of a hash and keep the top bits as a fingerprint,
/// so the two never overlap for tables below `2 ** (64 - num_bits)` buckets.
#[inline]
pub const fn extract_bits_64<const SOURCE_BITS: u32>(value: u64, num_bits: u32) -> u64 {
    debug_assert!(
        num_bits > 0 && num_bits < 64,
        r#""num_bits" must be in [1, 63]"#
    );

    value >> (SOURCE_BITS - num_bits)
}

/// Home bucket of `hash` in a table of `mask + 1` buckets.
#[inline]
pub const fn home_bucket(hash: u64, mask: usize) -> usize {
    hash as usize & mask
}

/// Smallest power-of-two bucket count that keeps `capacity` entries under `max_load`.
///
/// Returns `None` when the count overflows `usize`.
pub fn num_buckets_for_capacity(capacity: usize, max_load: f32, min_buckets: usize) -> Option<usize> {
    debug_assert!(
        max_load > 0.0 && max_load < 1.0,
        r#""max_load" must be in (0.0, 1.0)"#
    );
    debug_assert!(min_buckets.is_power_of_two(), r#""min_buckets" must be a power of two"#);

    let raw = (capacity as f64 / max_load as f64).ceil();
    if raw >= usize::MAX as f64 {
        return None;
    }
    // One spare bucket keeps at least one empty bucket to terminate probes.
    (raw as usize)
        .checked_add(1)?
        .checked_next_power_of_two()
        .map(|buckets| buckets.max(min_buckets))
}

/// Maximum number of used buckets before a table of `num_buckets` must grow.
pub fn max_used_for_buckets(num_buckets: usize, max_load: f32) -> usize {
    if num_buckets == 0 {
        return 0;
    }
    ((num_buckets as f64 * max_load as f64) as usize).min(num_buckets - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bits() {
        assert_eq!(extract_bits_64::<{ u64::BITS }>(u64::MAX, 7), 0x7f);
        assert_eq!(extract_bits_64::<{ u64::BITS }>(1 << 63, 1), 1);
        assert_eq!(extract_bits_64::<{ u64::BITS }>(0x00ff_ffff_ffff_ffff, 8), 0);
    }

    #[test]
    fn test_num_buckets_for_capacity() {
        assert_eq!(num_buckets_for_capacity(0, 0.875, 8), Some(8));
        assert_eq!(num_buckets_for_capacity(7, 0.875, 8), Some(16));
        assert_eq!(num_buckets_for_capacity(100, 0.5, 8), Some(256));
        assert_eq!(num_buckets_for_capacity(usize::MAX, 0.5, 8), None);
    }

    #[test]
    fn test_capacity_round_trip() {
        for capacity in [0, 1, 6, 7, 8, 100, 1000, 12345] {
            for load in [0.5, 0.8, 0.875] {
                let buckets = num_buckets_for_capacity(capacity, load, 8).unwrap();
                assert!(
                    max_used_for_buckets(buckets, load) >= capacity,
                    "capacity = {capacity}, load = {load}, buckets = {buckets}"
                );
            }
        }
    }

    #[test]
    fn test_max_used_leaves_an_empty_bucket() {
        assert_eq!(max_used_for_buckets(0, 0.9), 0);
        assert_eq!(max_used_for_buckets(8, 0.99), 7);
        assert_eq!(max_used_for_buckets(8, 0.875), 7);
        assert_eq!(max_used_for_buckets(16, 0.5), 8);
    }
}
