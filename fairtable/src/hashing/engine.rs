//! The fair hash engine: a multiply-fold construction over 16-byte lanes.
//!
//! Every string-keyed backend hashes through this module, so two backends given the same key
//! bytes derive their bucket placement from the same 64-bit value. The output is part of the
//! comparison setup and must stay bit-exact; see the reference vectors in the tests.

/// Four fixed odd constants that seed every mixing step.
pub const SECRETS: [u64; 4] = [
    0xa076_1d64_78bd_642f,
    0xe703_7ed1_a0b4_28db,
    0x8ebc_6af0_9c88_c6e3,
    0x5899_65cc_7537_4cc3,
];

/// Multiplies `a` and `b` into 128 bits and folds the halves with XOR.
#[cfg(target_pointer_width = "64")]
#[inline(always)]
pub const fn mix(a: u64, b: u64) -> u64 {
    let product = (a as u128).wrapping_mul(b as u128);
    (product as u64) ^ ((product >> 64) as u64)
}

#[cfg(not(target_pointer_width = "64"))]
#[inline(always)]
pub const fn mix(a: u64, b: u64) -> u64 {
    mix_portable(a, b)
}

/// Same as [`mix`] but assembled from four 32x32->64 partial products.
///
/// Used where a native 128-bit multiply is not available.
#[inline(always)]
pub const fn mix_portable(a: u64, b: u64) -> u64 {
    let (a_hi, a_lo) = (a >> 32, a & 0xffff_ffff);
    let (b_hi, b_lo) = (b >> 32, b & 0xffff_ffff);

    let hi_hi = a_hi * b_hi;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let lo_lo = a_lo * b_lo;

    let partial = lo_lo.wrapping_add(hi_lo << 32);
    let lo = partial.wrapping_add(lo_hi << 32);
    let carry = (partial < lo_lo) as u64 + (lo < partial) as u64;
    let hi = hi_hi
        .wrapping_add(hi_lo >> 32)
        .wrapping_add(lo_hi >> 32)
        .wrapping_add(carry);

    lo ^ hi
}

#[inline(always)]
const fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ])
}

#[inline(always)]
const fn read_u32(bytes: &[u8], offset: usize) -> u64 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]) as u64
}

/// Reads the first, middle and last byte of a 1..=3 byte input.
#[inline(always)]
const fn read_u24(bytes: &[u8]) -> u64 {
    let len = bytes.len();
    ((bytes[0] as u64) << 16) | ((bytes[len >> 1] as u64) << 8) | bytes[len - 1] as u64
}

/// Hashes `bytes` with a zero seed.
#[inline]
pub const fn hash_bytes(bytes: &[u8]) -> u64 {
    hash_bytes_seeded(bytes, 0)
}

/// Hashes `bytes` with the given `seed`.
pub const fn hash_bytes_seeded(bytes: &[u8], seed: u64) -> u64 {
    let len = bytes.len();
    let mut seed = seed ^ SECRETS[0];

    let lane_a: u64;
    let lane_b: u64;

    if len <= 16 {
        if len >= 4 {
            let quarter = (len >> 3) << 2;
            lane_a = (read_u32(bytes, 0) << 32) | read_u32(bytes, quarter);
            lane_b = (read_u32(bytes, len - 4) << 32) | read_u32(bytes, len - 4 - quarter);
        } else if len > 0 {
            lane_a = read_u24(bytes);
            lane_b = 0;
        } else {
            lane_a = 0;
            lane_b = 0;
        }
    } else {
        let mut offset = 0;
        let mut remaining = len;

        if remaining > 48 {
            let mut see1 = seed;
            let mut see2 = seed;
            while remaining > 48 {
                seed = mix(
                    read_u64(bytes, offset) ^ SECRETS[1],
                    read_u64(bytes, offset + 8) ^ seed,
                );
                see1 = mix(
                    read_u64(bytes, offset + 16) ^ SECRETS[2],
                    read_u64(bytes, offset + 24) ^ see1,
                );
                see2 = mix(
                    read_u64(bytes, offset + 32) ^ SECRETS[3],
                    read_u64(bytes, offset + 40) ^ see2,
                );
                offset += 48;
                remaining -= 48;
            }
            seed ^= see1 ^ see2;
        }

        while remaining > 16 {
            seed = mix(
                read_u64(bytes, offset) ^ SECRETS[1],
                read_u64(bytes, offset + 8) ^ seed,
            );
            offset += 16;
            remaining -= 16;
        }

        // The last 16 bytes, overlapping already consumed ones when the tail is short.
        lane_a = read_u64(bytes, offset + remaining - 16);
        lane_b = read_u64(bytes, offset + remaining - 8);
    }

    mix(
        SECRETS[1] ^ len as u64,
        mix(lane_a ^ SECRETS[1], lane_b ^ seed),
    )
}

/// Hashes an integer key. Independent of [`hash_bytes`] on the key's byte encoding.
#[inline]
pub const fn hash_u64(value: u64) -> u64 {
    mix(value ^ SECRETS[0], SECRETS[1] ^ value.rotate_left(32))
}
