//! Placement primitives shared by inserting and rehashing.
use crate::hashing::common::home_bucket;
use crate::robin::Meta;
use std::mem::MaybeUninit;

/// Where an incoming entry goes and how far the cluster after it has to move.
pub(crate) struct Placement {
    pub(crate) index: usize,
    pub(crate) vacancy: usize,
    pub(crate) meta: Meta,
}

/// Plans the placement of an entry hashing to `hash` without touching the arrays.
///
/// The entry takes the first bucket whose occupant sits closer to its home than the entry
/// would, and every occupant from there up to the next empty bucket moves one bucket on.
/// Returns `None` if the entry or any moved occupant would exceed [`Meta::MAX_DIB`].
///
/// `meta` must be non-empty, a power of two long and contain at least one empty bucket.
pub(crate) fn plan(meta: &[Meta], hash: u64) -> Option<Placement> {
    let mask = meta.len() - 1;
    let mut index = home_bucket(hash, mask);
    let mut dib = 1;
    while meta[index].dib() >= dib {
        index = (index + 1) & mask;
        dib += 1;
        if dib > Meta::MAX_DIB {
            return None;
        }
    }

    let mut vacancy = index;
    while meta[vacancy] != Meta::EMPTY {
        if meta[vacancy].dib() == Meta::MAX_DIB {
            return None;
        }
        vacancy = (vacancy + 1) & mask;
    }

    Some(Placement {
        index,
        vacancy,
        meta: Meta::new(dib, Meta::fingerprint_of(hash)),
    })
}

/// Carries out `placement`: shifts the cluster and writes `entry` in.
pub(crate) fn apply<T>(
    meta: &mut [Meta],
    buckets: &mut [MaybeUninit<T>],
    placement: Placement,
    entry: T,
) {
    let mask = meta.len() - 1;
    let mut hole = placement.vacancy;
    while hole != placement.index {
        let prev = hole.wrapping_sub(1) & mask;
        meta[hole] = meta[prev].pushed();
        buckets[hole] = std::mem::replace(&mut buckets[prev], MaybeUninit::uninit());
        hole = prev;
    }
    meta[hole] = placement.meta;
    buckets[hole].write(entry);
}
