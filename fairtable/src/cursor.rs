//! The metadata-scanning cursor shared by the open-addressing backends.
use fairtable_core::Cursor;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use std::mem::MaybeUninit;

/// Per-bucket metadata that knows whether its bucket holds a live entry.
pub trait Metadata: Copy {
    fn is_occupied(self) -> bool;
}

/// Forward-only position over the buckets of an open-addressing table.
///
/// Holds the table's bucket array, its metadata array, the current bucket index and the
/// metadata end. The position always rests on an occupied bucket or on the end.
pub struct MetadataCursor<'a, M, K, V> {
    buckets: &'a [MaybeUninit<(K, V)>],
    metadata: &'a [M],
    index: usize,
    end: usize,
}

impl<'a, M: Metadata, K, V> MetadataCursor<'a, M, K, V> {
    /// Creates a cursor positioned at the first occupied bucket.
    ///
    /// # Safety
    ///
    /// `buckets[i]` must be initialized for every `i` where `metadata[i]` is occupied, and
    /// both slices must have equal length.
    pub(crate) unsafe fn new(buckets: &'a [MaybeUninit<(K, V)>], metadata: &'a [M]) -> Self {
        debug_assert_eq!(
            buckets.len(),
            metadata.len(),
            "Bucket and metadata arrays must have equal length"
        );
        let mut cursor = Self {
            buckets,
            metadata,
            index: 0,
            end: metadata.len(),
        };
        cursor.skip_vacant();
        cursor
    }

    #[inline]
    fn skip_vacant(&mut self) {
        while self.index < self.end && !self.metadata[self.index].is_occupied() {
            self.index += 1;
        }
    }

    /// Index of the bucket under the cursor, equal to the bucket count at the end.
    pub fn bucket_index(&self) -> usize {
        self.index
    }
}

impl<'a, M: Metadata, K, V> Cursor<'a, K, V> for MetadataCursor<'a, M, K, V> {
    #[inline]
    fn is_end(&self) -> bool {
        self.index == self.end
    }

    #[inline]
    fn entry(&self) -> Option<(&'a K, &'a V)> {
        if self.is_end() {
            return None;
        }
        // SAFETY: the cursor only rests on occupied buckets, which are initialized.
        let (key, value) = unsafe { self.buckets[self.index].assume_init_ref() };
        Some((key, value))
    }

    #[inline]
    fn advance(&mut self) {
        if !self.is_end() {
            self.index += 1;
            self.skip_vacant();
        }
    }
}

impl<'a, M: Metadata, K, V> Iterator for MetadataCursor<'a, M, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entry()?;
        self.advance();
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.index))
    }
}

impl<M: Metadata, K, V> FusedIterator for MetadataCursor<'_, M, K, V> {}

impl<M, K, V> Clone for MetadataCursor<'_, M, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            metadata: self.metadata,
            index: self.index,
            end: self.end,
        }
    }
}

impl<M, K, V> Debug for MetadataCursor<'_, M, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCursor")
            .field("index", &self.index)
            .field("end", &self.end)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Metadata for bool {
        fn is_occupied(self) -> bool {
            self
        }
    }

    fn layout() -> (Vec<MaybeUninit<(u32, u32)>>, Vec<bool>) {
        let occupied = vec![false, true, false, false, true, true, false];
        let buckets = occupied
            .iter()
            .enumerate()
            .map(|(i, &full)| {
                if full {
                    MaybeUninit::new((i as u32, i as u32 * 10))
                } else {
                    MaybeUninit::uninit()
                }
            })
            .collect();
        (buckets, occupied)
    }

    #[test]
    fn test_visits_occupied_buckets_in_order() {
        let (buckets, metadata) = layout();
        let cursor = unsafe { MetadataCursor::new(&buckets, &metadata) };
        let visited: Vec<_> = cursor.map(|(k, v)| (*k, *v)).collect();
        assert_eq!(visited, vec![(1, 10), (4, 40), (5, 50)]);
    }

    #[test]
    fn test_triplet_protocol() {
        let (buckets, metadata) = layout();
        let mut cursor = unsafe { MetadataCursor::new(&buckets, &metadata) };
        assert_eq!(cursor.bucket_index(), 1);
        let mut count = 0;
        while !cursor.is_end() {
            assert!(cursor.entry().is_some());
            cursor.advance();
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(cursor.entry(), None);
        cursor.advance();
        assert!(cursor.is_end());
        assert_eq!(cursor.bucket_index(), metadata.len());
    }

    #[test]
    fn test_empty_arrays_start_at_end() {
        let buckets: Vec<MaybeUninit<(u8, ())>> = Vec::new();
        let metadata: Vec<bool> = Vec::new();
        let cursor = unsafe { MetadataCursor::new(&buckets, &metadata) };
        assert!(cursor.is_end());
    }
}
